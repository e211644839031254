//! Form field markup with inline validation messages

use super::escape;
use crate::common::FormErrors;

fn field_error(errors: &FormErrors, name: &str) -> String {
    errors
        .iter()
        .filter(|(field, _)| *field == name)
        .map(|(_, message)| format!(r#"<p class="field-error">{}</p>"#, escape(message)))
        .collect()
}

fn wrap(name: &str, label: &str, control: String, errors: &FormErrors) -> String {
    let class = if errors.has(name) { "field has-error" } else { "field" };
    format!(
        r#"<div class="{class}"><label for="id_{name}">{label}</label>{control}{error}</div>"#,
        name = escape(name),
        label = escape(label),
        error = field_error(errors, name),
    )
}

pub fn input(label: &str, name: &str, kind: &str, value: &str, errors: &FormErrors) -> String {
    let control = format!(
        r#"<input type="{kind}" id="id_{name}" name="{name}" value="{value}">"#,
        kind = escape(kind),
        name = escape(name),
        value = escape(value),
    );
    wrap(name, label, control, errors)
}

pub fn textarea(label: &str, name: &str, value: &str, errors: &FormErrors) -> String {
    let control = format!(
        r#"<textarea id="id_{name}" name="{name}" rows="5">{value}</textarea>"#,
        name = escape(name),
        value = escape(value),
    );
    wrap(name, label, control, errors)
}

/// `options` are `(value, label)` pairs.
pub fn select<'a>(
    label: &str,
    name: &str,
    options: impl IntoIterator<Item = (&'a str, &'a str)>,
    selected: &str,
    errors: &FormErrors,
) -> String {
    let options: String = options
        .into_iter()
        .map(|(value, text)| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                escape(value),
                if value == selected { " selected" } else { "" },
                escape(text)
            )
        })
        .collect();
    let control = format!(
        r#"<select id="id_{name}" name="{name}">{options}</select>"#,
        name = escape(name)
    );
    wrap(name, label, control, errors)
}

pub fn file(label: &str, name: &str, errors: &FormErrors) -> String {
    let control = format!(
        r#"<input type="file" id="id_{name}" name="{name}">"#,
        name = escape(name)
    );
    wrap(name, label, control, errors)
}

pub fn hidden(name: &str, value: &str) -> String {
    format!(
        r#"<input type="hidden" name="{}" value="{}">"#,
        escape(name),
        escape(value)
    )
}

/// A POST form around `fields`
pub fn form(action: &str, multipart: bool, fields: &str, submit: &str) -> String {
    let enctype = if multipart {
        r#" enctype="multipart/form-data""#
    } else {
        ""
    };
    format!(
        r#"<form method="post" action="{action}"{enctype}>{fields}<button type="submit">{submit}</button></form>"#,
        action = escape(action),
        submit = escape(submit),
    )
}

/// Single-button POST form, used for state changes
pub fn post_button(action: &str, label: &str, class: &str) -> String {
    format!(
        r#"<form method="post" action="{}" class="inline"><button type="submit" class="{}">{}</button></form>"#,
        escape(action),
        escape(class),
        escape(label)
    )
}
