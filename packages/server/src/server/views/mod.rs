//! HTML rendering helpers
//!
//! Pages are plain strings assembled by the route modules. Every value that
//! comes from a visitor or the database goes through [`escape`] before it is
//! interpolated.

pub mod forms;
pub mod layout;

pub use layout::{admin_nav, render_page, PageChrome};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;

/// Escapes text for use in element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escaped text with line breaks preserved
pub fn multiline(text: &str) -> String {
    escape(text).replace("\r\n", "\n").replace('\n', "<br>")
}

/// `$1,234.50`
pub fn money(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}${}.{}", if negative { "-" } else { "" }, grouped, cents)
}

pub fn date(value: NaiveDate) -> String {
    value.format("%B %-d, %Y").to_string()
}

pub fn time(value: NaiveTime) -> String {
    value.format("%-I:%M %p").to_string()
}

pub fn datetime(value: DateTime<Utc>) -> String {
    value.format("%b %-d, %Y %H:%M UTC").to_string()
}

pub fn file_size(bytes: i64) -> String {
    match bytes {
        b if b >= 1024 * 1024 => format!("{:.1} MB", b as f64 / (1024.0 * 1024.0)),
        b if b >= 1024 => format!("{:.1} KB", b as f64 / 1024.0),
        b => format!("{b} bytes"),
    }
}

/// `<p class="empty">` placeholder for empty lists
pub fn empty(message: &str) -> String {
    format!(r#"<p class="empty">{}</p>"#, escape(message))
}

pub fn status_badge(value: &str, label: &str) -> String {
    format!(
        r#"<span class="badge badge-{}">{}</span>"#,
        escape(value),
        escape(label)
    )
}
