//! Staff-only admin area

pub mod auth;
pub mod certifications;
pub mod courses;
pub mod dashboard;
pub mod distributions;
pub mod documents;
pub mod donations;
pub mod member_documents;
pub mod quizzes;
pub mod tests;
pub mod vault;
pub mod vendors;
pub mod videos;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::common::Id;
use crate::server::views::{admin_nav, datetime, escape};

/// Admin page body: section navigation followed by `content`
pub(crate) fn admin_body(content: String) -> String {
    format!("{}\n{}", admin_nav(), content)
}

/// "Added by sam on Mar 4, 2025 10:00 UTC"
pub(crate) fn created_line(created_by: &str, at: DateTime<Utc>) -> String {
    format!(
        r#"<p class="meta">Added by {} on {}</p>"#,
        escape(created_by),
        datetime(at)
    )
}

/// Parses a path id; malformed ids are treated like missing records.
pub(crate) fn parse_id<T>(raw: &str) -> Option<Id<T>> {
    Id::parse(raw).ok()
}

/// `?status=` filter on list pages; unknown or blank values mean "all".
#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    #[serde(default)]
    pub status: String,
}

impl StatusQuery {
    pub fn parse<S: std::str::FromStr>(&self) -> Option<S> {
        self.status.parse().ok()
    }
}

/// Filter links for a list page; the active one is marked.
pub(crate) fn status_filter<'a>(
    base: &str,
    active: &str,
    statuses: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> String {
    let link = |value: &str, label: &str| {
        let class = if value == active { r#" class="active""# } else { "" };
        let href = if value.is_empty() {
            base.to_string()
        } else {
            format!("{base}?status={value}")
        };
        format!(r#"<a href="{}"{class}>{}</a>"#, escape(&href), escape(label))
    };
    let links: Vec<String> = std::iter::once(link("", "All"))
        .chain(statuses.into_iter().map(|(value, label)| link(value, label)))
        .collect();
    format!(r#"<nav class="filters">{}</nav>"#, links.join(" "))
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn status_filter_marks_active_link() {
        let html = status_filter("/admin/vendors", "approved", [("approved", "Approved")]);
        assert!(html.contains(r#"<a href="/admin/vendors">All</a>"#));
        assert!(html.contains(r#"<a href="/admin/vendors?status=approved" class="active">Approved</a>"#));
    }

    #[test]
    fn malformed_ids_are_none() {
        assert!(parse_id::<()>("not-a-uuid").is_none());
    }
}
