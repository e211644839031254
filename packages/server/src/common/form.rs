//! Form parsing and validation shared by every HTML form.
//!
//! Handlers deserialize url-encoded bodies into typed form structs (all fields
//! `#[serde(default)]`) or into [`FormData`] when field names are dynamic, then
//! run the validators below. Validation failures are collected in
//! [`FormErrors`] and rendered next to the offending inputs.

use chrono::{NaiveDate, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
            .expect("email regex is valid");
    static ref URL_REGEX: Regex =
        Regex::new(r"^https?://([A-Za-z0-9\-]+\.)+[A-Za-z]{2,}(:\d+)?(/\S*)?$|^https?://localhost(:\d+)?(/\S*)?$")
            .expect("url regex is valid");
}

/// Largest amount a NUMERIC(12,2) column can hold.
const MAX_AMOUNT: &str = "9999999999.99";

/// Field values keyed by name, for forms whose field set is not fixed
/// (numbered question fields) and for multipart text parts.
#[derive(Debug, Clone, Default)]
pub struct FormData {
    values: HashMap<String, String>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later duplicates overwrite earlier ones.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self {
            values: pairs.into_iter().collect(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Trimmed value, empty when missing.
    pub fn text(&self, name: &str) -> &str {
        self.values.get(name).map(|v| v.trim()).unwrap_or("")
    }

    /// Trimmed value, `None` when missing or blank.
    pub fn optional(&self, name: &str) -> Option<String> {
        let value = self.text(name);
        (!value.is_empty()).then(|| value.to_string())
    }
}

/// Validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: Vec<(String, String)>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push((field.into(), message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|(f, _)| f == field)
    }

    /// First message recorded for `field`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, m)| m.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(f, m)| (f.as_str(), m.as_str()))
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, FormErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }

    /// Records "This field is required." for blank values.
    pub fn required(&mut self, field: &str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.add(field, "This field is required.");
            false
        } else {
            true
        }
    }

    pub fn max_len(&mut self, field: &str, value: &str, max: usize) -> bool {
        let len = value.trim().chars().count();
        if len > max {
            self.add(
                field,
                format!("Ensure this value has at most {max} characters (it has {len})."),
            );
            false
        } else {
            true
        }
    }

    /// Required, bounded text.
    pub fn text(&mut self, field: &str, value: &str, max: usize) -> bool {
        self.required(field, value) && self.max_len(field, value, max)
    }

    pub fn email(&mut self, field: &str, value: &str) -> bool {
        if !self.required(field, value) || !self.max_len(field, value, 254) {
            return false;
        }
        if EMAIL_REGEX.is_match(value.trim()) {
            true
        } else {
            self.add(field, "Enter a valid email address.");
            false
        }
    }

    /// Validates only when a value is present.
    pub fn optional_email(&mut self, field: &str, value: &str) -> bool {
        value.trim().is_empty() || self.email(field, value)
    }

    pub fn url(&mut self, field: &str, value: &str) -> bool {
        if !self.required(field, value) || !self.max_len(field, value, 500) {
            return false;
        }
        if URL_REGEX.is_match(value.trim()) {
            true
        } else {
            self.add(field, "Enter a valid URL.");
            false
        }
    }

    pub fn optional_url(&mut self, field: &str, value: &str) -> bool {
        value.trim().is_empty() || self.url(field, value)
    }

    /// Parses `YYYY-MM-DD`.
    pub fn date(&mut self, field: &str, value: &str) -> Option<NaiveDate> {
        if !self.required(field, value) {
            return None;
        }
        match NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                self.add(field, "Enter a valid date.");
                None
            }
        }
    }

    /// Parses `HH:MM` or `HH:MM:SS`.
    pub fn time(&mut self, field: &str, value: &str) -> Option<NaiveTime> {
        if !self.required(field, value) {
            return None;
        }
        let value = value.trim();
        let parsed = NaiveTime::parse_from_str(value, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"));
        match parsed {
            Ok(time) => Some(time),
            Err(_) => {
                self.add(field, "Enter a valid time.");
                None
            }
        }
    }

    /// Parses a positive money amount with at most two decimal places.
    pub fn amount(&mut self, field: &str, value: &str) -> Option<Decimal> {
        if !self.required(field, value) {
            return None;
        }
        let cleaned = value.trim().trim_start_matches('$').replace(',', "");
        let amount = match Decimal::from_str(&cleaned) {
            Ok(amount) => amount,
            Err(_) => {
                self.add(field, "Enter a number.");
                return None;
            }
        };
        let max = Decimal::from_str(MAX_AMOUNT).unwrap_or(Decimal::MAX);
        if amount <= Decimal::ZERO {
            self.add(field, "Amount must be greater than zero.");
            None
        } else if amount.normalize().scale() > 2 {
            self.add(field, "Ensure that there are no more than 2 decimal places.");
            None
        } else if amount > max {
            self.add(field, "Amount is too large.");
            None
        } else {
            Some(amount.round_dp(2))
        }
    }

    /// Parses an integer within `min..=max`, using `default` for blank input.
    pub fn int_in_range(
        &mut self,
        field: &str,
        value: &str,
        default: i32,
        min: i32,
        max: i32,
    ) -> Option<i32> {
        let value = value.trim();
        if value.is_empty() {
            return Some(default);
        }
        match value.parse::<i32>() {
            Ok(n) if (min..=max).contains(&n) => Some(n),
            Ok(_) => {
                self.add(field, format!("Enter a whole number between {min} and {max}."));
                None
            }
            Err(_) => {
                self.add(field, "Enter a whole number.");
                None
            }
        }
    }

    /// Checks membership in a fixed set of choices.
    pub fn choice<'a>(&mut self, field: &str, value: &str, choices: &[&'a str]) -> Option<&'a str> {
        let value = value.trim();
        match choices.iter().find(|c| **c == value) {
            Some(choice) => Some(*choice),
            None => {
                self.add(
                    field,
                    format!("Select a valid choice. {value} is not one of the available choices."),
                );
                None
            }
        }
    }
}

/// Returns `next` when it is a local absolute path, otherwise `fallback`.
///
/// Protocol-relative (`//host`) and scheme-bearing targets are refused so a
/// crafted login link cannot bounce an admin to another site.
pub fn safe_redirect_target<'a>(next: Option<&'a str>, fallback: &'a str) -> &'a str {
    match next {
        Some(target)
            if target.starts_with('/')
                && !target.starts_with("//")
                && !target.starts_with("/\\")
                && !target.contains("://")
                && !target.chars().any(char::is_control) =>
        {
            target
        }
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_blank() {
        let mut errors = FormErrors::new();
        assert!(!errors.required("title", "   "));
        assert_eq!(errors.get("title"), Some("This field is required."));
    }

    #[test]
    fn max_len_counts_characters() {
        let mut errors = FormErrors::new();
        assert!(errors.max_len("name", "ééé", 3));
        assert!(!errors.max_len("name", "abcd", 3));
        assert!(errors.get("name").unwrap().contains("at most 3"));
    }

    #[test]
    fn email_validation() {
        let mut errors = FormErrors::new();
        assert!(errors.email("email", "parent@example.org"));
        assert!(!errors.email("bad", "parent@"));
        assert!(!errors.email("blank", ""));
        assert_eq!(errors.get("bad"), Some("Enter a valid email address."));
        assert_eq!(errors.get("blank"), Some("This field is required."));
    }

    #[test]
    fn optional_email_allows_blank() {
        let mut errors = FormErrors::new();
        assert!(errors.optional_email("email", ""));
        assert!(errors.is_empty());
    }

    #[test]
    fn url_validation() {
        let mut errors = FormErrors::new();
        assert!(errors.url("u", "https://videos.example.org/watch?v=1"));
        assert!(errors.url("u", "http://localhost:8000/a"));
        assert!(!errors.url("bad", "ftp://example.org"));
        assert!(!errors.url("bad2", "javascript:alert(1)"));
        assert!(errors.has("bad") && errors.has("bad2"));
    }

    #[test]
    fn date_and_time_parsing() {
        let mut errors = FormErrors::new();
        assert_eq!(
            errors.date("date", "2025-03-14"),
            NaiveDate::from_ymd_opt(2025, 3, 14)
        );
        assert_eq!(errors.time("time", "18:30"), NaiveTime::from_hms_opt(18, 30, 0));
        assert_eq!(
            errors.time("time2", "08:05:09"),
            NaiveTime::from_hms_opt(8, 5, 9)
        );
        assert!(errors.is_empty());
        assert!(errors.date("bad", "14/03/2025").is_none());
        assert_eq!(errors.get("bad"), Some("Enter a valid date."));
    }

    #[test]
    fn amount_parsing() {
        let mut errors = FormErrors::new();
        assert_eq!(
            errors.amount("a", "$1,250.50"),
            Some(Decimal::from_str("1250.50").unwrap())
        );
        assert_eq!(errors.amount("b", "10"), Some(Decimal::from(10)));
        assert!(errors.is_empty());

        assert!(errors.amount("zero", "0").is_none());
        assert!(errors.amount("neg", "-5").is_none());
        assert!(errors.amount("cents", "1.005").is_none());
        assert!(errors.amount("text", "lots").is_none());
        assert!(errors.has("zero") && errors.has("neg") && errors.has("cents") && errors.has("text"));
    }

    #[test]
    fn amount_allows_trailing_zeros() {
        let mut errors = FormErrors::new();
        assert_eq!(
            errors.amount("a", "12.500"),
            Some(Decimal::from_str("12.5").unwrap())
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn int_in_range_defaults_and_bounds() {
        let mut errors = FormErrors::new();
        assert_eq!(errors.int_in_range("score", "", 70, 0, 100), Some(70));
        assert_eq!(errors.int_in_range("score", "85", 70, 0, 100), Some(85));
        assert_eq!(errors.int_in_range("over", "101", 70, 0, 100), None);
        assert_eq!(errors.int_in_range("nan", "ten", 70, 0, 100), None);
        assert!(errors.has("over"));
        assert_eq!(errors.get("nan"), Some("Enter a whole number."));
    }

    #[test]
    fn choice_validation() {
        let mut errors = FormErrors::new();
        let levels = ["Beginner", "Advanced"];
        assert_eq!(errors.choice("level", "Advanced", &levels), Some("Advanced"));
        assert_eq!(errors.choice("level", "Expert", &levels), None);
        assert!(errors.has("level"));
    }

    #[test]
    fn finish_returns_value_only_without_errors() {
        assert_eq!(FormErrors::new().finish(|| 5), Ok(5));

        let mut errors = FormErrors::new();
        errors.add("x", "bad");
        assert!(errors.finish(|| 5).is_err());
    }

    #[test]
    fn form_data_trims_and_defaults() {
        let form = FormData::from_pairs(vec![
            ("title".to_string(), "  Intro  ".to_string()),
            ("blank".to_string(), "   ".to_string()),
        ]);
        assert_eq!(form.text("title"), "Intro");
        assert_eq!(form.text("missing"), "");
        assert_eq!(form.optional("blank"), None);
        assert_eq!(form.optional("title"), Some("Intro".to_string()));
    }

    #[test]
    fn redirect_target_must_be_local() {
        assert_eq!(safe_redirect_target(Some("/admin/quizzes"), "/admin"), "/admin/quizzes");
        assert_eq!(safe_redirect_target(Some("//evil.example"), "/admin"), "/admin");
        assert_eq!(safe_redirect_target(Some("https://evil.example"), "/admin"), "/admin");
        assert_eq!(safe_redirect_target(Some("admin"), "/admin"), "/admin");
        assert_eq!(safe_redirect_target(None, "/admin"), "/admin");
    }
}
