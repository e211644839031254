use serde::Deserialize;

use crate::common::FormErrors;

/// Admin login form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    /// Both fields present, trimmed username
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let username = self.username.trim();
        if username.is_empty() || self.password.is_empty() {
            None
        } else {
            Some((username, self.password.as_str()))
        }
    }
}

/// Public account registration form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
}

/// Registration input that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<NewRegistration, FormErrors> {
        let mut errors = FormErrors::new();
        let username = self.username.trim();

        if errors.text("username", username, 150)
            && !username
                .chars()
                .all(|c| c.is_alphanumeric() || "@.+-_".contains(c))
        {
            errors.add(
                "username",
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
            );
        }

        errors.email("email", &self.email);

        if errors.required("password1", &self.password1) {
            if self.password1.chars().count() < 8 {
                errors.add(
                    "password1",
                    "This password is too short. It must contain at least 8 characters.",
                );
            }
            if self.password1.chars().all(|c| c.is_ascii_digit()) {
                errors.add("password1", "This password is entirely numeric.");
            }
            if self.password1.eq_ignore_ascii_case(username) {
                errors.add("password1", "The password is too similar to the username.");
            }
        }

        if errors.required("password2", &self.password2) && self.password1 != self.password2 {
            errors.add("password2", "The two password fields didn't match.");
        }

        errors.finish(|| NewRegistration {
            username: username.to_string(),
            email: self.email.trim().to_string(),
            password: self.password1.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(username: &str, password1: &str, password2: &str) -> RegistrationForm {
        RegistrationForm {
            username: username.to_string(),
            email: "volunteer@example.org".to_string(),
            password1: password1.to_string(),
            password2: password2.to_string(),
        }
    }

    #[test]
    fn valid_registration() {
        let valid = form(" jamie ", "gardening-2024", "gardening-2024")
            .validate()
            .unwrap();
        assert_eq!(valid.username, "jamie");
        assert_eq!(valid.email, "volunteer@example.org");
    }

    #[test]
    fn rejects_mismatched_passwords() {
        let errors = form("jamie", "gardening-2024", "gardening-2025")
            .validate()
            .unwrap_err();
        assert_eq!(
            errors.get("password2"),
            Some("The two password fields didn't match.")
        );
    }

    #[test]
    fn rejects_weak_passwords() {
        let errors = form("jamie", "12345678", "12345678").validate().unwrap_err();
        assert_eq!(errors.get("password1"), Some("This password is entirely numeric."));

        let errors = form("jamie", "short", "short").validate().unwrap_err();
        assert!(errors.get("password1").unwrap().contains("too short"));
    }

    #[test]
    fn rejects_invalid_username_characters() {
        let errors = form("jamie smith", "gardening-2024", "gardening-2024")
            .validate()
            .unwrap_err();
        assert!(errors.has("username"));
    }

    #[test]
    fn login_requires_both_fields() {
        let login = LoginForm {
            username: "  admin ".to_string(),
            password: "".to_string(),
        };
        assert!(login.credentials().is_none());

        let login = LoginForm {
            username: "  admin ".to_string(),
            password: "admin123".to_string(),
        };
        assert_eq!(login.credentials(), Some(("admin", "admin123")));
    }
}
