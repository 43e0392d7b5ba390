use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use time::{macros::format_description, Date};

use crate::entries::repo::Entry;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref USERNAME_RE: Regex = Regex::new(r"^[a-zA-Z0-9_]+$").unwrap();
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Form-field dates use the HTML date-input format.
pub fn parse_date(s: &str) -> Option<Date> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(s.trim(), format).ok()
}

pub fn format_date(date: Date) -> String {
    let format = format_description!("[year]-[month]-[day]");
    date.format(format).unwrap_or_default()
}

/// Registration form. Field checks live here; uniqueness checks need the
/// database and stay in the handler.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password2: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.username.trim().is_empty() {
            errors.push("Username is required.".into());
        } else if !USERNAME_RE.is_match(&self.username) {
            errors.push(
                "Username should be one word, letters, numbers, and underscores only.".into(),
            );
        }
        if self.email.is_empty() {
            errors.push("Email is required.".into());
        } else if !is_valid_email(&self.email) {
            errors.push("Email address is not valid.".into());
        }
        if self.password.is_empty() {
            errors.push("Password is required.".into());
        } else if self.password.len() < 2 {
            errors.push("Password is too short.".into());
        }
        if self.password != self.password2 {
            errors.push("Passwords must match.".into());
        }
        errors
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.email.is_empty() {
            errors.push("Email is required.".into());
        } else if !is_valid_email(&self.email) {
            errors.push("Email address is not valid.".into());
        }
        if self.password.is_empty() {
            errors.push("Password is required.".into());
        }
        errors
    }
}

/// Journal entry form, shared by the create and edit pages. Raw strings are
/// kept as submitted so invalid input round-trips back into the re-rendered
/// form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub minutes: String,
    #[serde(default)]
    pub learned: String,
    #[serde(default)]
    pub resources: String,
}

impl EntryForm {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push("Title is required.".into());
        }
        if self.date.trim().is_empty() {
            errors.push("Date is required.".into());
        } else if parse_date(&self.date).is_none() {
            errors.push("Date must be in YYYY-MM-DD format.".into());
        }
        match self.minutes.trim() {
            "" => errors.push("Time (in minutes) is required.".into()),
            m => {
                if !matches!(m.parse::<i32>(), Ok(n) if n > 0) {
                    errors.push("Time (in minutes) must be a positive number.".into());
                }
            }
        }
        if self.learned.trim().is_empty() {
            errors.push("What I Learned is required.".into());
        }
        if self.resources.trim().is_empty() {
            errors.push("Resources to Remember is required.".into());
        }
        errors
    }

    /// Typed date and minutes. Only meaningful after `validate` passes.
    pub fn parsed(&self) -> Option<(Date, i32)> {
        let date = parse_date(&self.date)?;
        let minutes = self.minutes.trim().parse::<i32>().ok().filter(|m| *m > 0)?;
        Some((date, minutes))
    }

    /// Prefill for the edit page.
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            title: entry.title.clone(),
            date: format_date(entry.date),
            minutes: entry.minutes.to_string(),
            learned: entry.learned.clone(),
            resources: entry.resources.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_register() -> RegisterForm {
        RegisterForm {
            username: "dave_99".into(),
            email: "dave@test.com".into(),
            password: "password".into(),
            password2: "password".into(),
        }
    }

    #[test]
    fn register_accepts_valid_input() {
        assert!(valid_register().validate().is_empty());
    }

    #[test]
    fn register_rejects_username_with_spaces() {
        let mut form = valid_register();
        form.username = "dave smith".into();
        let errors = form.validate();
        assert!(errors.iter().any(|e| e.contains("one word")));
    }

    #[test]
    fn register_rejects_bad_email() {
        let mut form = valid_register();
        form.email = "not-an-email".into();
        let errors = form.validate();
        assert!(errors.iter().any(|e| e.contains("not valid")));
    }

    #[test]
    fn register_rejects_mismatched_passwords() {
        let mut form = valid_register();
        form.password2 = "different".into();
        let errors = form.validate();
        assert!(errors.iter().any(|e| e.contains("must match")));
    }

    #[test]
    fn register_collects_every_missing_field() {
        let errors = RegisterForm::default().validate();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn login_requires_both_fields() {
        let errors = LoginForm::default().validate();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn login_accepts_valid_input() {
        let form = LoginForm {
            email: "dave@test.com".into(),
            password: "password".into(),
        };
        assert!(form.validate().is_empty());
    }

    fn valid_entry() -> EntryForm {
        EntryForm {
            title: "Ownership in Rust".into(),
            date: "2024-03-14".into(),
            minutes: "45".into(),
            learned: "Borrowing rules".into(),
            resources: "The book, chapter 4".into(),
        }
    }

    #[test]
    fn entry_accepts_valid_input_and_parses() {
        let form = valid_entry();
        assert!(form.validate().is_empty());
        let (date, minutes) = form.parsed().expect("typed values");
        assert_eq!(format_date(date), "2024-03-14");
        assert_eq!(minutes, 45);
    }

    #[test]
    fn entry_rejects_malformed_date() {
        let mut form = valid_entry();
        form.date = "14/03/2024".into();
        let errors = form.validate();
        assert!(errors.iter().any(|e| e.contains("YYYY-MM-DD")));
        assert!(form.parsed().is_none());
    }

    #[test]
    fn entry_rejects_non_positive_minutes() {
        for bad in ["0", "-5", "ten"] {
            let mut form = valid_entry();
            form.minutes = bad.into();
            assert!(!form.validate().is_empty(), "minutes {bad:?} should fail");
        }
    }

    #[test]
    fn entry_requires_free_text_fields() {
        let mut form = valid_entry();
        form.learned = "  ".into();
        form.resources = String::new();
        assert_eq!(form.validate().len(), 2);
    }
}
