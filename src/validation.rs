use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
});

static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{10,15}$").expect("phone regex is valid"));

static SLUG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").expect("slug regex is valid"));

static OTP_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{6}$").expect("otp regex is valid"));

/// Field-level validation messages keyed by field path (`sections[0].title`).
///
/// Only the first failing rule per field is kept, so every field reports at most one message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.fields.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Accumulates rule failures for one form submission
#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.add(field, message);
    }

    /// Empty or whitespace-only values fail
    pub fn required(&mut self, field: &str, value: &str, message: &str) -> bool {
        if value.trim().is_empty() {
            self.add(field, message);
            return false;
        }
        true
    }

    pub fn required_opt(&mut self, field: &str, value: Option<&str>, message: &str) -> bool {
        self.required(field, value.unwrap_or_default(), message)
    }

    pub fn min_chars(&mut self, field: &str, value: &str, min: usize, message: &str) {
        if value.chars().count() < min {
            self.add(field, message);
        }
    }

    pub fn max_chars(&mut self, field: &str, value: &str, max: usize, message: &str) {
        if value.chars().count() > max {
            self.add(field, message);
        }
    }

    pub fn min_items(&mut self, field: &str, len: usize, min: usize, message: &str) {
        if len < min {
            self.add(field, message);
        }
    }

    /// Skipped for empty values; pair with `required` when the field is mandatory
    pub fn email(&mut self, field: &str, value: &str, message: &str) {
        if !value.is_empty() && !is_email(value) {
            self.add(field, message);
        }
    }

    pub fn url(&mut self, field: &str, value: &str, message: &str) {
        if !value.is_empty() && !is_http_url(value) {
            self.add(field, message);
        }
    }

    pub fn phone(&mut self, field: &str, value: &str, message: &str) {
        if !value.is_empty() && !PHONE_REGEX.is_match(value) {
            self.add(field, message);
        }
    }

    pub fn slug(&mut self, field: &str, value: &str, message: &str) {
        if !value.is_empty() && !is_slug(value) {
            self.add(field, message);
        }
    }

    pub fn otp(&mut self, field: &str, value: &str, message: &str) {
        if !OTP_REGEX.is_match(value) {
            self.add(field, message);
        }
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

pub fn is_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

pub fn is_slug(value: &str) -> bool {
    SLUG_REGEX.is_match(value)
}

pub fn is_http_url(value: &str) -> bool {
    match url::Url::parse(value) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some(),
        Err(_) => false,
    }
}
