use serde::{Deserialize, Serialize};

use crate::forms::ContentEntity;
use crate::validation::{ValidationErrors, Validator};

/// A contact-form submission from the public site
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub message: String,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

impl ContentEntity for Contact {
    const DOC_TYPE: &'static str = "contact";
    const LABEL: &'static str = "Contact";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();

        if v.required("firstName", &self.first_name, "First name is required") {
            v.min_chars("firstName", &self.first_name, 2, "First name must be at least 2 characters");
        }
        if v.required("lastName", &self.last_name, "Last name is required") {
            v.min_chars("lastName", &self.last_name, 2, "Last name must be at least 2 characters");
        }
        if v.required("email", &self.email, "Email is required") {
            v.email("email", &self.email, "Invalid email format");
        }
        if v.required("phoneNumber", &self.phone_number, "Phone number is required") {
            v.phone("phoneNumber", &self.phone_number, "Phone number must be 10-15 digits");
        }
        if v.required("message", &self.message, "Message is required") {
            v.min_chars("message", &self.message, 10, "Message must be at least 10 characters");
        }

        v.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Contact {
        Contact {
            first_name: "Maya".into(),
            last_name: "Okafor".into(),
            email: "maya@example.org".into(),
            phone_number: "5551234567".into(),
            message: "I would like to volunteer on weekends.".into(),
        }
    }

    #[test]
    fn valid_contact_passes() {
        assert!(valid().validate().is_ok());
        assert_eq!(valid().full_name(), "Maya Okafor");
    }

    #[test]
    fn each_rule_reports_its_message() {
        let contact = Contact {
            first_name: "M".into(),
            last_name: String::new(),
            email: "maya@".into(),
            phone_number: "555-123".into(),
            message: "Hi".into(),
        };
        let errors = contact.validate().unwrap_err();
        assert_eq!(errors.get("firstName"), Some("First name must be at least 2 characters"));
        assert_eq!(errors.get("lastName"), Some("Last name is required"));
        assert_eq!(errors.get("email"), Some("Invalid email format"));
        assert_eq!(errors.get("phoneNumber"), Some("Phone number must be 10-15 digits"));
        assert_eq!(errors.get("message"), Some("Message must be at least 10 characters"));
    }
}
