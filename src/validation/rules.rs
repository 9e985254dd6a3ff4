// Rule sets for the login and registration forms
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{FieldRules, FieldSource, Schema};
use crate::model::{Credentials, Registration};

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Symbols accepted by the "special character" password rule
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

// Word characters are ASCII only
const EMAIL_PATTERN: &str = r"^[A-Za-z0-9_.\-]+@([A-Za-z0-9_\-]+\.)+[A-Za-z0-9_\-]{2,4}$";

static EMAIL_RE: Lazy<Option<Regex>> = Lazy::new(|| match Regex::new(EMAIL_PATTERN) {
    Ok(re) => Some(re),
    Err(e) => {
        tracing::error!("email pattern failed to compile, every email will be rejected: {}", e);
        None
    }
});

pub fn is_email(value: &str) -> bool {
    EMAIL_RE.as_ref().is_some_and(|re| re.is_match(value))
}

/// Calendar date as produced by a date input (`YYYY-MM-DD`)
pub fn is_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").is_ok()
}

pub fn has_uppercase(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_uppercase())
}

pub fn has_lowercase(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_lowercase())
}

pub fn has_digit(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_digit())
}

pub fn has_symbol(value: &str) -> bool {
    value.chars().any(|c| PASSWORD_SYMBOLS.contains(c))
}

pub fn login_schema() -> Schema {
    Schema::new()
        .field(
            FieldRules::new("email")
                .required("Email is required")
                .rule(is_email, "Invalid email format"),
        )
        .field(FieldRules::new("password").required("Password is required"))
}

pub fn registration_schema() -> Schema {
    Schema::new()
        .field(FieldRules::new("fullName").required("Full Name is required"))
        .field(
            FieldRules::new("email")
                .required("Email is required")
                .rule(is_email, "Invalid email format"),
        )
        .field(
            FieldRules::new("dateOfBirth")
                .required("Date of Birth is required")
                .rule(is_date, "Date of Birth must be a valid date"),
        )
        .field(FieldRules::new("address.street").required("Address is required"))
        .field(FieldRules::new("address.city").required("City is required"))
        .field(FieldRules::new("address.state").required("State is required"))
        .field(FieldRules::new("address.zipCode").required("Post Code is required"))
        .field(
            FieldRules::new("password")
                .required("Password is required")
                .rule(
                    |v| v.chars().count() >= MIN_PASSWORD_LENGTH,
                    "Password must be at least 8 characters long",
                )
                .rule(has_uppercase, "Password must contain at least one uppercase letter")
                .rule(has_lowercase, "Password must contain at least one lowercase letter")
                .rule(has_digit, "Password must contain at least one number")
                .rule(has_symbol, "Password must contain at least one special character"),
        )
}

impl FieldSource for Credentials {
    fn field_value(&self, field: &str) -> Option<&str> {
        match field {
            "email" => Some(self.email.as_str()),
            "password" => Some(self.password.as_str()),
            _ => None,
        }
    }
}

impl FieldSource for Registration {
    fn field_value(&self, field: &str) -> Option<&str> {
        match field {
            "fullName" => Some(self.full_name.as_str()),
            "email" => Some(self.email.as_str()),
            "dateOfBirth" => Some(self.date_of_birth.as_str()),
            "address.street" => Some(self.address.street.as_str()),
            "address.city" => Some(self.address.city.as_str()),
            "address.state" => Some(self.address.state.as_str()),
            "address.zipCode" => Some(self.address.zip_code.as_str()),
            "password" => Some(self.password.as_str()),
            _ => None,
        }
    }
}
