//! Input validation for API requests and forms.
//!
//! Single-value validators return `Result<(), String>`; the activity
//! validators collect every problem through `ValidationErrorBuilder` so one
//! response lists all offending fields.

use lazy_static::lazy_static;
use regex::Regex;

use super::error::{ApiError, ValidationErrorBuilder};
use crate::db::{ActivityPatch, NewActivity};

lazy_static! {
    /// Basic `local@domain.tld` shape, no whitespace
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

const REQUIRED_ACTIVITY_FIELDS: [&str; 3] = ["name", "location", "category"];

/// Validate an email address shape
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }
    if email.len() > 254 {
        return Err("Email is too long (max 254 characters)".to_string());
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err("Please enter a valid email address".to_string());
    }
    Ok(())
}

/// Validate an optional price: finite and not negative
pub fn validate_price(price: Option<f64>) -> Result<(), String> {
    match price {
        Some(p) if !p.is_finite() => Err("Price must be a number".to_string()),
        Some(p) if p < 0.0 => Err("Price cannot be negative".to_string()),
        _ => Ok(()),
    }
}

fn missing_fields_error(builder: ValidationErrorBuilder, missing: &[&str]) -> Result<(), ApiError> {
    match builder.build() {
        Some(err) if !missing.is_empty() => Err(err.with_message(format!(
            "Missing required fields: {}",
            missing.join(", ")
        ))),
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Validate a create request. Whitespace-only counts as missing.
pub fn validate_new_activity(new: &NewActivity) -> Result<(), ApiError> {
    let mut builder = ValidationErrorBuilder::new();
    let values = [&new.name, &new.location, &new.category];

    let mut missing = Vec::new();
    for (field, value) in REQUIRED_ACTIVITY_FIELDS.iter().zip(values) {
        if value.trim().is_empty() {
            builder.add(*field, format!("{} is required", field));
            missing.push(*field);
        }
    }

    if let Err(e) = validate_price(new.price) {
        builder.add("price", e);
    }

    missing_fields_error(builder, &missing)
}

/// Validate a partial update: supplied required fields must not be blank.
pub fn validate_activity_patch(patch: &ActivityPatch) -> Result<(), ApiError> {
    let mut builder = ValidationErrorBuilder::new();
    let values = [&patch.name, &patch.location, &patch.category];

    let mut missing = Vec::new();
    for (field, value) in REQUIRED_ACTIVITY_FIELDS.iter().zip(values) {
        if matches!(value, Some(v) if v.trim().is_empty()) {
            builder.add(*field, format!("{} cannot be empty", field));
            missing.push(*field);
        }
    }

    if let Err(e) = validate_price(patch.price.flatten()) {
        builder.add("price", e);
    }

    missing_fields_error(builder, &missing)
}
