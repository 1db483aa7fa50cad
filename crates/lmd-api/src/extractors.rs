//! # Custom Extractors & Validation
//!
//! Provides the [`Validate`] trait for request DTOs and helpers to extract
//! and validate JSON bodies in handlers. Mirrors the native-input-validation
//! behavior of the console forms: missing or malformed required fields block
//! the action with a 422 before any registry is touched.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::AppError;

/// Trait for request types that validate business rules beyond what serde
/// deserialization checks.
pub trait Validate {
    /// Validate business rules. Returns an error message on failure.
    fn validate(&self) -> Result<(), String>;
}

/// Extract a JSON body, mapping deserialization errors to
/// [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a JSON body and validate it using the [`Validate`] trait.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}

/// Require a non-empty, bounded string field.
///
/// The consoles mark these fields `required` with `maxlength`; the server
/// repeats the check so the rule holds without the form.
pub fn require_field(name: &str, value: &str) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{name} is required"));
    }
    if trimmed.len() > 255 {
        return Err(format!("{name} must not exceed 255 characters"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_field_accepts_normal_values() {
        assert!(require_field("applicant", "Precision Scales Ltd").is_ok());
    }

    #[test]
    fn require_field_rejects_empty_and_whitespace() {
        assert!(require_field("applicant", "").is_err());
        assert!(require_field("applicant", "   ").is_err());
    }

    #[test]
    fn require_field_rejects_oversized_values() {
        let long = "x".repeat(256);
        let err = require_field("applicant", &long).unwrap_err();
        assert!(err.contains("255"));
    }
}
