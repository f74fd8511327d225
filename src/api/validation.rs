use validator::{Validate, ValidateEmail};

use crate::api::errors::ApiError;
use crate::core::time::parse_date;

pub(crate) const MIN_PHONE_DIGITS: usize = 10;
pub(crate) const ALL_FIELDS_REQUIRED: &str = "All fields are required";

/// Digits only, optionally led by `+`, at least ten characters overall.
pub(crate) fn validate_phone(phone: &str) -> Result<(), ApiError> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    let valid = phone.chars().count() >= MIN_PHONE_DIGITS
        && !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit());

    if valid {
        Ok(())
    } else {
        Err(ApiError::bad_request("Invalid phone number"))
    }
}

pub(crate) fn validate_email(email: &str) -> Result<(), ApiError> {
    if email.validate_email() {
        Ok(())
    } else {
        Err(ApiError::bad_request("Invalid email format"))
    }
}

pub(crate) fn validate_dob(dob: &str) -> Result<time::Date, ApiError> {
    parse_date(dob).ok_or_else(|| ApiError::bad_request("Invalid DOB, expected YYYY-MM-DD"))
}

pub(crate) fn validate_age(age: i32) -> Result<(), ApiError> {
    if age > 0 {
        Ok(())
    } else {
        Err(ApiError::bad_request("Age must be a positive number"))
    }
}

/// Runs derive-based field rules and reports them as a 400.
pub(crate) fn validate_payload(payload: &impl Validate) -> Result<(), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// Unwraps a required field or fails with `message`.
pub(crate) fn required<T>(value: Option<T>, message: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::bad_request(message))
}
