// src/extractors/email.rs
use std::str::FromStr;

use email_address::EmailAddress;

use crate::utils::error::EmailValidationError;

/// Validates an address syntactically and returns its normalized form.
///
/// No DNS lookups are made. Normalization lower-cases the domain and leaves the
/// local part untouched, since local parts may be case-sensitive.
pub fn validate_email(candidate: &str) -> Result<String, EmailValidationError> {
    let parsed = EmailAddress::from_str(candidate.trim())?;
    Ok(format!("{}@{}", parsed.local_part(), parsed.domain().to_ascii_lowercase()))
}
