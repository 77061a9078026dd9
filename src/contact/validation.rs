//! Payload checks that run before any store access.

use thiserror::Error;

use super::{ContactPatch, ContactPayload, NewContact};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name or number missing")]
    MissingField,
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Both `name` and `number` must be present and non-blank.
pub fn validate_new(payload: &ContactPayload) -> Result<NewContact, ValidationError> {
    match (present(&payload.name), present(&payload.number)) {
        (Some(name), Some(number)) => Ok(NewContact { name, number }),
        _ => Err(ValidationError::MissingField),
    }
}

/// Absent fields are left alone; a field that is sent must not be blank.
pub fn validate_patch(payload: &ContactPayload) -> Result<ContactPatch, ValidationError> {
    let field = |value: &Option<String>, label: &'static str| match value {
        None => Ok(None),
        Some(_) => present(value).map(Some).ok_or(ValidationError::EmptyField(label)),
    };

    Ok(ContactPatch {
        name: field(&payload.name, "name")?,
        number: field(&payload.number, "number")?,
    })
}
