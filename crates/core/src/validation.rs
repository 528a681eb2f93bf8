//! Presence checks for create and update payloads.
//!
//! Create payloads need every required field present and non-blank. Update
//! payloads carry `Option<String>` per field: `None` means "leave as is",
//! `Some("")` is rejected rather than silently ignored.

use crate::error::CoreError;

/// Return the trimmed value if present and non-blank.
pub fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Collect all required values, or fail with `message` if any is missing or
/// blank.
///
/// ```
/// use atelier_core::validation::require_all;
///
/// let [name, city] = require_all([Some("A"), Some(" b ")], "All fields are required").unwrap();
/// assert_eq!((name.as_str(), city.as_str()), ("A", "b"));
/// assert!(require_all([Some("A"), Some("")], "All fields are required").is_err());
/// ```
pub fn require_all<const N: usize>(
    values: [Option<&str>; N],
    message: &str,
) -> Result<[String; N], CoreError> {
    if values.iter().any(|v| present(*v).is_none()) {
        return Err(CoreError::Validation(message.to_string()));
    }
    Ok(values.map(|v| v.unwrap_or_default().trim().to_string()))
}

/// Normalize an optional update field.
///
/// Omitted stays `None`; a provided value is trimmed and must not be blank.
pub fn optional_non_empty(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<String>, CoreError> {
    match value {
        None => Ok(None),
        Some(v) => match present(Some(&v)) {
            Some(trimmed) => Ok(Some(trimmed.to_string())),
            None => Err(CoreError::Validation(format!("{field} must not be empty"))),
        },
    }
}
