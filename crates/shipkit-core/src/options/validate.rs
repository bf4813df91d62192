use std::str::FromStr;

use crate::error::ConfigurationError;

/// Construction-time check of an attribute set. Options nodes call it once,
/// before they exist; serializers rely on it and never re-validate.
pub trait Validate {
    fn validate(&self) -> Result<(), ConfigurationError>;
}

impl Validate for () {
    fn validate(&self) -> Result<(), ConfigurationError> {
        Ok(())
    }
}

pub fn require_non_empty(attribute: &'static str, value: &str) -> Result<(), ConfigurationError> {
    if value.trim().is_empty() {
        return Err(ConfigurationError::MissingAttribute { attribute });
    }
    Ok(())
}

/// Unwraps a caller-supplied value, treating blank text as absent.
pub fn require_present(
    attribute: &'static str,
    value: Option<String>,
) -> Result<String, ConfigurationError> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .ok_or(ConfigurationError::MissingAttribute { attribute })
}

pub fn require_digits(
    attribute: &'static str,
    value: Option<&str>,
) -> Result<(), ConfigurationError> {
    match value {
        Some(raw) if raw.is_empty() || !raw.bytes().all(|byte| byte.is_ascii_digit()) => {
            Err(ConfigurationError::NonNumeric {
                attribute,
                value: raw.to_string(),
            })
        }
        _ => Ok(()),
    }
}

pub fn parse_optional<T>(raw: Option<&str>) -> Result<Option<T>, ConfigurationError>
where
    T: FromStr<Err = ConfigurationError>,
{
    raw.map(str::parse).transpose()
}

pub fn parse_all<T>(raw: &[String]) -> Result<Vec<T>, ConfigurationError>
where
    T: FromStr<Err = ConfigurationError>,
{
    raw.iter().map(|value| value.parse()).collect()
}
