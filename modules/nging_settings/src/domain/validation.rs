//! Validation of group names, setting keys and raw values

use crate::contract::{SettingsError, ValueKind};

/// Validate an identifier used as a group name or setting key
///
/// Must start with an ASCII letter or digit and may contain letters,
/// digits, '_', '.' and '-'.
fn validate_identifier(what: &str, ident: &str) -> Result<(), SettingsError> {
    let Some(first_char) = ident.chars().next() else {
        return Err(SettingsError::Validation {
            message: format!("{} cannot be empty", what),
        });
    };

    if !first_char.is_ascii_alphanumeric() {
        return Err(SettingsError::Validation {
            message: format!(
                "{} '{}' must start with alphanumeric character",
                what, ident
            ),
        });
    }

    let is_valid = ident
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-');

    if !is_valid {
        return Err(SettingsError::Validation {
            message: format!(
                "{} '{}' contains invalid characters. Only alphanumeric, '_', '.', and '-' are allowed",
                what, ident
            ),
        });
    }

    if ident.len() > 128 {
        return Err(SettingsError::Validation {
            message: format!("{} '{}' is longer than 128 characters", what, ident),
        });
    }

    Ok(())
}

pub fn validate_group_name(group: &str) -> Result<(), SettingsError> {
    validate_identifier("group", group)
}

pub fn validate_setting_key(key: &str) -> Result<(), SettingsError> {
    validate_identifier("key", key)
}

/// Validate a raw value against its kind and the size limit
pub fn validate_value(kind: ValueKind, value: &str, max_size: usize) -> Result<(), SettingsError> {
    if value.len() > max_size {
        return Err(SettingsError::Validation {
            message: format!(
                "value is {} bytes, exceeds the {} byte limit",
                value.len(),
                max_size
            ),
        });
    }

    if kind == ValueKind::Json && !value.trim().is_empty() {
        serde_json::from_str::<serde_json::Value>(value).map_err(|e| {
            SettingsError::Validation {
                message: format!("value is not valid JSON: {}", e),
            }
        })?;
    }

    Ok(())
}
