//! Conversions from contract models to REST DTOs

use super::dto::ConfigEntryDto;
use crate::contract::{ConfigEntry, ConfigMap, Group};
use crate::domain::store::{redact_secrets, SECRET_MASK};
use serde_json::Value;

/// Raw value as it may leave the process
fn masked_value(entry: &ConfigEntry) -> String {
    let group = Group::parse(&entry.group);
    match (group, entry.key.as_str()) {
        (Some(Group::Base), "apiKey") => SECRET_MASK.to_string(),
        (Some(Group::Email), "smtp") => {
            // run the decoded blob through the store redaction
            let mut email = ConfigMap::new();
            email.insert(entry.key.clone(), entry.decode());
            let mut store = ConfigMap::new();
            store.insert(entry.group.clone(), Value::Object(email));
            redact_secrets(&mut store);

            store
                .get(&entry.group)
                .and_then(|email| email.get(&entry.key))
                .map(Value::to_string)
                .unwrap_or_default()
        }
        _ => entry.value.clone(),
    }
}

impl From<ConfigEntry> for ConfigEntryDto {
    fn from(entry: ConfigEntry) -> Self {
        let value = masked_value(&entry);

        Self {
            group: entry.group,
            key: entry.key,
            label: entry.label,
            value,
            kind: entry.kind.as_str().to_string(),
            description: entry.description,
            disabled: entry.disabled,
            updated_at: entry.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::ValueKind;

    #[test]
    fn test_entry_to_dto() {
        let entry = ConfigEntry::new("email", "sender", ValueKind::Text, "nging@example.com")
            .with_label("Sender");
        let dto = ConfigEntryDto::from(entry);

        assert_eq!(dto.group, "email");
        assert_eq!(dto.value, "nging@example.com");
        assert_eq!(dto.kind, "text");
        assert_eq!(dto.label, "Sender");
    }

    #[test]
    fn test_smtp_password_is_masked() {
        let entry = ConfigEntry::new(
            "email",
            "smtp",
            ValueKind::Json,
            r#"{"host":"smtp.example.com","password":"topsecret"}"#,
        );
        let dto = ConfigEntryDto::from(entry);

        assert!(!dto.value.contains("topsecret"));
        let smtp: Value = serde_json::from_str(&dto.value).unwrap();
        assert_eq!(smtp["host"], "smtp.example.com");
        assert_eq!(smtp["password"], SECRET_MASK);
    }

    #[test]
    fn test_api_key_is_masked() {
        let entry = ConfigEntry::new("base", "apiKey", ValueKind::Text, "s3cret");
        let dto = ConfigEntryDto::from(entry);
        assert_eq!(dto.value, SECRET_MASK);
    }
}
