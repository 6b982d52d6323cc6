//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models

use super::entity;
use crate::contract::{ConfigEntry, ValueKind};

impl From<entity::Model> for ConfigEntry {
    fn from(entity: entity::Model) -> Self {
        let kind = ValueKind::parse(&entity.kind).unwrap_or_else(|| {
            tracing::warn!(
                group = %entity.group,
                key = %entity.key,
                kind = %entity.kind,
                "Unknown config value kind, treating as text"
            );
            ValueKind::Text
        });

        Self {
            group: entity.group,
            key: entity.key,
            label: entity.label,
            value: entity.value,
            kind,
            description: entity.description,
            disabled: entity.disabled,
            updated_at: entity.updated_at,
        }
    }
}

impl From<&ConfigEntry> for entity::ActiveModel {
    fn from(model: &ConfigEntry) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            group: Set(model.group.clone()),
            key: Set(model.key.clone()),
            label: Set(model.label.clone()),
            value: Set(model.value.clone()),
            kind: Set(model.kind.as_str().to_string()),
            description: Set(model.description.clone()),
            disabled: Set(model.disabled),
            updated_at: Set(model.updated_at),
        }
    }
}
