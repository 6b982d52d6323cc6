//! Default settings registry
//!
//! Holds the default entry of every known setting, grouped and in registration
//! order. Used as the store before installation and to fill groups the
//! database has no rows for.

use super::store::entries_to_store;
use super::validation::{validate_group_name, validate_setting_key};
use crate::contract::{ConfigEntry, ConfigMap, ValueKind};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Ordered default entries per group
#[derive(Debug, Clone, Default)]
pub struct DefaultsRegistry {
    groups: Vec<(String, Vec<ConfigEntry>)>,
}

/// One default as written in a YAML defaults file
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct YamlDefault {
    value: serde_yaml::Value,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    label: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    disabled: bool,
}

impl DefaultsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the stock `base`, `email` and `log` defaults
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(
            "base",
            [
                ConfigEntry::new("base", "debug", ValueKind::Text, "0")
                    .with_label("Debug mode"),
                ConfigEntry::new("base", "apiKey", ValueKind::Text, "")
                    .with_label("API key")
                    .with_description("Secret used to sign API requests"),
            ],
        );
        registry.register(
            "email",
            [
                ConfigEntry::new("email", "engine", ValueKind::Text, "email")
                    .with_label("Delivery engine")
                    .with_description("email (SMTP) or send-cloud"),
                ConfigEntry::new("email", "sender", ValueKind::Text, "")
                    .with_label("Sender address"),
                ConfigEntry::new("email", "timeout", ValueKind::Text, "30")
                    .with_label("Timeout (seconds)"),
                ConfigEntry::new("email", "queueSize", ValueKind::Text, "50")
                    .with_label("Queue size"),
                ConfigEntry::new(
                    "email",
                    "smtp",
                    ValueKind::Json,
                    r#"{"username":"","password":"","host":"","port":25,"secure":"","identity":""}"#,
                )
                .with_label("SMTP server"),
            ],
        );
        registry.register(
            "log",
            [
                ConfigEntry::new("log", "debug", ValueKind::Text, "0").with_label("Debug output"),
                ConfigEntry::new("log", "colorable", ValueKind::Text, "0")
                    .with_label("Colored console output"),
                ConfigEntry::new("log", "saveFile", ValueKind::Text, "data/logs/nging.log")
                    .with_label("Log file"),
                ConfigEntry::new("log", "fileMaxBytes", ValueKind::Text, "10485760")
                    .with_label("Rotate log file after (bytes)"),
                ConfigEntry::new("log", "targets", ValueKind::Text, "console")
                    .with_label("Targets")
                    .with_description("Comma separated: console, file"),
            ],
        );
        registry
    }

    /// Add defaults to `group`; an entry with an existing key replaces it in place
    pub fn register(&mut self, group: &str, entries: impl IntoIterator<Item = ConfigEntry>) {
        let idx = match self.groups.iter().position(|(name, _)| name == group) {
            Some(idx) => idx,
            None => {
                self.groups.push((group.to_string(), Vec::new()));
                self.groups.len() - 1
            }
        };
        let existing = &mut self.groups[idx].1;
        for mut entry in entries {
            entry.group = group.to_string();
            match existing.iter_mut().find(|e| e.key == entry.key) {
                Some(slot) => *slot = entry,
                None => existing.push(entry),
            }
        }
    }

    pub fn entry(&self, group: &str, key: &str) -> Option<&ConfigEntry> {
        self.groups
            .iter()
            .find(|(name, _)| name == group)
            .and_then(|(_, entries)| entries.iter().find(|e| e.key == key))
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(name, _)| name.as_str())
    }

    /// Decode every default into a store
    pub fn as_store(&self) -> ConfigMap {
        entries_to_store(self.groups.iter().flat_map(|(_, entries)| entries.iter()))
    }

    /// Merge defaults from a YAML file of `group -> key -> {value, kind, label, description}`
    pub fn load_yaml(&mut self, path: &Path) -> Result<()> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read defaults file {}", path.display()))?;
        self.load_yaml_str(&raw)
            .with_context(|| format!("invalid defaults file {}", path.display()))
    }

    pub fn load_yaml_str(&mut self, raw: &str) -> Result<()> {
        let parsed: BTreeMap<String, BTreeMap<String, YamlDefault>> = serde_yaml::from_str(raw)?;
        for (group, items) in parsed {
            validate_group_name(&group)?;
            let mut entries = Vec::with_capacity(items.len());
            for (key, item) in items {
                validate_setting_key(&key)?;
                entries.push(yaml_entry(&group, key, item)?);
            }
            tracing::debug!(group = %group, count = entries.len(), "Loaded settings defaults");
            self.register(&group, entries);
        }
        Ok(())
    }
}

fn yaml_entry(group: &str, key: String, item: YamlDefault) -> Result<ConfigEntry> {
    let explicit_kind = match item.kind.as_deref() {
        Some(kind) => Some(
            ValueKind::parse(kind)
                .ok_or_else(|| anyhow::anyhow!("unknown value kind '{kind}' for {group}.{key}"))?,
        ),
        None => None,
    };

    // Scalars keep their text form; structured YAML values are stored as JSON
    let (value, inferred_kind) = match item.value {
        serde_yaml::Value::Null => (String::new(), ValueKind::Text),
        serde_yaml::Value::Bool(b) => ((if b { "1" } else { "0" }).to_string(), ValueKind::Text),
        serde_yaml::Value::Number(n) => (n.to_string(), ValueKind::Text),
        serde_yaml::Value::String(s) => (s, ValueKind::Text),
        other => {
            let json: serde_json::Value = serde_yaml::from_value(other)?;
            (serde_json::to_string(&json)?, ValueKind::Json)
        }
    };

    let mut entry = ConfigEntry::new(group, key, explicit_kind.unwrap_or(inferred_kind), value)
        .with_label(item.label)
        .with_description(item.description);
    entry.disabled = item.disabled;
    Ok(entry)
}
