//! Contract models for the settings registry
//!
//! These models are shared by the domain service, the storage layer and the
//! transports. The typed settings groups serialize so they can be handed to
//! transports as-is; secrets are never serialized.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Nested key/value bag; one per group, and the merged store of all groups
pub type ConfigMap = serde_json::Map<String, serde_json::Value>;

/// Settings groups the registry knows how to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    /// Top-level flags (API key, debug mode)
    Base,
    /// Outgoing mail configuration
    Email,
    /// Log subsystem configuration
    Log,
}

impl Group {
    /// Groups applied by `init`, in application order
    pub const ALL: [Group; 3] = [Group::Base, Group::Email, Group::Log];

    pub fn as_str(&self) -> &'static str {
        match self {
            Group::Base => "base",
            Group::Email => "email",
            Group::Log => "log",
        }
    }

    /// Parse a group name; `None` for anything outside the recognised set
    pub fn parse(name: &str) -> Option<Group> {
        match name {
            "base" => Some(Group::Base),
            "email" => Some(Group::Email),
            "log" => Some(Group::Log),
            _ => None,
        }
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a stored raw value is decoded into the config store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueKind {
    #[default]
    Text,
    Url,
    Html,
    /// Parsed as JSON into nested values
    Json,
    /// Split on newlines and commas into an array of strings
    List,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Text => "text",
            ValueKind::Url => "url",
            ValueKind::Html => "html",
            ValueKind::Json => "json",
            ValueKind::List => "list",
        }
    }

    pub fn parse(kind: &str) -> Option<ValueKind> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "text" | "" => Some(ValueKind::Text),
            "url" => Some(ValueKind::Url),
            "html" => Some(ValueKind::Html),
            "json" => Some(ValueKind::Json),
            "list" => Some(ValueKind::List),
            _ => None,
        }
    }
}

/// A single stored configuration entry (one row of the config table)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    /// Group the entry belongs to (part of the primary key)
    pub group: String,
    /// Key inside the group (part of the primary key)
    pub key: String,
    /// Human-readable label for admin forms
    pub label: String,
    /// Raw value as stored
    pub value: String,
    /// Decoding rule for `value`
    pub kind: ValueKind,
    pub description: String,
    /// Disabled entries are not loaded into the store
    pub disabled: bool,
    /// Last update timestamp; `None` for built-in defaults
    pub updated_at: Option<DateTime<Utc>>,
}

impl ConfigEntry {
    pub fn new(
        group: impl Into<String>,
        key: impl Into<String>,
        kind: ValueKind,
        value: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            key: key.into(),
            label: String::new(),
            value: value.into(),
            kind,
            description: String::new(),
            disabled: false,
            updated_at: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// SMTP transport settings (`email.smtp`)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmtpSettings {
    pub username: String,
    #[serde(skip)]
    pub password: String,
    pub host: String,
    pub port: u16,
    /// "", "SSL" or "TLS"
    pub secure: String,
    pub identity: String,
}

/// Outgoing mail settings (group `email`)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSettings {
    pub smtp: SmtpSettings,
    /// Delivery timeout in seconds
    pub timeout: i64,
    /// "email" (SMTP) or "send-cloud"
    pub engine: String,
    pub sender: String,
    pub queue_size: i64,
}

/// Log output target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    Console,
    File,
}

/// Log subsystem settings (group `log`)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogSettings {
    pub debug: bool,
    pub colorable: bool,
    /// Log file path used by the `file` target
    pub save_file: String,
    /// Rotation threshold of the log file
    pub file_max_bytes: i64,
    pub targets: Vec<LogTarget>,
}

/// Typed view of the applied settings groups
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Settings {
    pub email: EmailSettings,
    pub log: LogSettings,
    /// API secret from `base.apiKey`
    #[serde(skip)]
    pub api_key: String,
    pub debug: bool,
    /// Raw `base` group
    pub base: ConfigMap,
}
