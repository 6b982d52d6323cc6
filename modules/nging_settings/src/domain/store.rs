//! Config store helpers
//!
//! Loosely typed accessors over [`ConfigMap`] plus the decoding rules that turn
//! stored entries into store values. Stored values come from text columns and
//! admin forms, so the accessors accept numbers and booleans written as strings.

use crate::contract::{ConfigEntry, ConfigMap, ValueKind};
use serde_json::Value;

/// Typed accessors over a config map
pub trait StoreExt {
    /// Nested map under `key`; empty when missing or not an object
    fn store(&self, key: &str) -> ConfigMap;

    fn has(&self, key: &str) -> bool;

    /// String view of a scalar; empty for missing keys, objects and arrays
    fn string(&self, key: &str) -> String;

    /// `true`, non-zero numbers, and "1"/"true"/"on"/"yes"/"y" are truthy
    fn bool(&self, key: &str) -> bool;

    /// Integer view; 0 when missing or unparsable
    fn int64(&self, key: &str) -> i64;
}

impl StoreExt for ConfigMap {
    fn store(&self, key: &str) -> ConfigMap {
        match self.get(key) {
            Some(Value::Object(map)) => map.clone(),
            _ => ConfigMap::new(),
        }
    }

    fn has(&self, key: &str) -> bool {
        self.contains_key(key)
    }

    fn string(&self, key: &str) -> String {
        match self.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    fn bool(&self, key: &str) -> bool {
        match self.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
            Some(Value::String(s)) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "on" | "yes" | "y"
            ),
            _ => false,
        }
    }

    fn int64(&self, key: &str) -> i64 {
        match self.get(key) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|v| v as i64))
                .unwrap_or_default(),
            Some(Value::String(s)) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().map(|v| v as i64))
                    .unwrap_or_default()
            }
            Some(Value::Bool(b)) => i64::from(*b),
            _ => 0,
        }
    }
}

/// Descend `path` (group, then keys) through nested maps.
///
/// An empty path returns the whole store. A missing or non-object segment
/// yields an empty map.
pub fn descend(store: &ConfigMap, path: &[&str]) -> ConfigMap {
    let Some((first, rest)) = path.split_first() else {
        return store.clone();
    };
    rest.iter()
        .fold(store.store(first), |cfg, key| cfg.store(key))
}

/// Strict lookup of `path`; returns leaf values too, `None` when any segment is missing
pub fn lookup<'a>(store: &'a ConfigMap, path: &[&str]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    let mut current = store.get(*first)?;
    for key in rest {
        current = current.as_object()?.get(*key)?;
    }
    Some(current)
}

impl ConfigEntry {
    /// Decode the raw value according to its kind
    pub fn decode(&self) -> Value {
        match self.kind {
            ValueKind::Json => {
                if self.value.trim().is_empty() {
                    return Value::Object(ConfigMap::new());
                }
                serde_json::from_str(&self.value).unwrap_or_else(|e| {
                    tracing::warn!(
                        group = %self.group,
                        key = %self.key,
                        error = %e,
                        "Invalid JSON config value, using empty object"
                    );
                    Value::Object(ConfigMap::new())
                })
            }
            ValueKind::List => Value::Array(
                self.value
                    .split(['\n', ','])
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(|item| Value::String(item.to_string()))
                    .collect(),
            ),
            ValueKind::Text | ValueKind::Url | ValueKind::Html => {
                Value::String(self.value.clone())
            }
        }
    }
}

/// Build a store from entries; disabled entries are skipped, later entries win
pub fn entries_to_store<'a>(entries: impl IntoIterator<Item = &'a ConfigEntry>) -> ConfigMap {
    let mut store = ConfigMap::new();
    for entry in entries.into_iter().filter(|e| !e.disabled) {
        let group = store
            .entry(entry.group.clone())
            .or_insert_with(|| Value::Object(ConfigMap::new()));
        if let Value::Object(map) = group {
            map.insert(entry.key.clone(), entry.decode());
        }
    }
    store
}

/// Replacement for secret values leaving the process
pub const SECRET_MASK: &str = "******";

/// Redact secrets before a store leaves the process
pub fn redact_secrets(store: &mut ConfigMap) {
    if let Some(Value::Object(base)) = store.get_mut("base") {
        if base.contains_key("apiKey") {
            base.insert("apiKey".to_string(), Value::String(SECRET_MASK.to_string()));
        }
    }
    if let Some(Value::Object(email)) = store.get_mut("email") {
        if let Some(Value::Object(smtp)) = email.get_mut("smtp") {
            if smtp.contains_key("password") {
                smtp.insert("password".to_string(), Value::String(SECRET_MASK.to_string()));
            }
        }
    }
}
