//! Native client trait for in-process consumers
//!
//! Other components read merged settings and trigger reloads through this
//! trait instead of reaching into the registry directly.

use super::{
    error::SettingsError,
    model::{ConfigEntry, ConfigMap, Settings},
};
use async_trait::async_trait;

/// Settings registry API for in-process communication
#[async_trait]
pub trait SettingsApi: Send + Sync {
    /// Merged store, or the map found by descending `path` (group, then keys).
    /// Missing segments yield an empty map.
    fn setting(&self, path: &[&str]) -> ConfigMap;

    /// Typed view of the applied groups
    fn settings(&self) -> Settings;

    /// Re-read the given groups from the database-backed store and re-apply them.
    /// Returns the groups that were applied.
    async fn reload_groups(&self, groups: &[String]) -> Result<Vec<String>, SettingsError>;

    /// Persist a single entry and refresh its group
    async fn update_setting(
        &self,
        group: &str,
        key: &str,
        value: String,
    ) -> Result<ConfigEntry, SettingsError>;

    /// Toggle debug mode across dependent subsystems
    fn set_debug(&self, on: bool);
}
