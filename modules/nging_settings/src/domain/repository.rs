//! Repository trait for the database-backed settings store
//!
//! Implementation is in infra/storage/repositories.rs

use crate::contract::ConfigEntry;
use anyhow::Result;
use async_trait::async_trait;

/// Repository for stored configuration entries
#[async_trait]
pub trait ConfigRepository: Send + Sync {
    /// Enabled entries of the given groups; all groups when `groups` is empty
    async fn find_enabled(&self, groups: &[&str]) -> Result<Vec<ConfigEntry>>;

    /// Find an entry by group and key (disabled entries included)
    async fn find(&self, group: &str, key: &str) -> Result<Option<ConfigEntry>>;

    /// Create or update an entry
    async fn upsert(&self, entry: &ConfigEntry) -> Result<ConfigEntry>;

    /// Whether the backing database is reachable
    async fn is_connected(&self) -> bool;
}
