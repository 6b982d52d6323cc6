//! Native client implementation - wraps the domain service for in-process calls

use crate::contract::{ConfigEntry, ConfigMap, Settings, SettingsApi, SettingsError};
use crate::domain::Service;
use async_trait::async_trait;
use std::sync::Arc;

/// Native client that calls the domain service directly
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl SettingsApi for NativeClient {
    fn setting(&self, path: &[&str]) -> ConfigMap {
        self.service.setting(path)
    }

    fn settings(&self) -> Settings {
        self.service.settings()
    }

    async fn reload_groups(&self, groups: &[String]) -> Result<Vec<String>, SettingsError> {
        let groups: Vec<&str> = groups.iter().map(String::as_str).collect();
        self.service.set_configs(&groups).await
    }

    async fn update_setting(
        &self,
        group: &str,
        key: &str,
        value: String,
    ) -> Result<ConfigEntry, SettingsError> {
        self.service.update_setting(group, key, value).await
    }

    fn set_debug(&self, on: bool) {
        self.service.set_debug(on);
    }
}
