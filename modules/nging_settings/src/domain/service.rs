//! Domain service - the settings registry
//!
//! Owns the merged configuration store, the typed view of the recognised
//! groups and the init/set hook lists. Components share one `Service` behind
//! an `Arc` instead of reading a process-wide global.

use super::defaults::DefaultsRegistry;
use super::hooks::{HookList, InitHook, SetHook};
use super::repository::ConfigRepository;
use super::store::{descend, entries_to_store, lookup};
use super::subsystems::{InstallProbe, Subsystems};
use super::validation::{validate_group_name, validate_setting_key, validate_value};
use crate::contract::{
    ConfigEntry, ConfigMap, EmailSettings, Group, LogSettings, Settings, SettingsError,
};
use parking_lot::RwLock;
use std::sync::Arc;

/// Default maximum size of a single raw value
pub const DEFAULT_MAX_VALUE_SIZE: usize = 64 * 1024;

/// Settings registry
pub struct Service {
    defaults: Arc<DefaultsRegistry>,
    repository: Option<Arc<dyn ConfigRepository>>,
    install: Arc<dyn InstallProbe>,
    subsystems: Subsystems,
    max_value_size: usize,
    /// Merged store: group -> nested key/value
    store: RwLock<ConfigMap>,
    settings: RwLock<Settings>,
    init_hooks: HookList<InitHook>,
    set_hooks: HookList<SetHook>,
}

impl Service {
    /// Create a registry without a database-backed store
    pub fn new(
        defaults: Arc<DefaultsRegistry>,
        install: Arc<dyn InstallProbe>,
        subsystems: Subsystems,
    ) -> Self {
        Self {
            defaults,
            repository: None,
            install,
            subsystems,
            max_value_size: DEFAULT_MAX_VALUE_SIZE,
            store: RwLock::new(ConfigMap::new()),
            settings: RwLock::new(Settings::default()),
            init_hooks: HookList::new(),
            set_hooks: HookList::new(),
        }
    }

    /// Attach the database-backed store
    pub fn with_repository(mut self, repository: Arc<dyn ConfigRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Limit the raw size of values accepted by `update_setting`
    pub fn with_max_value_size(mut self, max_value_size: usize) -> Self {
        self.max_value_size = max_value_size;
        self
    }

    // ===== Hooks =====

    /// Register a hook fired once `init` has applied every group
    pub fn on_init_settings<H>(&self, hook: H)
    where
        H: Fn(&ConfigMap) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.init_hooks.register(hook);
    }

    /// Register a hook fired for each group reloaded by `set_configs`.
    /// The hook sees the store as it was before the group is merged.
    pub fn on_set_settings<H>(&self, hook: H)
    where
        H: Fn(&str, &ConfigMap) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.set_hooks.register(hook);
    }

    /// Run the init hooks in order, stopping at the first error
    pub fn fire_init_settings(&self, cfg: &ConfigMap) -> anyhow::Result<()> {
        self.init_hooks.fire(cfg)
    }

    /// Run the set hooks for `group` in order, stopping at the first error
    pub fn fire_set_settings(&self, group: &str, cfg: &ConfigMap) -> anyhow::Result<()> {
        self.set_hooks.fire(group, cfg)
    }

    // ===== Lifecycle =====

    /// Load defaults (or the database store once installed), apply every
    /// recognised group and fire the init hooks.
    pub async fn init(&self) {
        let defaults = self.defaults.as_store();

        let mut configs = match self.connected_repository().await {
            Some(repository) => match repository.find_enabled(&[]).await {
                Ok(entries) => {
                    tracing::info!(entries = entries.len(), "Loaded settings from database");
                    entries_to_store(&entries)
                }
                Err(e) => {
                    tracing::error!("Failed to load settings from database, using defaults: {:#}", e);
                    defaults.clone()
                }
            },
            None => {
                tracing::info!("Using default settings");
                defaults.clone()
            }
        };

        *self.store.write() = configs.clone();
        for group in Group::ALL {
            self.set_config(group.as_str(), &mut configs, Some(&defaults));
        }
        // set_config may have filled missing groups from defaults
        *self.store.write() = configs.clone();

        if let Err(e) = self.fire_init_settings(&configs) {
            tracing::error!("{:#}", e);
        }
    }

    /// Re-read `groups` from the database store and apply them.
    ///
    /// For each group returned: set hooks fire with the current store, the
    /// group is merged, then its typed settings are re-applied. Hook errors
    /// are logged. Returns the applied group names.
    pub async fn set_configs(&self, groups: &[&str]) -> Result<Vec<String>, SettingsError> {
        let repository = self.repository.as_ref().ok_or_else(no_repository)?;

        let entries = repository.find_enabled(groups).await.map_err(|e| {
            tracing::error!("Failed to load settings groups {:?}: {:#}", groups, e);
            SettingsError::Internal
        })?;

        let loaded = entries_to_store(&entries);
        let mut applied = Vec::with_capacity(loaded.len());
        for (group, conf) in loaded {
            let current = self.get_config();
            if let Err(e) = self.fire_set_settings(&group, &current) {
                tracing::error!(group = %group, "{:#}", e);
            }

            let mut working = {
                let mut store = self.store.write();
                store.insert(group.clone(), conf);
                store.clone()
            };
            self.set_config(&group, &mut working, None);

            tracing::debug!(group = %group, "Settings group reloaded");
            applied.push(group);
        }

        Ok(applied)
    }

    /// Apply one group of `cfg` to the typed settings and its subsystem.
    ///
    /// When `cfg` lacks the group and `defaults` is given, the default group
    /// is copied into `cfg` first. Groups other than base/email/log are ignored.
    pub fn set_config(&self, group: &str, cfg: &mut ConfigMap, defaults: Option<&ConfigMap>) {
        match Group::parse(group) {
            Some(Group::Base) => {
                let debug = {
                    let mut settings = self.settings.write();
                    settings.set_by(cfg, defaults);
                    settings.debug
                };
                self.set_debug(debug);
            }
            Some(Group::Email) => {
                let mut email = EmailSettings::default();
                email.set_by(cfg, defaults).init();
                if let Err(e) = self.subsystems.mail.apply(&email) {
                    tracing::error!("Failed to apply email settings: {:#}", e);
                }
                self.settings.write().email = email;
            }
            Some(Group::Log) => {
                let mut log = LogSettings::default();
                log.set_by(cfg, defaults).init();
                if let Err(e) = self.subsystems.log.apply(&log) {
                    tracing::error!("Failed to apply log settings: {:#}", e);
                }
                self.settings.write().log = log;
            }
            None => {}
        }
    }

    /// Toggle debug mode on the settings, the log subsystem and every debug switch
    pub fn set_debug(&self, on: bool) {
        {
            let mut settings = self.settings.write();
            settings.log.debug = on;
            settings.debug = on;
        }

        for switch in &self.subsystems.debug_switches {
            switch.set_debug(on);
        }

        if on {
            tracing::info!("Currently running in debug mode");
        } else {
            tracing::info!("Currently running in normal mode");
        }
        self.subsystems.log.set_debug(on);
    }

    // ===== Reads =====

    /// Snapshot of the merged store
    pub fn get_config(&self) -> ConfigMap {
        self.store.read().clone()
    }

    /// Whole store for an empty path, otherwise the map found by descending it
    pub fn setting(&self, path: &[&str]) -> ConfigMap {
        descend(&self.store.read(), path)
    }

    /// Value (map or leaf) at `path`, `None` when any segment is missing
    pub fn lookup(&self, path: &[&str]) -> Option<serde_json::Value> {
        lookup(&self.store.read(), path).cloned()
    }

    /// Typed view of the applied groups
    pub fn settings(&self) -> Settings {
        self.settings.read().clone()
    }

    pub fn defaults(&self) -> &DefaultsRegistry {
        &self.defaults
    }

    // ===== Writes =====

    /// Persist one entry and refresh its group.
    ///
    /// The entry must exist in the database store or be a registered default;
    /// its kind decides how the value is validated. Disabled entries are
    /// rejected.
    pub async fn update_setting(
        &self,
        group: &str,
        key: &str,
        value: String,
    ) -> Result<ConfigEntry, SettingsError> {
        validate_group_name(group)?;
        validate_setting_key(key)?;
        let repository = self.repository.as_ref().ok_or_else(no_repository)?;

        let existing = repository.find(group, key).await.map_err(|e| {
            tracing::error!("Failed to read setting {}.{}: {:#}", group, key, e);
            SettingsError::Internal
        })?;

        let mut entry = existing
            .or_else(|| self.defaults.entry(group, key).cloned())
            .ok_or_else(|| SettingsError::NotFound {
                resource: "setting".to_string(),
                id: format!("{}.{}", group, key),
            })?;

        // disabled entries never reach the store, an update would be lost
        if entry.disabled {
            return Err(SettingsError::Validation {
                message: format!("setting {}.{} is disabled", group, key),
            });
        }

        validate_value(entry.kind, &value, self.max_value_size)?;
        entry.value = value;
        entry.updated_at = Some(chrono::Utc::now());

        let saved = repository.upsert(&entry).await.map_err(|e| {
            tracing::error!("Failed to save setting {}.{}: {:#}", group, key, e);
            SettingsError::Internal
        })?;
        tracing::info!(group, key, "Setting updated");

        self.set_configs(&[group]).await?;
        Ok(saved)
    }

    // ===== Helpers =====

    /// The repository, when installation is complete and the database answers
    async fn connected_repository(&self) -> Option<Arc<dyn ConfigRepository>> {
        if !self.install.is_installed() {
            return None;
        }
        let repository = self.repository.as_ref()?;
        if repository.is_connected().await {
            Some(repository.clone())
        } else {
            tracing::warn!("Settings database is not reachable");
            None
        }
    }
}

fn no_repository() -> SettingsError {
    SettingsError::Unavailable {
        reason: "no database-backed settings store".to_string(),
    }
}
