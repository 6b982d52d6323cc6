//! Module wiring and lifecycle

use crate::api::native::NativeClient;
use crate::config::Config;
use crate::contract::SettingsApi;
use crate::domain::{DefaultsRegistry, LogBackend, Service, Subsystems};
use crate::infra::storage::{Migrator, SeaOrmConfigRepository};
use crate::infra::{DebugFlag, LockFileProbe, LogController, MailerSlot};
use anyhow::{Context, Result};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;

/// Settings module: the registry plus the subsystems it drives.
///
/// Built in two steps so components can register hooks on [`Service`]
/// before [`SettingsModule::start`] loads and applies the settings.
pub struct SettingsModule {
    service: Arc<Service>,
    mailer: Arc<MailerSlot>,
    notice_debug: Arc<DebugFlag>,
    subdomains_debug: Arc<DebugFlag>,
}

impl SettingsModule {
    /// Install the global log subscriber and build the module
    pub async fn init(config: Config) -> Result<Self> {
        let log = LogController::init(&config.log_level, config.log_colorable)?;
        Self::build(config, log).await
    }

    /// Build the module around an existing log backend
    pub async fn build(config: Config, log: Arc<dyn LogBackend>) -> Result<Self> {
        let mut defaults = DefaultsRegistry::builtin();
        if let Some(path) = &config.defaults_file {
            defaults.load_yaml(path)?;
            tracing::info!(path = %path.display(), "Loaded settings defaults file");
        }

        let mailer = Arc::new(MailerSlot::new());
        let notice_debug = Arc::new(DebugFlag::new("notice"));
        let subdomains_debug = Arc::new(DebugFlag::new("subdomains"));

        let mut subsystems = Subsystems::new(log, mailer.clone());
        let mut repository = None;
        if let Some(url) = &config.database_url {
            let db = sea_orm::Database::connect(url.as_str())
                .await
                .context("failed to connect to the settings database")?;

            if config.run_migrations {
                Migrator::up(&db, None).await?;
                tracing::info!("Settings migrations completed");
            }

            let repo = Arc::new(SeaOrmConfigRepository::new(Arc::new(db)));
            subsystems = subsystems.with_debug_switch(repo.clone());
            repository = Some(repo);
        }
        subsystems = subsystems
            .with_debug_switch(notice_debug.clone())
            .with_debug_switch(subdomains_debug.clone());

        let install = Arc::new(LockFileProbe::new(config.install_lock.clone()));
        let mut service = Service::new(Arc::new(defaults), install, subsystems)
            .with_max_value_size(config.max_value_size);
        if let Some(repo) = repository {
            service = service.with_repository(repo);
        }

        Ok(Self {
            service: Arc::new(service),
            mailer,
            notice_debug,
            subdomains_debug,
        })
    }

    /// Load and apply every group, then fire the init hooks
    pub async fn start(&self) {
        self.service.init().await;
        tracing::info!("Settings module started");
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// Native client for in-process consumers
    pub fn client(&self) -> Arc<dyn SettingsApi> {
        Arc::new(NativeClient::new(self.service.clone()))
    }

    /// REST routes over the registry
    pub fn router(&self) -> axum::Router {
        crate::api::rest::register_routes(axum::Router::new(), self.service.clone())
    }

    /// Mailer configuration applied from the `email` group
    pub fn mailer(&self) -> Arc<MailerSlot> {
        self.mailer.clone()
    }

    pub fn notice_debug(&self) -> Arc<DebugFlag> {
        self.notice_debug.clone()
    }

    pub fn subdomains_debug(&self) -> Arc<DebugFlag> {
        self.subdomains_debug.clone()
    }
}
