//! Nging Settings Module
//!
//! Settings registry for the Nging admin toolbox. Configuration is organised
//! in named groups (`base`, `email`, `log`) merged into one store; typed views
//! of the recognised groups are applied to the subsystems they drive, and
//! components observe initialisation and reloads through ordered hooks.

// Public exports
pub mod contract;
pub use contract::{
    client::SettingsApi, error::SettingsError, ConfigEntry, ConfigMap, EmailSettings, Group,
    LogSettings, LogTarget, Settings, SmtpSettings, ValueKind,
};

pub mod config;
pub use config::Config;

pub mod module;
pub use module::SettingsModule;

pub mod domain;
pub use domain::{Service, StoreExt};

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod infra;
