//! Contract layer - public API for in-process consumers
//!
//! Transport-agnostic models, the error type and the native client trait.

pub mod client;
pub mod error;
pub mod model;

pub use client::SettingsApi;
pub use error::SettingsError;
pub use model::{
    ConfigEntry, ConfigMap, EmailSettings, Group, LogSettings, LogTarget, Settings, SmtpSettings,
    ValueKind,
};
