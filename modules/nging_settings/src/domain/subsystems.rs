//! Collaborators the registry applies settings to
//!
//! The registry never owns the log, mail, database or routing components.
//! It only pushes applied settings and debug state into them through these traits.

use crate::contract::{EmailSettings, LogSettings};
use std::sync::Arc;

/// Log subsystem: output targets and verbosity
pub trait LogBackend: Send + Sync {
    /// Apply the `log` group
    fn apply(&self, settings: &LogSettings) -> anyhow::Result<()>;

    /// Raise verbosity to debug, or restore it to info
    fn set_debug(&self, on: bool);
}

/// Mail subsystem: receives the normalised `email` group
pub trait MailBackend: Send + Sync {
    fn apply(&self, settings: &EmailSettings) -> anyhow::Result<()>;
}

/// A component whose debug flag follows the registry's debug mode
/// (database layer, notification subsystem, subdomain router)
pub trait DebugSwitch: Send + Sync {
    fn name(&self) -> &str;

    fn set_debug(&self, on: bool);
}

/// Tells whether the installer has completed
pub trait InstallProbe: Send + Sync {
    fn is_installed(&self) -> bool;
}

/// Set of collaborators handed to the registry
#[derive(Clone)]
pub struct Subsystems {
    pub log: Arc<dyn LogBackend>,
    pub mail: Arc<dyn MailBackend>,
    /// Toggled in registration order by `set_debug`
    pub debug_switches: Vec<Arc<dyn DebugSwitch>>,
}

impl Subsystems {
    pub fn new(log: Arc<dyn LogBackend>, mail: Arc<dyn MailBackend>) -> Self {
        Self {
            log,
            mail,
            debug_switches: Vec::new(),
        }
    }

    pub fn with_debug_switch(mut self, switch: Arc<dyn DebugSwitch>) -> Self {
        self.debug_switches.push(switch);
        self
    }
}

impl Default for Subsystems {
    fn default() -> Self {
        Self::new(Arc::new(NoOpLogBackend), Arc::new(NoOpMailBackend))
    }
}

/// Log backend that ignores everything, for tests or embedded use
pub struct NoOpLogBackend;

impl LogBackend for NoOpLogBackend {
    fn apply(&self, _settings: &LogSettings) -> anyhow::Result<()> {
        Ok(())
    }

    fn set_debug(&self, _on: bool) {}
}

/// Mail backend that ignores everything, for tests or when mail is disabled
pub struct NoOpMailBackend;

impl MailBackend for NoOpMailBackend {
    fn apply(&self, _settings: &EmailSettings) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Fixed install state
pub struct StaticInstallProbe(pub bool);

impl InstallProbe for StaticInstallProbe {
    fn is_installed(&self) -> bool {
        self.0
    }
}
