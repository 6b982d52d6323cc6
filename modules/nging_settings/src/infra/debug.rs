//! Shared debug flag for components without their own settings type

use crate::domain::DebugSwitch;
use std::sync::atomic::{AtomicBool, Ordering};

/// Named atomic debug flag (notification subsystem, subdomain router)
#[derive(Debug)]
pub struct DebugFlag {
    name: String,
    on: AtomicBool,
}

impl DebugFlag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            on: AtomicBool::new(false),
        }
    }

    pub fn is_on(&self) -> bool {
        self.on.load(Ordering::Relaxed)
    }
}

impl DebugSwitch for DebugFlag {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_debug(&self, on: bool) {
        let was = self.on.swap(on, Ordering::Relaxed);
        if was != on {
            tracing::debug!(component = %self.name, on, "Debug flag changed");
        }
    }
}
