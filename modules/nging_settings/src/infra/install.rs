//! Installation state from the installer's lock file

use crate::domain::InstallProbe;
use std::path::PathBuf;

/// Installed once the installer has written its lock file
#[derive(Debug, Clone)]
pub struct LockFileProbe {
    lock_file: PathBuf,
}

impl LockFileProbe {
    pub fn new(lock_file: impl Into<PathBuf>) -> Self {
        Self {
            lock_file: lock_file.into(),
        }
    }
}

impl InstallProbe for LockFileProbe {
    fn is_installed(&self) -> bool {
        self.lock_file.is_file()
    }
}
