//! Infrastructure - storage and the subsystems settings are applied to

pub mod debug;
pub mod install;
pub mod logging;
pub mod mail;
pub mod storage;

pub use debug::DebugFlag;
pub use install::LockFileProbe;
pub use logging::LogController;
pub use mail::MailerSlot;
