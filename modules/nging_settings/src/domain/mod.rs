//! Domain layer - the settings registry and its collaborators

pub mod defaults;
pub mod hooks;
pub mod repository;
pub mod service;
pub mod settings;
pub mod store;
pub mod subsystems;
pub mod validation;

pub use defaults::DefaultsRegistry;
pub use hooks::{HookList, InitHook, SetHook};
pub use repository::ConfigRepository;
pub use service::Service;
pub use store::StoreExt;
pub use subsystems::{
    DebugSwitch, InstallProbe, LogBackend, MailBackend, NoOpLogBackend, NoOpMailBackend,
    StaticInstallProbe, Subsystems,
};
