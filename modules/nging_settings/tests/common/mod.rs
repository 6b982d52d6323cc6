//! Common test utilities: mock store and recording subsystems

#![allow(dead_code)]

use async_trait::async_trait;
use nging_settings::contract::{ConfigEntry, EmailSettings, LogSettings, ValueKind};
use nging_settings::domain::{
    ConfigRepository, DebugSwitch, DefaultsRegistry, LogBackend, MailBackend, Service,
    StaticInstallProbe, Subsystems,
};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub fn print_test_header(test_name: &str, purpose: &[&str]) {
    println!("\n🧪 TEST: {}", test_name);
    if let Some(first) = purpose.first() {
        println!("📋 PURPOSE: {}", first);
    }
    for line in purpose.iter().skip(1) {
        println!("   {}", line);
    }
}

// ===== Repository =====

/// In-memory config table
#[derive(Clone, Default)]
pub struct MockConfigRepository {
    entries: Arc<RwLock<BTreeMap<(String, String), ConfigEntry>>>,
    disconnected: Arc<AtomicBool>,
    failing: Arc<AtomicBool>,
}

impl MockConfigRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(self, group: &str, key: &str, kind: ValueKind, value: &str) -> Self {
        self.insert(ConfigEntry::new(group, key, kind, value));
        self
    }

    pub fn insert(&self, entry: ConfigEntry) {
        self.entries
            .write()
            .insert((entry.group.clone(), entry.key.clone()), entry);
    }

    pub fn get(&self, group: &str, key: &str) -> Option<ConfigEntry> {
        self.entries
            .read()
            .get(&(group.to_string(), key.to_string()))
            .cloned()
    }

    pub fn set_connected(&self, connected: bool) {
        self.disconnected.store(!connected, Ordering::SeqCst);
    }

    /// Make every query fail
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> anyhow::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("mock repository failure");
        }
        Ok(())
    }
}

#[async_trait]
impl ConfigRepository for MockConfigRepository {
    async fn find_enabled(&self, groups: &[&str]) -> anyhow::Result<Vec<ConfigEntry>> {
        self.check()?;
        Ok(self
            .entries
            .read()
            .values()
            .filter(|e| !e.disabled)
            .filter(|e| groups.is_empty() || groups.contains(&e.group.as_str()))
            .cloned()
            .collect())
    }

    async fn find(&self, group: &str, key: &str) -> anyhow::Result<Option<ConfigEntry>> {
        self.check()?;
        Ok(self.get(group, key))
    }

    async fn upsert(&self, entry: &ConfigEntry) -> anyhow::Result<ConfigEntry> {
        self.check()?;
        self.insert(entry.clone());
        Ok(entry.clone())
    }

    async fn is_connected(&self) -> bool {
        !self.disconnected.load(Ordering::SeqCst)
    }
}

// ===== Subsystems =====

#[derive(Default)]
pub struct RecordingLogBackend {
    pub applied: RwLock<Vec<LogSettings>>,
    pub debug_calls: RwLock<Vec<bool>>,
}

impl LogBackend for RecordingLogBackend {
    fn apply(&self, settings: &LogSettings) -> anyhow::Result<()> {
        self.applied.write().push(settings.clone());
        Ok(())
    }

    fn set_debug(&self, on: bool) {
        self.debug_calls.write().push(on);
    }
}

#[derive(Default)]
pub struct RecordingMailBackend {
    pub applied: RwLock<Vec<EmailSettings>>,
}

impl MailBackend for RecordingMailBackend {
    fn apply(&self, settings: &EmailSettings) -> anyhow::Result<()> {
        self.applied.write().push(settings.clone());
        Ok(())
    }
}

pub struct RecordingSwitch {
    name: String,
    pub calls: RwLock<Vec<bool>>,
}

impl RecordingSwitch {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            calls: RwLock::new(Vec::new()),
        }
    }

    pub fn last(&self) -> Option<bool> {
        self.calls.read().last().copied()
    }
}

impl DebugSwitch for RecordingSwitch {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_debug(&self, on: bool) {
        self.calls.write().push(on);
    }
}

// ===== Fixture =====

/// A service wired to recording subsystems
pub struct Fixture {
    pub service: Arc<Service>,
    pub repo: MockConfigRepository,
    pub log: Arc<RecordingLogBackend>,
    pub mail: Arc<RecordingMailBackend>,
    pub switches: Vec<Arc<RecordingSwitch>>,
}

impl Fixture {
    /// `repo` is attached when given; `installed` drives the install probe
    pub fn new(repo: Option<MockConfigRepository>, installed: bool) -> Self {
        let log = Arc::new(RecordingLogBackend::default());
        let mail = Arc::new(RecordingMailBackend::default());
        let switches: Vec<Arc<RecordingSwitch>> = ["db", "notice", "subdomains"]
            .iter()
            .map(|name| Arc::new(RecordingSwitch::new(name)))
            .collect();

        let mut subsystems = Subsystems::new(log.clone(), mail.clone());
        for switch in &switches {
            subsystems = subsystems.with_debug_switch(switch.clone());
        }

        let mut service = Service::new(
            Arc::new(DefaultsRegistry::builtin()),
            Arc::new(StaticInstallProbe(installed)),
            subsystems,
        );
        let repo = repo.unwrap_or_default();
        service = service.with_repository(Arc::new(repo.clone()));

        Self {
            service: Arc::new(service),
            repo,
            log,
            mail,
            switches,
        }
    }

    /// A service without any database-backed store
    pub fn without_repository() -> Service {
        Service::new(
            Arc::new(DefaultsRegistry::builtin()),
            Arc::new(StaticInstallProbe(true)),
            Subsystems::default(),
        )
    }

    pub fn switch(&self, name: &str) -> &RecordingSwitch {
        self.switches
            .iter()
            .find(|s| s.name() == name)
            .map(|s| s.as_ref())
            .unwrap()
    }
}
