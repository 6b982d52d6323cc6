//! Ordered, append-only hook lists fired on settings init and update

use crate::contract::ConfigMap;
use anyhow::Context;
use parking_lot::RwLock;
use std::sync::Arc;

/// Called once after `init` with the merged store
pub type InitHook = dyn Fn(&ConfigMap) -> anyhow::Result<()> + Send + Sync;

/// Called for each reloaded group with the store as it was before the merge
pub type SetHook = dyn Fn(&str, &ConfigMap) -> anyhow::Result<()> + Send + Sync;

/// Append-only list of callbacks, fired in registration order
pub struct HookList<F: ?Sized> {
    hooks: RwLock<Vec<Arc<F>>>,
}

impl<F: ?Sized> Default for HookList<F> {
    fn default() -> Self {
        Self {
            hooks: RwLock::new(Vec::new()),
        }
    }
}

impl<F: ?Sized> HookList<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, hook: Arc<F>) {
        self.hooks.write().push(hook);
    }

    pub fn len(&self) -> usize {
        self.hooks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.read().is_empty()
    }

    /// Copy of the current list; hooks run without the lock held so they may register more hooks
    fn snapshot(&self) -> Vec<Arc<F>> {
        self.hooks.read().clone()
    }
}

impl HookList<InitHook> {
    pub fn register<H>(&self, hook: H)
    where
        H: Fn(&ConfigMap) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.push(Arc::new(hook));
    }

    /// Run every hook in order, stopping at the first error
    pub fn fire(&self, cfg: &ConfigMap) -> anyhow::Result<()> {
        for (idx, hook) in self.snapshot().iter().enumerate() {
            hook(cfg).with_context(|| format!("init settings hook #{idx} failed"))?;
        }
        Ok(())
    }
}

impl HookList<SetHook> {
    pub fn register<H>(&self, hook: H)
    where
        H: Fn(&str, &ConfigMap) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.push(Arc::new(hook));
    }

    /// Run every hook in order, stopping at the first error
    pub fn fire(&self, group: &str, cfg: &ConfigMap) -> anyhow::Result<()> {
        for (idx, hook) in self.snapshot().iter().enumerate() {
            hook(group, cfg)
                .with_context(|| format!("set settings hook #{idx} failed for group '{group}'"))?;
        }
        Ok(())
    }
}
