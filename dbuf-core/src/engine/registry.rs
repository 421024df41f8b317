//! Named Registry of Swap Slots
//!
//! The [`Registry`] maps resource names to [`SwapSlot`]s.  A name only
//! appears once its first load has succeeded, so every slot a caller can see
//! holds a fully initialized instance.
//!
//! A registry is an ordinary value: build one at startup and hand it to
//! whoever needs it (HTTP handlers, admin tooling, tests).  Services that
//! manage several resource types wrap them in one enum implementing
//! [`Resource`] and match on it at the call site.
//!
//! # Performance Pattern: Read-Mostly Lookup
//! ```rust,no_run
//! # use dbuf_core::{Registry, BlockList};
//! let registry = Registry::<BlockList>::new();
//! registry.add("black_id", "/etc/black_id.txt", BlockList::new)?;
//! let slot = registry.get("black_id").expect("registered above");
//! let blocked = slot.with(|list| list.contains("42")).unwrap_or(false);
//! # Ok::<(), dbuf_core::SwapError>(())
//! ```

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::slot::{ReloadInfo, SlotStatus, SwapSlot};
use crate::error::{Result, SwapError};
use crate::resource::{Creator, Resource};

/// Concurrency-safe mapping from name to [`SwapSlot`].
pub struct Registry<T: Resource> {
    slots: RwLock<HashMap<String, Arc<SwapSlot<T>>>>,
}

impl<T: Resource> Registry<T> {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        debug!("Creating Registry");
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Register `name`, loading its first instance from `conf`.
    ///
    /// Fails if the name is taken or the first load fails; in both cases
    /// nothing is registered.  The load runs without holding the registry
    /// lock.  If two callers race to add the same name, one wins and the
    /// other gets [`SwapError::DuplicateName`].
    pub fn add<F>(&self, name: impl Into<String>, conf: &str, creator: F) -> Result<ReloadInfo>
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let name = name.into();
        if self.slots.read().contains_key(&name) {
            warn!(name = %name, "Resource already registered");
            return Err(SwapError::DuplicateName(name));
        }

        let creator: Creator<T> = Arc::new(creator);
        let slot = SwapSlot::new(name.clone(), creator);
        let loaded = slot.attempt_reload(conf)?;

        let mut slots = self.slots.write();
        if slots.contains_key(&name) {
            drop(slots);
            warn!(name = %name, "Resource registered concurrently, discarding this load");
            return Err(SwapError::DuplicateName(name));
        }
        slots.insert(name.clone(), Arc::new(slot));
        drop(slots);

        info!(name = %name, fingerprint = %loaded.fingerprint, "Resource registered");
        Ok(loaded)
    }

    /// Look up the slot registered under `name`.
    pub fn get(&self, name: &str) -> Option<Arc<SwapSlot<T>>> {
        self.slots.read().get(name).cloned()
    }

    /// Reload the slot registered under `name` from `conf`.
    pub fn reload(&self, name: &str, conf: &str) -> Result<ReloadInfo> {
        match self.get(name) {
            Some(slot) => slot.attempt_reload(conf),
            None => {
                warn!(name, "Reload requested for unknown resource");
                Err(SwapError::UnknownName(name.to_owned()))
            }
        }
    }

    /// Unregister `name`.
    ///
    /// The current instance is destroyed once every outstanding handle
    /// (and every `Arc` to the slot) has been dropped.
    pub fn remove(&self, name: &str) -> bool {
        let removed = self.slots.write().remove(name).is_some();
        if removed {
            info!(name, "Resource unregistered");
        }
        removed
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.read().contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.slots.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Status of every slot, sorted by name.
    pub fn status(&self) -> Vec<SlotStatus> {
        let slots: Vec<Arc<SwapSlot<T>>> = self.slots.read().values().cloned().collect();
        let mut status: Vec<SlotStatus> = slots.iter().map(|s| s.status()).collect();
        status.sort_by(|a, b| a.name.cmp(&b.name));
        status
    }

    /// Return the number of registered resources.
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    /// Returns `true` when no resources are registered.
    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }
}

impl<T: Resource> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}
