//! Swap Slots - Hot Replacement of a Single Resource
//!
//! A [`SwapSlot`] owns the current instance of one resource and replaces it
//! wholesale on reload.  Readers take a counted handle and keep using the
//! instance they got, even if a reload lands a moment later; the old
//! instance is destroyed when the last of them lets go.
//!
//! # Performance-First Design:
//! - Creation and initialization run outside the lock, so a slow parse never
//!   stalls readers
//! - The critical section is a pointer swap plus a refcount bump
//! - Superseded instances are released after the lock is dropped, so a slow
//!   `destroy()` never extends the critical section either
//!
//! Concurrent reloads race only at the swap: whichever finishes initializing
//! last becomes current, regardless of which one started first.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::fingerprint::fingerprint;
use super::handle::RefHandle;
use super::stats::{SlotStats, SlotStatsSnapshot};
use crate::error::{Result, SwapError};
use crate::resource::{Creator, Resource};

/// Metadata describing the most recent successful reload of a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReloadInfo {
    /// 1 for the initial load, incremented by every later successful swap.
    pub generation: u64,
    pub loaded_at: DateTime<Utc>,
    /// Hex MD5 of the loaded content (or of the inline configuration).
    pub fingerprint: String,
    /// Configuration the current instance was loaded from.
    pub conf: String,
}

/// Serializable view of a slot for admin surfaces.
#[derive(Debug, Clone, Serialize)]
pub struct SlotStatus {
    pub name: String,
    pub generation: u64,
    pub loaded_at: Option<DateTime<Utc>>,
    pub fingerprint: Option<String>,
    /// References to the current instance, including the slot's own.
    pub ref_count: usize,
    pub live_instances: u64,
    pub stats: SlotStatsSnapshot,
}

struct Current<T: Resource> {
    handle: RefHandle<T>,
    info: Option<ReloadInfo>,
}

/// Single-resource container supporting hot swap with deferred destruction.
pub struct SwapSlot<T: Resource> {
    name: String,
    creator: Creator<T>,
    current: Mutex<Current<T>>,
    stats: Arc<SlotStats>,
}

impl<T: Resource> SwapSlot<T> {
    /// Create an empty slot.  Only the registry does this, and it never
    /// exposes a slot before its first successful load.
    pub(crate) fn new(name: impl Into<String>, creator: Creator<T>) -> Self {
        let name = name.into();
        debug!(name = %name, "Creating SwapSlot (empty)");
        Self {
            name,
            creator,
            current: Mutex::new(Current {
                handle: RefHandle::empty(),
                info: None,
            }),
            stats: Arc::new(SlotStats::new()),
        }
    }

    /// Build a new instance from `conf` and, if it initializes, make it current.
    ///
    /// On failure nothing about the slot changes: the current instance,
    /// timestamp and fingerprint stay as they were, and the failed instance
    /// is dropped without `destroy()`.
    pub fn attempt_reload(&self, conf: &str) -> Result<ReloadInfo> {
        let started = Instant::now();

        let mut target = (self.creator)();
        if let Err(source) = target.initialize(conf) {
            self.stats.record_failed_reload();
            let reason = format!("{source:#}");
            warn!(
                name = %self.name,
                error = %reason,
                "Reload failed, keeping current instance"
            );
            return Err(SwapError::Init {
                name: self.name.clone(),
                source,
            });
        }

        let fingerprint = fingerprint(conf);

        let (info, previous) = {
            let mut current = self.current.lock();
            let generation = current.info.as_ref().map_or(0, |i| i.generation) + 1;
            let info = ReloadInfo {
                generation,
                loaded_at: Utc::now(),
                fingerprint,
                conf: conf.to_owned(),
            };
            let handle = RefHandle::installed(target, generation, self.stats.clone());
            let previous = std::mem::replace(&mut current.handle, handle);
            current.info = Some(info.clone());
            (info, previous)
        };
        // The slot's share of the old instance; destroys it now if no reader holds it.
        previous.release();

        self.stats.record_reload();
        info!(
            name = %self.name,
            generation = info.generation,
            fingerprint = %info.fingerprint,
            elapsed_us = started.elapsed().as_micros() as u64,
            "Resource reloaded"
        );
        Ok(info)
    }

    /// Take a counted reference to the current instance.
    ///
    /// The caller owns exactly one reference and gives it back with
    /// [`RefHandle::release`] or by dropping it.
    pub fn acquire(&self) -> RefHandle<T> {
        let handle = self.current.lock().handle.acquire_copy();
        self.stats.record_acquire();
        handle
    }

    /// Run `f` against the current instance, releasing it afterwards.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let handle = self.acquire();
        let result = handle.target().map(f);
        handle.release();
        result
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Time of the last successful reload, `None` before the first one.
    pub fn last_reload_time(&self) -> Option<DateTime<Utc>> {
        self.current.lock().info.as_ref().map(|i| i.loaded_at)
    }

    /// Fingerprint of the last successful reload, `None` before the first one.
    pub fn last_fingerprint(&self) -> Option<String> {
        self.current.lock().info.as_ref().map(|i| i.fingerprint.clone())
    }

    /// Configuration of the current instance, `None` before the first load.
    ///
    /// Written in the same critical section as the swap, so it always names
    /// what `acquire()` returns even when reloads race.
    pub fn last_conf(&self) -> Option<String> {
        self.current.lock().info.as_ref().map(|i| i.conf.clone())
    }

    pub fn reload_info(&self) -> Option<ReloadInfo> {
        self.current.lock().info.clone()
    }

    /// Generation of the current instance, 0 before the first load.
    pub fn generation(&self) -> u64 {
        self.current.lock().info.as_ref().map_or(0, |i| i.generation)
    }

    /// References to the current instance, including the slot's own.
    pub fn ref_count(&self) -> usize {
        self.current.lock().handle.count()
    }

    pub fn stats(&self) -> SlotStatsSnapshot {
        self.stats.snapshot()
    }

    pub fn status(&self) -> SlotStatus {
        let (generation, loaded_at, fingerprint, ref_count) = {
            let current = self.current.lock();
            let info = current.info.as_ref();
            (
                info.map_or(0, |i| i.generation),
                info.map(|i| i.loaded_at),
                info.map(|i| i.fingerprint.clone()),
                current.handle.count(),
            )
        };
        SlotStatus {
            name: self.name.clone(),
            generation,
            loaded_at,
            fingerprint,
            ref_count,
            live_instances: self.stats.live_instances(),
            stats: self.stats.snapshot(),
        }
    }
}

impl<T: Resource> fmt::Debug for SwapSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwapSlot")
            .field("name", &self.name)
            .field("generation", &self.generation())
            .field("ref_count", &self.ref_count())
            .finish()
    }
}
