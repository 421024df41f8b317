//! Lifecycle Counters for Swap Slots
//!
//! Lightweight tracking of how often a slot is read, reloaded and how many
//! instances it has created and destroyed.  Useful for admin endpoints and
//! for checking the exactly-once destruction guarantee in tests.
//!
//! # Design Goals:
//! - Lock-free atomic counters
//! - Zero-allocation on the acquire path

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Per-slot counters, shared between a slot and every instance it installed.
#[derive(Debug, Default)]
pub struct SlotStats {
    reloads: AtomicU64,
    failed_reloads: AtomicU64,
    acquires: AtomicU64,
    installed: AtomicU64,
    destroyed: AtomicU64,
}

impl SlotStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_reload(&self) {
        self.reloads.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failed_reload(&self) {
        self.failed_reloads.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_acquire(&self) {
        self.acquires.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_install(&self) {
        self.installed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_destroy(&self) {
        self.destroyed.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of instances installed and not yet destroyed.
    ///
    /// At most one of these is current; the rest are retiring instances
    /// still held by readers.
    pub fn live_instances(&self) -> u64 {
        let installed = self.installed.load(Ordering::Relaxed);
        installed.saturating_sub(self.destroyed.load(Ordering::Relaxed))
    }

    /// Get a snapshot of current counters
    pub fn snapshot(&self) -> SlotStatsSnapshot {
        SlotStatsSnapshot {
            reloads: self.reloads.load(Ordering::Relaxed),
            failed_reloads: self.failed_reloads.load(Ordering::Relaxed),
            acquires: self.acquires.load(Ordering::Relaxed),
            installed: self.installed.load(Ordering::Relaxed),
            destroyed: self.destroyed.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`SlotStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotStatsSnapshot {
    /// Successful reloads, including the initial load.
    pub reloads: u64,
    pub failed_reloads: u64,
    pub acquires: u64,
    pub installed: u64,
    pub destroyed: u64,
}
