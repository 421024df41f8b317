//! Reference-Counted Handles to Resource Instances
//!
//! A [`RefHandle`] is a counted pointer to one installed resource instance.
//! The slot keeps one handle for itself; every reader gets its own copy.
//! When the last copy goes away the instance's `destroy()` hook runs, exactly
//! once, on the thread that let go of it.
//!
//! # Design:
//! - `Arc`-backed counting, so copying a handle is a single atomic increment
//! - `release()` consumes the handle; releasing one reference twice does not
//!   compile
//! - An empty handle carries no count at all and is inert

use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::stats::SlotStats;
use crate::resource::Resource;

/// Owner of an installed instance; dropping it is the destruction point.
struct Shared<T: Resource> {
    target: T,
    generation: u64,
    stats: Option<Arc<SlotStats>>,
}

impl<T: Resource> Drop for Shared<T> {
    fn drop(&mut self) {
        debug!(
            kind = self.target.kind(),
            generation = self.generation,
            "Destroying resource instance"
        );
        self.target.destroy();
        if let Some(stats) = &self.stats {
            stats.record_destroy();
        }
    }
}

/// A counted reference to one resource instance.
///
/// Obtain one from [`SwapSlot::acquire`](crate::SwapSlot::acquire), read
/// through [`target`](Self::target), then [`release`](Self::release) it (or
/// just let it drop).  Holding a handle keeps that exact instance alive across
/// any number of concurrent reloads.
pub struct RefHandle<T: Resource> {
    shared: Option<Arc<Shared<T>>>,
}

impl<T: Resource> RefHandle<T> {
    /// Wrap an instance in a detached handle with a count of 1.
    #[cfg(test)]
    pub(crate) fn new(target: T) -> Self {
        Self {
            shared: Some(Arc::new(Shared {
                target,
                generation: 0,
                stats: None,
            })),
        }
    }

    /// A handle that points at nothing.  Copying or releasing it does nothing.
    pub fn empty() -> Self {
        Self { shared: None }
    }

    pub(crate) fn installed(target: T, generation: u64, stats: Arc<SlotStats>) -> Self {
        stats.record_install();
        Self {
            shared: Some(Arc::new(Shared {
                target,
                generation,
                stats: Some(stats),
            })),
        }
    }

    /// Take another reference to the same instance.
    ///
    /// Lock-free; safe to call from any number of threads at once.
    pub fn acquire_copy(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }

    /// Give this reference back.
    ///
    /// If it was the last one, the instance is destroyed before this returns.
    pub fn release(self) {
        drop(self);
    }

    /// Snapshot of the number of live references.  Diagnostic only.
    ///
    /// Returns 0 for an empty handle.
    pub fn count(&self) -> usize {
        self.shared.as_ref().map_or(0, Arc::strong_count)
    }

    /// The referenced instance, or `None` for an empty handle.
    pub fn target(&self) -> Option<&T> {
        self.shared.as_ref().map(|s| &s.target)
    }

    /// Slot generation this instance was installed as (0 when unknown).
    pub fn generation(&self) -> u64 {
        self.shared.as_ref().map_or(0, |s| s.generation)
    }

    pub fn is_empty(&self) -> bool {
        self.shared.is_none()
    }

    /// Returns `true` if both handles point at the same instance.
    pub fn same_instance(&self, other: &Self) -> bool {
        match (&self.shared, &other.shared) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<T: Resource> Clone for RefHandle<T> {
    fn clone(&self) -> Self {
        self.acquire_copy()
    }
}

impl<T: Resource> Default for RefHandle<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Resource> fmt::Debug for RefHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefHandle")
            .field("generation", &self.generation())
            .field("count", &self.count())
            .finish()
    }
}
