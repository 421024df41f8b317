//! Engine module - Core hot-swap components
//!
//! This module contains the building blocks of the reload engine: counted
//! handles, swap slots, the named registry and the bookkeeping around them.

pub mod fingerprint;
pub mod handle;
pub mod registry;
pub mod slot;
pub mod stats;

pub use handle::RefHandle;
pub use registry::Registry;
pub use slot::{ReloadInfo, SlotStatus, SwapSlot};
pub use stats::{SlotStats, SlotStatsSnapshot};
