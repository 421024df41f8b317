//! dbuf Core - Hot-Reloadable Resources Without Reader Stalls
//!
//! This crate lets a service hold read-heavy, in-memory resources (parsed
//! dictionaries, blocklists, compiled configs) and replace them wholesale at
//! runtime.  Readers are never blocked for longer than a pointer swap, never
//! see a half-built instance, and an old instance is destroyed exactly once,
//! after the last reader holding it lets go.
//!
//! # Building Blocks:
//! - [`Resource`] - the lifecycle contract a payload implements
//! - [`RefHandle`] - a counted reference to one installed instance
//! - [`SwapSlot`] - one current instance plus reload/acquire
//! - [`Registry`] - named slots, created only after a successful first load

pub mod blocklist;
pub mod config;
pub mod engine;
pub mod error;
pub mod resource;
pub mod server;

pub use blocklist::BlockList;
pub use config::{ResourceSpec, ServerConfig};
pub use engine::{RefHandle, Registry, ReloadInfo, SlotStatus, SwapSlot};
pub use error::SwapError;
pub use resource::{Creator, Resource};

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `default_level`.  Calling this more than
/// once is harmless; later calls leave the first subscriber in place.
pub fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
