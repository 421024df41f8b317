//! Resource Trait - The Contract for Hot-Reloadable Payloads
//!
//! A resource is anything a service loads once and then reads many times:
//! a parsed dictionary, a blocklist, a compiled rule set.  The engine never
//! looks inside a resource; it only drives the two lifecycle hooks below.
//!
//! # Lifecycle:
//! - **Created** by the slot's creator closure, uninitialized
//! - **Initialized** off to the side, outside any lock
//! - **Installed** as the slot's current instance (immutable from here on)
//! - **Destroyed** exactly once, after the last reader lets go

use anyhow::Result;
use std::sync::Arc;

/// The core trait every hot-reloadable payload must satisfy.
///
/// # Contract:
/// - `initialize()` performs all setup from a configuration string, which is
///   usually a file path but may be raw data.  On failure it must release
///   anything it acquired before returning; the engine discards the instance
///   without calling `destroy()`.
/// - `destroy()` runs exactly once, on whichever thread drops the last
///   reference.  It cannot fail loudly; log and move on.
/// - After `initialize()` succeeds the instance is shared across threads and
///   must be treated as immutable.
pub trait Resource: Send + Sync + 'static {
    /// Load, parse and validate the resource described by `conf`.
    ///
    /// The error is carried for logging and admin responses only; the
    /// engine's control flow depends solely on `Ok` versus `Err`.
    fn initialize(&mut self, conf: &str) -> Result<()>;

    /// Release anything acquired during `initialize`.
    fn destroy(&mut self) {}

    /// Short type label used in log lines.
    fn kind(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Factory producing a fresh, uninitialized resource for each reload.
pub type Creator<T> = Arc<dyn Fn() -> T + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper {
        text: String,
        destroyed: bool,
    }

    impl Resource for Upper {
        fn initialize(&mut self, conf: &str) -> Result<()> {
            if conf.is_empty() {
                anyhow::bail!("empty configuration");
            }
            self.text = conf.to_uppercase();
            Ok(())
        }

        fn destroy(&mut self) {
            self.destroyed = true;
        }
    }

    fn new_upper() -> Upper {
        Upper {
            text: String::new(),
            destroyed: false,
        }
    }

    #[test]
    fn test_initialize_success() {
        let mut r = new_upper();
        assert!(r.initialize("abc").is_ok());
        assert_eq!(r.text, "ABC");
    }

    #[test]
    fn test_initialize_failure_carries_reason() {
        let mut r = new_upper();
        let err = r.initialize("").unwrap_err();
        assert_eq!(err.to_string(), "empty configuration");
        assert!(r.text.is_empty());
    }

    #[test]
    fn test_destroy_hook() {
        let mut r = new_upper();
        r.destroy();
        assert!(r.destroyed);
    }

    #[test]
    fn test_default_kind_is_type_name() {
        let r = new_upper();
        assert!(r.kind().ends_with("Upper"));
    }

    #[test]
    fn test_creator_from_fn() {
        let creator: Creator<Upper> = Arc::new(new_upper);
        let r = creator();
        assert!(!r.destroyed);
    }
}
