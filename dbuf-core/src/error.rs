//! Error types for slot and registry operations.

use thiserror::Error;

/// Failure reasons reported by [`SwapSlot`](crate::SwapSlot) and
/// [`Registry`](crate::Registry).
///
/// Every variant leaves the registry and its slots exactly as they were
/// before the call.
#[derive(Debug, Error)]
pub enum SwapError {
    /// `add` was called with a name that is already registered.
    #[error("resource '{0}' is already registered")]
    DuplicateName(String),

    /// `reload` or a lookup named a resource that was never registered.
    #[error("resource '{0}' is not registered")]
    UnknownName(String),

    /// The freshly created instance failed to initialize.
    #[error("failed to initialize resource '{name}'")]
    Init {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}

impl SwapError {
    /// Returns `true` for errors caused by an unknown resource name.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SwapError::UnknownName(_))
    }
}

pub type Result<T, E = SwapError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            SwapError::DuplicateName("dict".into()).to_string(),
            "resource 'dict' is already registered"
        );
        assert_eq!(
            SwapError::UnknownName("dict".into()).to_string(),
            "resource 'dict' is not registered"
        );
    }

    #[test]
    fn test_init_error_keeps_source() {
        let err = SwapError::Init {
            name: "dict".into(),
            source: anyhow::anyhow!("no such file"),
        };
        assert_eq!(err.to_string(), "failed to initialize resource 'dict'");
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "no such file");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_init_error_chain_names_cause_once() {
        let err = SwapError::Init {
            name: "dict".into(),
            source: anyhow::anyhow!("no such file").context("reading blocklist"),
        };
        let chain = format!("{:#}", anyhow::Error::from(err));
        assert_eq!(
            chain,
            "failed to initialize resource 'dict': reading blocklist: no such file"
        );
        assert_eq!(chain.matches("no such file").count(), 1);
    }

    #[test]
    fn test_is_not_found() {
        assert!(SwapError::UnknownName("x".into()).is_not_found());
        assert!(!SwapError::DuplicateName("x".into()).is_not_found());
    }
}
