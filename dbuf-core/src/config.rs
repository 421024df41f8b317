//! Server configuration for the `dbuf` binary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

/// Name under which the positional blocklist path is registered.
pub const DEFAULT_RESOURCE: &str = "black_id";

/// Default listen address for the query and admin endpoints.
pub const DEFAULT_BIND: &str = "0.0.0.0:8091";

/// A named resource and the configuration it is loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSpec {
    pub name: String,
    pub path: String,
}

impl ResourceSpec {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

impl FromStr for ResourceSpec {
    type Err = String;

    /// Parses `NAME=PATH`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((name, path)) if !name.trim().is_empty() && !path.trim().is_empty() => {
                Ok(Self::new(name.trim(), path.trim()))
            }
            _ => Err(format!("expected NAME=PATH, got '{s}'")),
        }
    }
}

impl fmt::Display for ResourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.path)
    }
}

/// Configuration for the query/admin server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    pub bind: SocketAddr,
    /// Resources registered at startup; every one must load or startup fails
    pub resources: Vec<ResourceSpec>,
}

impl ServerConfig {
    /// Path a resource was registered with, if it was configured.
    pub fn path_of(&self, name: &str) -> Option<&str> {
        self.resources
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.path.as_str())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8091)),
            resources: Vec::new(),
        }
    }
}
