//! Blocklist Resource - One Blocked ID per Line
//!
//! The stock resource served by the `dbuf` binary.  The file is read whole,
//! each line is trimmed, and blank lines are ignored.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use tracing::debug;

use crate::resource::Resource;

/// Set of blocked IDs loaded from a text file.
#[derive(Debug, Default)]
pub struct BlockList {
    ids: HashSet<String>,
}

impl BlockList {
    /// Create an empty, uninitialized blocklist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse blocklist content: one ID per line, whitespace trimmed.
    pub fn parse(content: &str) -> Self {
        let ids = content
            .lines()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_owned)
            .collect();
        Self { ids }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl Resource for BlockList {
    fn initialize(&mut self, conf: &str) -> Result<()> {
        let content = fs::read_to_string(conf)
            .with_context(|| format!("Failed to read blocklist from {:?}", conf))?;
        *self = Self::parse(&content);
        debug!(path = conf, entries = self.ids.len(), "Blocklist parsed");
        Ok(())
    }

    fn destroy(&mut self) {
        debug!(entries = self.ids.len(), "Blocklist released");
        self.ids.clear();
    }

    fn kind(&self) -> &'static str {
        "blocklist"
    }
}
