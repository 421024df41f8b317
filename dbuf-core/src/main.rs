//! dbuf - Blocklist Query Server with Hot Reload
//!
//! Serves `GET /q?id=..` against a blocklist file and reloads it on
//! `GET /admin/reload` without dropping in-flight queries.
//!
//! # Usage
//!
//! ```bash
//! dbuf black_id.txt
//! curl "http://localhost:8091/q?id=42"
//! curl "http://localhost:8091/admin/reload?name=black_id&path=black_id.txt"
//! ```

use anyhow::Result;
use clap::Parser;
use dbuf_core::config::{DEFAULT_BIND, DEFAULT_RESOURCE};
use dbuf_core::{init_logging, server, ResourceSpec, ServerConfig};
use std::net::SocketAddr;
use tracing::info;

/// Blocklist query server with hot reload
#[derive(Parser, Debug)]
#[command(name = "dbuf")]
#[command(version)]
struct Args {
    /// Blocklist file, registered as `black_id`
    blocklist: Option<String>,

    /// Additional resources to register, as NAME=PATH (repeatable)
    #[arg(short, long = "resource", value_name = "NAME=PATH")]
    resources: Vec<ResourceSpec>,

    /// Listen address
    #[arg(short, long, default_value = DEFAULT_BIND)]
    bind: SocketAddr,

    /// Log level (trace, debug, info, warn, error); RUST_LOG overrides it
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn into_config(self) -> ServerConfig {
        let mut resources = Vec::with_capacity(self.resources.len() + 1);
        if let Some(path) = self.blocklist {
            resources.push(ResourceSpec::new(DEFAULT_RESOURCE, path));
        }
        resources.extend(self.resources);
        ServerConfig {
            bind: self.bind,
            resources,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let config = args.into_config();
    if config.path_of(DEFAULT_RESOURCE).is_none() {
        anyhow::bail!("no blocklist given; pass a path or --resource {DEFAULT_RESOURCE}=PATH");
    }

    info!("dbuf v{}", env!("CARGO_PKG_VERSION"));
    server::serve(config).await
}
