//! Content fingerprints recorded alongside each successful reload.
//!
//! A fingerprint is advisory: it tells an operator which content a slot is
//! serving, but it never decides whether a reload happens.

use md5::{Digest, Md5};
use std::fs;
use tracing::trace;

/// MD5 of the file at `conf`, or of `conf` itself when it is not a readable
/// file (raw inline data).  Returned as 32 lowercase hex characters.
pub fn fingerprint(conf: &str) -> String {
    match fs::read(conf) {
        Ok(content) => digest_hex(&content),
        Err(err) => {
            trace!(error = %err, "Configuration is not a readable file, hashing it inline");
            digest_hex(conf.as_bytes())
        }
    }
}

/// Lowercase hex MD5 digest of `bytes`.
pub fn digest_hex(bytes: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
