//! # Content Digest
//!
//! SHA-256 fingerprints of rendered artifacts. Two runs over identical inputs
//! with the same reference date must produce the same report bytes, and
//! therefore the same digest; comparing digests is the cheap way to confirm
//! a rerun changed nothing.

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    let mut out = String::with_capacity(64);
    for byte in digest.iter() {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}
