//! Block hashing and the Proof-of-Work search.

use log::debug;
use sha2::{Digest, Sha256};

use super::now;

/// A nonce accepted by the Proof-of-Work search, together with the hash it
/// produced and the timestamp that was hashed alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub nonce: u64,
    pub hash: String,
    pub timestamp: i64,
}

/// Compute the SHA-256 digest (lowercase hex) of
/// `nonce ‖ previous_hash ‖ data ‖ timestamp`.
pub fn digest(nonce: u64, previous_hash: &str, data: &str, timestamp: i64) -> String {
    let preimage = format!("{nonce}{previous_hash}{data}{timestamp}");
    let mut hasher = Sha256::new();
    hasher.update(preimage.as_bytes());
    hex::encode(hasher.finalize())
}

/// True iff the first `difficulty` characters of `hash` are all `'0'`.
pub fn meets_difficulty(hash: &str, difficulty: u32) -> bool {
    let target_prefix = "0".repeat(difficulty as usize);
    hash.starts_with(&target_prefix)
}

/// Search for a nonce whose digest meets `difficulty`, sampling the wall
/// clock on every attempt. Blocks until a solution is found.
pub fn mine(previous_hash: &str, difficulty: u32, data: &str) -> Solution {
    mine_with_clock(previous_hash, difficulty, data, now)
}

/// Same as [`mine`], with the clock supplied by the caller.
pub fn mine_with_clock<C>(previous_hash: &str, difficulty: u32, data: &str, mut clock: C) -> Solution
where
    C: FnMut() -> i64,
{
    let mut nonce: u64 = 0;
    loop {
        let timestamp = clock();
        let hash = digest(nonce, previous_hash, data, timestamp);
        if meets_difficulty(&hash, difficulty) {
            debug!("POW - solved diff={} after {} attempts", difficulty, nonce + 1);
            return Solution {
                nonce,
                hash,
                timestamp,
            };
        }
        nonce = nonce.wrapping_add(1);
    }
}
