use std::fmt;

use serde::{Deserialize, Serialize};

use super::{GENESIS_DATA, GENESIS_PREVIOUS_HASH, now, pow};

/// A single entry of a chain. Blocks are never mutated once appended;
/// chains only hand out shared references to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64, // 1-based position within its chain
    pub previous_hash: String,
    pub timestamp: i64, // Unix timestamp (UTC)
    pub data: String,
    pub hash: String,
    pub nonce: u64, // Proof-of-Work witness
}

impl Block {
    /// Create the genesis block (first block in every chain).
    ///
    /// Its hash is the all-zero sentinel rather than a computed digest.
    pub fn genesis() -> Self {
        Self {
            index: 1,
            previous_hash: String::from(GENESIS_PREVIOUS_HASH),
            timestamp: now(),
            data: String::from(GENESIS_DATA),
            hash: "0".repeat(64),
            nonce: 0,
        }
    }

    /// Build a block at a fixed timestamp, hashing its content.
    pub fn new_with_timestamp(
        index: u64,
        previous_hash: String,
        data: String,
        nonce: u64,
        timestamp: i64,
    ) -> Self {
        let hash = pow::digest(nonce, &previous_hash, &data, timestamp);
        Self {
            index,
            previous_hash,
            timestamp,
            data,
            hash,
            nonce,
        }
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 1 && self.previous_hash == GENESIS_PREVIOUS_HASH
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Block(index={}, previous_hash='{}', timestamp={}, data='{}', hash='{}', nonce={})",
            self.index, self.previous_hash, self.timestamp, self.data, self.hash, self.nonce
        )
    }
}
