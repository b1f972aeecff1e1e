use log::{debug, warn};
use thiserror::Error;

use super::pow::{self, Solution};
use super::{Block, now};

/// Reasons a chain fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("block {index} does not reference the hash of its predecessor")]
    BrokenLink { index: u64 },
    #[error("block {index} hash does not meet difficulty {difficulty}")]
    InsufficientWork { index: u64, difficulty: u32 },
    #[error("a chain needs at least the genesis block")]
    EmptyChain,
}

/// Ordered, append-only sequence of blocks sharing one difficulty policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    blocks: Vec<Block>,
    difficulty: u32,
}

impl Chain {
    /// Initialize a new chain holding only its genesis block.
    pub fn new(difficulty: u32) -> Self {
        let mut chain = Self {
            blocks: Vec::new(),
            difficulty,
        };
        chain.append_genesis();
        chain
    }

    /// Rebuild a chain from an existing block sequence (no validation).
    pub fn from_blocks(blocks: Vec<Block>, difficulty: u32) -> Result<Self, ValidationError> {
        if blocks.is_empty() {
            return Err(ValidationError::EmptyChain);
        }
        Ok(Self { blocks, difficulty })
    }

    fn append_genesis(&mut self) {
        debug_assert!(self.blocks.is_empty());
        self.blocks.push(Block::genesis());
    }

    /// Append a block stamped with the current time; its hash is recomputed
    /// from `(nonce, previous_hash, data, now)`.
    pub fn append(&mut self, nonce: u64, previous_hash: String, data: String) -> &Block {
        self.append_at(nonce, previous_hash, data, now())
    }

    /// Append a block stamped with `timestamp`.
    pub fn append_at(
        &mut self,
        nonce: u64,
        previous_hash: String,
        data: String,
        timestamp: i64,
    ) -> &Block {
        let index = self.blocks.len() as u64 + 1;
        let block = Block::new_with_timestamp(index, previous_hash, data, nonce, timestamp);
        self.push(block)
    }

    /// Append the block a miner solved, keeping the solution's timestamp so
    /// the stored hash is exactly the one that met the difficulty.
    pub fn append_solution(
        &mut self,
        solution: &Solution,
        previous_hash: String,
        data: String,
    ) -> &Block {
        let block = Block {
            index: self.blocks.len() as u64 + 1,
            previous_hash,
            timestamp: solution.timestamp,
            data,
            hash: solution.hash.clone(),
            nonce: solution.nonce,
        };
        self.push(block)
    }

    fn push(&mut self, block: Block) -> &Block {
        debug!("CHAIN - appended block #{} hash={}", block.index, block.hash);
        self.blocks.push(block);
        self.last()
    }

    /// Mine and append a new block carrying `data` on top of the tip.
    pub fn mine_block(&mut self, data: String) -> &Block {
        let prev_hash = self.last().hash.clone();
        let solution = pow::mine(&prev_hash, self.difficulty, &data);
        self.append_solution(&solution, prev_hash, data)
    }

    /// Check linkage and Proof-of-Work for every block after genesis,
    /// stopping at the first failure.
    pub fn audit(&self) -> Result<(), ValidationError> {
        for pair in self.blocks.windows(2) {
            let (prev, current) = (&pair[0], &pair[1]);

            if current.previous_hash != prev.hash {
                return Err(ValidationError::BrokenLink {
                    index: current.index,
                });
            }

            if !pow::meets_difficulty(&current.hash, self.difficulty) {
                return Err(ValidationError::InsufficientWork {
                    index: current.index,
                    difficulty: self.difficulty,
                });
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> bool {
        match self.audit() {
            Ok(()) => true,
            Err(e) => {
                warn!("CHAIN - validation failed: {e}");
                false
            }
        }
    }

    /// Return the last block in the chain.
    pub fn last(&self) -> &Block {
        self.blocks
            .last()
            .expect("Chain should always have at least the genesis block")
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false: genesis is present from construction.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }
}
