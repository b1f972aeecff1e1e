//! The in-memory aggregate the driver operates on: one main chain plus its
//! forks. Each operation takes `&mut self`, so only one runs at a time.

use log::info;
use serde::Serialize;

use crate::blockchain::{Block, Chain};
use crate::config::Config;
use crate::error::Result;
use crate::fork::{self, ForkMining, ForkSet, Resolution};

#[derive(Debug, Clone)]
pub struct Blockchain {
    chain: Chain,
    forks: ForkSet,
}

/// Serializable view of the whole aggregate.
#[derive(Serialize)]
pub struct Snapshot<'a> {
    pub length: usize,
    pub difficulty: u32,
    pub valid: bool,
    pub fork_mining: ForkMining,
    pub fork_lengths: Vec<usize>,
    pub chain: &'a [Block],
}

impl Blockchain {
    /// Start a simulation: genesis-only main chain, no forks.
    pub fn new(config: &Config) -> Self {
        Self {
            chain: Chain::new(config.difficulty),
            forks: ForkSet::with_policy(config.fork_mining, config.random_nonce_max),
        }
    }

    pub fn mine(&mut self, data: String) -> &Block {
        let block = self.chain.mine_block(data);
        info!(
            "MINER - sealed block #{} (hash={}, nonce={})",
            block.index, block.hash, block.nonce
        );
        block
    }

    pub fn create_fork(&mut self) -> usize {
        self.forks.create_fork(&self.chain)
    }

    pub fn extend_fork(&mut self, fork_id: usize, data: String) -> Result<&Block> {
        let difficulty = self.chain.difficulty();
        self.forks.extend_fork(fork_id, data, difficulty)
    }

    pub fn resolve(&mut self) -> Resolution {
        fork::resolve(&mut self.chain, &mut self.forks)
    }

    pub fn validate(&self) -> bool {
        self.chain.validate()
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn forks(&self) -> &ForkSet {
        &self.forks
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            length: self.chain.len(),
            difficulty: self.chain.difficulty(),
            valid: self.chain.validate(),
            fork_mining: self.forks.mining(),
            fork_lengths: self.forks.lengths(),
            chain: self.chain.blocks(),
        }
    }
}
