//! Runtime configuration read from the environment.

use std::env;

use log::warn;

use crate::blockchain::{DEFAULT_BLOCK_DATA, DEFAULT_DIFFICULTY, DIFF_MAX, DIFF_MIN};
use crate::fork::ForkMining;

/// Upper bound (inclusive) for nonces drawn by [`ForkMining::RandomNonce`].
pub const DEFAULT_RANDOM_NONCE_MAX: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub difficulty: u32,
    pub fork_mining: ForkMining,
    pub random_nonce_max: u64,
    pub default_block_data: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            fork_mining: ForkMining::default(),
            random_nonce_max: DEFAULT_RANDOM_NONCE_MAX,
            default_block_data: DEFAULT_BLOCK_DATA.to_string(),
        }
    }
}

impl Config {
    /// Read the process environment. Call `dotenvy::dotenv()` first to
    /// pick up a `.env` file.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Unparsable or out-of-range values
    /// are logged and replaced by their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let difficulty = match lookup("CHAIN_DIFFICULTY").map(|v| v.trim().parse::<u32>()) {
            None => defaults.difficulty,
            Some(Ok(d)) if (DIFF_MIN..=DIFF_MAX).contains(&d) => d,
            Some(_) => {
                warn!(
                    "CHAIN_DIFFICULTY must be a number in {DIFF_MIN}..={DIFF_MAX}; using {}",
                    defaults.difficulty
                );
                defaults.difficulty
            }
        };

        let fork_mining = match lookup("FORK_MINING").map(|v| v.parse::<ForkMining>()) {
            None => defaults.fork_mining,
            Some(Ok(mode)) => mode,
            Some(Err(e)) => {
                warn!("{e}; using {:?}", defaults.fork_mining);
                defaults.fork_mining
            }
        };

        let random_nonce_max = lookup("FORK_RANDOM_NONCE_MAX")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(defaults.random_nonce_max);

        let default_block_data = lookup("DEFAULT_BLOCK_DATA")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.default_block_data);

        Self {
            difficulty,
            fork_mining,
            random_nonce_max,
            default_block_data,
        }
    }
}
