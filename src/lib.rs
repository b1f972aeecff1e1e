//! Educational proof-of-work blockchain with competing forks and
//! longest-chain resolution. Everything runs in memory, one operation at a time.

pub mod blockchain;
pub mod config;
pub mod error;
pub mod fork;
pub mod shell;
pub mod simulation;

pub use blockchain::{Block, Chain};
pub use config::Config;
pub use error::{Result, SimError};
pub use fork::{ForkMining, ForkSet, Resolution};
pub use simulation::Blockchain;
