pub mod resolver;
pub mod set;

use std::str::FromStr;

use serde::Serialize;

use crate::error::SimError;

pub use resolver::{Resolution, resolve};
pub use set::ForkSet;

/// How blocks are produced when extending a fork.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForkMining {
    /// Run the regular nonce search against the fork tip.
    #[default]
    ProofOfWork,
    /// Draw a random nonce and append without checking difficulty.
    /// Blocks made this way usually fail validation.
    RandomNonce,
}

impl FromStr for ForkMining {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pow" | "proof_of_work" => Ok(Self::ProofOfWork),
            "random" | "random_nonce" => Ok(Self::RandomNonce),
            other => Err(SimError::InvalidConfig(format!(
                "unknown fork mining mode '{other}' (expected 'pow' or 'random')"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ForkMining;

    #[test]
    fn parses_modes() {
        assert_eq!("pow".parse::<ForkMining>().unwrap(), ForkMining::ProofOfWork);
        assert_eq!(" Random ".parse::<ForkMining>().unwrap(), ForkMining::RandomNonce);
        assert!("stake".parse::<ForkMining>().is_err());
    }
}
