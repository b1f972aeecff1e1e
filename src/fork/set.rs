use log::{debug, info};
use rand::Rng;

use super::ForkMining;
use crate::blockchain::{Block, Chain, pow};
use crate::config::DEFAULT_RANDOM_NONCE_MAX;
use crate::error::{Result, SimError};

/// Independent candidate chains, each branched from a snapshot of the main
/// chain. Fork ids are 1-based positions in creation order.
#[derive(Debug, Clone)]
pub struct ForkSet {
    forks: Vec<Chain>,
    mining: ForkMining,
    random_nonce_max: u64,
}

impl Default for ForkSet {
    fn default() -> Self {
        Self::with_policy(ForkMining::default(), DEFAULT_RANDOM_NONCE_MAX)
    }
}

impl ForkSet {
    pub fn with_policy(mining: ForkMining, random_nonce_max: u64) -> Self {
        Self {
            forks: Vec::new(),
            mining,
            random_nonce_max,
        }
    }

    /// Copy `chain` into a new fork and return its id.
    pub fn create_fork(&mut self, chain: &Chain) -> usize {
        self.forks.push(chain.clone());
        let id = self.forks.len();
        info!("FORK - created fork {} at length {}", id, chain.len());
        id
    }

    /// Append a block carrying `data` to fork `fork_id`.
    pub fn extend_fork(&mut self, fork_id: usize, data: String, difficulty: u32) -> Result<&Block> {
        let count = self.forks.len();
        let (mining, nonce_max) = (self.mining, self.random_nonce_max);
        let fork = fork_id
            .checked_sub(1)
            .and_then(|i| self.forks.get_mut(i))
            .ok_or(SimError::InvalidForkId { id: fork_id, count })?;

        let prev_hash = fork.last().hash.clone();
        let block = match mining {
            ForkMining::ProofOfWork => {
                let solution = pow::mine(&prev_hash, difficulty, &data);
                fork.append_solution(&solution, prev_hash, data)
            }
            ForkMining::RandomNonce => {
                let nonce = rand::thread_rng().gen_range(0..=nonce_max);
                debug!("FORK - random nonce {} for fork {}", nonce, fork_id);
                fork.append(nonce, prev_hash, data)
            }
        };
        info!("FORK - block #{} added to fork {}", block.index, fork_id);
        Ok(block)
    }

    pub fn clear(&mut self) {
        self.forks.clear();
    }

    /// Fork by 1-based id.
    pub fn get(&self, fork_id: usize) -> Option<&Chain> {
        fork_id.checked_sub(1).and_then(|i| self.forks.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chain> {
        self.forks.iter()
    }

    pub fn lengths(&self) -> Vec<usize> {
        self.forks.iter().map(Chain::len).collect()
    }

    pub fn len(&self) -> usize {
        self.forks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forks.is_empty()
    }

    pub fn mining(&self) -> ForkMining {
        self.mining
    }

    /// Move fork `fork_id` out of the set, leaving the remaining forks.
    pub(crate) fn take(&mut self, fork_id: usize) -> Option<Chain> {
        let i = fork_id.checked_sub(1)?;
        (i < self.forks.len()).then(|| self.forks.swap_remove(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fork_is_a_value_copy() {
        let mut main = Chain::new(1);
        main.mine_block("A".into());

        let mut forks = ForkSet::default();
        let id = forks.create_fork(&main);
        assert_eq!(id, 1);
        assert_eq!(forks.get(1), Some(&main));

        main.mine_block("main only".into());
        assert_eq!(forks.get(1).map(Chain::len), Some(2));

        forks.extend_fork(1, "fork only".into(), 1).unwrap();
        assert_eq!(main.len(), 3);
        assert_eq!(forks.get(1).map(Chain::len), Some(3));
        assert_ne!(forks.get(1).unwrap().last(), main.last());
    }

    #[test]
    fn ids_follow_creation_order() {
        let main = Chain::new(1);
        let mut forks = ForkSet::default();
        assert_eq!(forks.create_fork(&main), 1);
        assert_eq!(forks.create_fork(&main), 2);
        assert_eq!(forks.len(), 2);
        assert_eq!(forks.lengths(), vec![1, 1]);
    }

    #[test]
    fn pow_extension_links_and_meets_difficulty() {
        let main = Chain::new(2);
        let mut forks = ForkSet::with_policy(ForkMining::ProofOfWork, 10);
        forks.create_fork(&main);
        let tip_hash = main.last().hash.clone();

        let block = forks.extend_fork(1, "B".into(), 2).unwrap().clone();
        assert_eq!(block.index, 2);
        assert_eq!(block.previous_hash, tip_hash);
        assert!(block.hash.starts_with("00"));
        assert!(forks.get(1).unwrap().validate());
    }

    #[test]
    fn random_extension_draws_bounded_nonce() {
        let mut main = Chain::new(1);
        main.mine_block("A".into());
        let mut forks = ForkSet::with_policy(ForkMining::RandomNonce, 5);
        forks.create_fork(&main);

        let block = forks.extend_fork(1, "B".into(), 1).unwrap().clone();
        assert!(block.nonce <= 5);
        assert_eq!(block.index, 3);
        assert_eq!(block.previous_hash, main.last().hash);
        assert_eq!(
            block.hash,
            pow::digest(block.nonce, &block.previous_hash, "B", block.timestamp)
        );
    }

    #[test]
    fn out_of_range_ids_leave_forks_untouched() {
        let main = Chain::new(1);
        let mut forks = ForkSet::default();

        let err = forks.extend_fork(1, "x".into(), 1).unwrap_err();
        assert!(matches!(err, SimError::InvalidForkId { id: 1, count: 0 }));

        forks.create_fork(&main);
        let before = forks.lengths();
        for id in [0, 2, 99] {
            let err = forks.extend_fork(id, "x".into(), 1).unwrap_err();
            assert!(matches!(err, SimError::InvalidForkId { count: 1, .. }));
        }
        assert_eq!(forks.lengths(), before);
        assert_eq!(forks.get(1), Some(&main));
    }

    #[test]
    fn clear_and_take() {
        let main = Chain::new(1);
        let mut forks = ForkSet::default();
        forks.create_fork(&main);
        forks.create_fork(&main);
        assert!(forks.take(0).is_none());
        assert!(forks.take(3).is_none());
        assert_eq!(forks.take(1), Some(main));
        assert_eq!(forks.len(), 1);
        forks.clear();
        assert!(forks.is_empty());
    }
}
