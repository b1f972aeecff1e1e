//! Longest-chain fork resolution.

use log::info;

use super::ForkSet;
use crate::blockchain::Chain;

/// Outcome of [`resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// There were no forks; nothing changed.
    NoForks,
    /// No fork was strictly longer than the main chain.
    KeptMain { length: usize },
    /// Fork `fork_id` became the main chain.
    Adopted { fork_id: usize, length: usize },
}

/// Replace `main` with the strictly longest candidate among `main` and the
/// forks, then discard all forks. Ties go to the main chain, then to the
/// earliest fork. The winner is not re-validated.
pub fn resolve(main: &mut Chain, forks: &mut ForkSet) -> Resolution {
    if forks.is_empty() {
        return Resolution::NoForks;
    }

    let mut best_len = main.len();
    let mut winner = None;
    for (i, fork) in forks.iter().enumerate() {
        if fork.len() > best_len {
            best_len = fork.len();
            winner = Some(i + 1);
        }
    }

    let resolution = match winner.and_then(|id| forks.take(id).map(|chain| (id, chain))) {
        Some((fork_id, chain)) => {
            *main = chain;
            Resolution::Adopted {
                fork_id,
                length: best_len,
            }
        }
        None => Resolution::KeptMain { length: best_len },
    };
    forks.clear();

    info!("RESOLVE - {:?}", resolution);
    resolution
}
