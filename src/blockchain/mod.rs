pub mod block;
pub mod model;
pub mod pow;

pub use block::Block;
pub use model::{Chain, ValidationError};
pub use pow::{Solution, digest, meets_difficulty, mine, mine_with_clock};

/// Default Proof-of-Work difficulty (number of leading zeros).
pub const DEFAULT_DIFFICULTY: u32 = 2;

/// Difficulty bounds (keep low to avoid long waits)
pub const DIFF_MIN: u32 = 1;
pub const DIFF_MAX: u32 = 6;

/// Payload used when the operator leaves block data empty.
pub const DEFAULT_BLOCK_DATA: &str = "Block Data";

/// Genesis sentinel values.
pub const GENESIS_PREVIOUS_HASH: &str = "0";
pub const GENESIS_DATA: &str = "Genesis Block";

/// Current wall-clock time as Unix seconds (UTC).
pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}
