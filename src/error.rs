use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimError>;

/// Recoverable errors reported to the operator. None of them alter state.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("invalid fork {id}: {}", available_forks(.count))]
    InvalidForkId { id: usize, count: usize },

    #[error("invalid command: {0}")]
    InvalidCommand(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn available_forks(count: &usize) -> String {
    match *count {
        0 => "no forks available".to_string(),
        n => format!("available forks are 1 to {n}"),
    }
}
