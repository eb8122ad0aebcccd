use thiserror::Error;

/// Errors raised by the harness side of the crate. The classifier itself has
/// no failure mode.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("Not a pulse frame ({len} bytes)")]
    NotAPulse { len: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
