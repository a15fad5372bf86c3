use hashchase_algos::AlgorithmError;
use thiserror::Error;

/// Failures while assembling a [`Finder`](crate::Finder). Searching itself
/// never fails.
#[derive(Error, Debug)]
pub enum FinderError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("invalid target digest: {0}")]
    InvalidTarget(#[from] hex::FromHexError),
    #[error(transparent)]
    Algorithm(#[from] AlgorithmError),
    #[error("no digest algorithms selected")]
    NoAlgorithms,
}
