//! Error type shared by the environments, episodes and evaluators.

use thiserror::Error;

/// Errors surfaced to the caller of an episode.
///
/// Low fitness is never an error; only a controller that cannot be
/// interpreted, a bad configuration, or misuse of a finished episode is.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvError {
    /// Controller returned the wrong number of outputs.
    #[error("controller returned {actual} outputs, expected {expected}")]
    OutputLength { expected: usize, actual: usize },

    /// Controller output contained NaN or infinity.
    #[error("controller output {index} is not finite")]
    NonFiniteOutput { index: usize },

    /// Decoded decision does not fit the task (wrong kind or action index).
    #[error("unexpected decision: {0}")]
    UnexpectedDecision(&'static str),

    /// Controller callback itself failed (e.g. a foreign exception).
    #[error("controller failed: {0}")]
    Controller(String),

    /// Configuration value out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// Frame recording could not be encoded or decoded.
    #[error("frame encoding failed: {0}")]
    Encoding(String),

    /// Episode already reached a terminal state.
    #[error("episode already finished")]
    EpisodeFinished,

    /// Episode result requested before it finished.
    #[error("episode still running")]
    EpisodeRunning,
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, EnvError>;
