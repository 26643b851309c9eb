//! Error types for the cipher puzzle engine.

use thiserror::Error;

/// Result type used throughout the engine
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors produced by the engine.
///
/// Conditions the player can trigger during normal play (no hints left,
/// nothing left to reveal, a finished round) are reported through outcome
/// enums instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The corpus holds no usable quotes.
    #[error("Quote corpus is empty")]
    EmptyCorpus,

    /// The corpus could not be parsed.
    #[error("Quote corpus could not be parsed: {0}")]
    CorpusFormat(String),

    /// The cipher letter does not occur in the current ciphertext.
    #[error("'{0}' is not a letter of the current ciphertext")]
    InvalidCipherLetter(char),

    /// The plain letter is not in A-Z.
    #[error("'{0}' is not a plaintext letter (expected A-Z)")]
    InvalidPlainLetter(char),

    /// A cipher key could not be built from the given parameters.
    #[error("Invalid cipher key: {0}")]
    InvalidKey(String),

    /// No cipher letter is selected.
    #[error("No cipher letter selected")]
    NoSelection,

    /// Advancing a level requires the current round to be solved.
    #[error("The current puzzle has not been solved yet")]
    RoundNotSolved,

    /// The configuration is inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
