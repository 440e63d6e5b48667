//! Error types for the assistant shell

use thiserror::Error;

/// Result type alias for shell operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can surface from the core
///
/// Recognition outcomes are not listed here: they are absorbed by the
/// listening state machine and turned into spoken apologies.
#[derive(Debug, Error)]
pub enum Error {
    /// A user identity outside the declared set was requested
    #[error("invalid user: {0}")]
    InvalidUser(String),

    /// No listener could be acquired, listening is unavailable
    #[error("audio input unavailable: {0}")]
    DeviceUnavailable(String),

    /// The speech engine failed to produce an utterance
    #[error("speech engine error: {0}")]
    SpeechEngine(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
