use thiserror::Error;

/// Top-level error type for Nudge.
#[derive(Debug, Error)]
pub enum NudgeError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Error from the identity resolver.
    #[error("identity error: {0}")]
    Identity(String),

    /// Error from the reply generator.
    #[error("generator error: {0}")]
    Generator(String),

    /// Error from the command/message transport.
    #[error("transport error: {0}")]
    Transport(String),

    /// Memory/storage error.
    #[error("memory error: {0}")]
    Memory(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
