use thiserror::Error;

use crate::reporter::ReporterError;

/// Top-level agent failures surfaced to the binary
#[derive(Debug, Error)]
pub enum AgentError {
    /// Reporter could not be constructed
    #[error("Reporter error: {0}")]
    Reporter(#[from] ReporterError),

    /// Invalid runtime configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Type alias for Result with AgentError
pub type Result<T> = std::result::Result<T, AgentError>;
