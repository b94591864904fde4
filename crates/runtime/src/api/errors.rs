//! Unified error types surfaced by the runtime API.
//!
//! Wraps configuration validation failures so clients can bubble them up
//! with consistent context. Stages are validated when they are built, and
//! nothing inside the tick returns an error.
use game_core::{ConfigError, ErrorSeverity, GameError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("an agent named '{name}' is already registered")]
    DuplicateAgentName { name: String },

    #[error("agent name must not be empty")]
    EmptyAgentName,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Config(err) => err.severity(),
            Self::DuplicateAgentName { .. } | Self::EmptyAgentName => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateAgentName { .. } => "RUNTIME_DUPLICATE_AGENT_NAME",
            Self::EmptyAgentName => "RUNTIME_EMPTY_AGENT_NAME",
            Self::Config(err) => err.error_code(),
        }
    }
}
