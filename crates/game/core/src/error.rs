//! Common error infrastructure for game-core.
//!
//! The simulation itself never fails: blocked moves, exhausted spawn searches
//! and similar situations are resolved by fallback policies. Errors only
//! surface while building a session, when tunables or stage geometry are
//! rejected before the first tick.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each construction step has its own error type
//! - **Severity Classification**: Errors are categorized for recovery strategies

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid input, should not retry without changes.
    ///
    /// Examples: negative size, inverted drop range
    Validation,

    /// Unexpected state inconsistency that indicates a bug.
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all game-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Rejected tunable in [`crate::GameConfig`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be positive")]
    NonPositive { field: &'static str },

    #[error("{field} must lie within [0, 1]")]
    OutOfUnitRange { field: &'static str },

    #[error("{field} range is inverted (min {min} > max {max})")]
    InvertedRange {
        field: &'static str,
        min: f32,
        max: f32,
    },
}

impl GameError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositive { .. } => "CONFIG_NON_POSITIVE",
            Self::OutOfUnitRange { .. } => "CONFIG_OUT_OF_UNIT_RANGE",
            Self::InvertedRange { .. } => "CONFIG_INVERTED_RANGE",
        }
    }
}

/// Rejected obstacle while building a [`crate::Stage`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum StageError {
    #[error("obstacle '{name}' has a non-positive extent {size:?}")]
    DegenerateObstacle { name: String, size: [f32; 3] },

    #[error("obstacle '{name}' has a non-finite coordinate")]
    NonFinite { name: String },
}

impl GameError for StageError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DegenerateObstacle { .. } => "STAGE_DEGENERATE_OBSTACLE",
            Self::NonFinite { .. } => "STAGE_NON_FINITE",
        }
    }
}
