//! Animation error types

use thiserror::Error;

/// Errors raised while configuring animations
///
/// Integration itself never fails; everything that could make a spring
/// diverge is rejected here, at configuration time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// A spring parameter would make the integration degenerate
    #[error("Invalid spring parameter `{parameter}` = {value}: {reason}")]
    InvalidSpring {
        parameter: &'static str,
        value: f64,
        reason: &'static str,
    },
}

/// Result type for animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
