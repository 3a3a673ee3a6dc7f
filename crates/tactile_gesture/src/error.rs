//! Gesture declaration errors

use thiserror::Error;

use crate::recognizer::RecognizerId;

/// Errors raised while wiring recognizers together
///
/// Touch processing itself never fails; these only surface when a region
/// is being set up.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GestureError {
    /// A relation named a recognizer the region does not contain
    #[error("Unknown recognizer {id:?} in region '{region}'")]
    UnknownRecognizer { id: RecognizerId, region: String },

    /// A recognizer was related to itself
    #[error("A recognizer cannot be related to itself")]
    SelfRelation,

    /// The pair is already related the other way
    #[error("Recognizers cannot both run simultaneously and wait for one another")]
    ConflictingRelation,
}

/// Result type for gesture operations
pub type Result<T> = std::result::Result<T, GestureError>;
