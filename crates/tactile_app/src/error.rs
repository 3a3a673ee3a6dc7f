//! Error types for tactile_app

use tactile_animation::AnimationError;
use tactile_gesture::GestureError;
use thiserror::Error;

/// Errors that can occur while setting up interaction controllers
#[derive(Error, Debug)]
pub enum AppError {
    /// Failed to read a configuration file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed or holds invalid values
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Invalid spring parameters
    #[error("Animation error: {0}")]
    Animation(#[from] AnimationError),

    /// Invalid recognizer wiring
    #[error("Gesture error: {0}")]
    Gesture(#[from] GestureError),
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(err: toml::ser::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

/// Result type for tactile_app operations
pub type Result<T> = std::result::Result<T, AppError>;
