//! Tactile gesture recognition
//!
//! Turns a stream of touch updates into recognizer transitions for pan,
//! pinch, rotate and tap gestures, with declared arbitration between the
//! recognizers attached to one view.
//!
//! # Example
//!
//! ```
//! use tactile_gesture::prelude::*;
//!
//! let mut region = GestureRegion::new("label");
//! let pan = region.add(GestureRecognizer::pan());
//! let pinch = region.add(GestureRecognizer::pinch());
//! region.allow_simultaneous(pan, pinch).unwrap();
//!
//! region.dispatch_all(&TouchSample::began(0.0), &mut ());
//! region.dispatch_all(&TouchSample::moved(12.0, 0.0, 16.0), &mut ());
//! assert_eq!(region.state(pan), Some(RecognizerState::Active));
//! ```

mod arbitration;
mod context;
mod error;
mod input;
mod recognizer;
mod region;

pub use arbitration::ArbitrationGraph;
pub use context::GestureContext;
pub use error::{GestureError, Result};
pub use input::{PointerEvent, PointerPhase, PointerTracker, TouchPhase, TouchSample};
pub use recognizer::{
    ActivationConfig, GestureKind, GestureRecognizer, RecognizerId, RecognizerState, TapConfig,
};
pub use region::{GestureEvent, GestureHandler, GestureRegion};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::context::GestureContext;
    pub use crate::error::{GestureError, Result};
    pub use crate::input::{TouchPhase, TouchSample};
    pub use crate::recognizer::{GestureKind, GestureRecognizer, RecognizerId, RecognizerState};
    pub use crate::region::{GestureEvent, GestureHandler, GestureRegion};
}
