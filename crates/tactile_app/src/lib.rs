//! Tactile interaction controllers
//!
//! Ready-made widgets wiring gesture regions, spring-driven shared values
//! and transform composers together:
//!
//! - [`FreeTransform`]: a label that can be dragged, pinched, rotated and
//!   tapped to edit its text
//! - [`FlipCard`]: a card flipped between two states by a button
//! - [`DismissModal`]: a sheet dragged between open and closed positions
//!
//! # Example
//!
//! ```
//! use tactile_app::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = InteractionConfig::default();
//!     let mut modal = DismissModal::new(&config)?;
//!
//!     modal.press(Action::ShowModal);
//!     while modal.step(1.0 / 60.0) {}
//!
//!     let views = modal.compose();
//!     assert_eq!(views[0].transform.get(TransformOp::TranslateY), Some(0.0));
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod controller;
pub mod dismiss_modal;
mod error;
pub mod flip_card;
pub mod free_transform;
pub mod text_input;


pub use config::InteractionConfig;
pub use controller::{Action, ControllerKind, InteractionController, ViewSnapshot, ViewSnapshots};
pub use dismiss_modal::DismissModal;
pub use error::{AppError, Result};
pub use flip_card::FlipCard;
pub use free_transform::FreeTransform;
pub use text_input::{TextBuffer, TextEditTarget, TextInputPort};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::config::InteractionConfig;
    pub use crate::controller::{
        Action, ControllerKind, InteractionController, ViewSnapshot, ViewSnapshots,
    };
    pub use crate::dismiss_modal::DismissModal;
    pub use crate::error::{AppError, Result};
    pub use crate::flip_card::FlipCard;
    pub use crate::free_transform::FreeTransform;
    pub use crate::text_input::{TextBuffer, TextEditTarget, TextInputPort};

    pub use tactile_animation::{
        AnimationScheduler, SpringConfig, TransformOp, TransformSnapshot, ValueId, ValueStore,
    };
    pub use tactile_gesture::{GestureKind, TouchPhase, TouchSample};
}
