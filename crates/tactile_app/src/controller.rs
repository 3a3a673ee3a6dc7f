//! Interaction controller interface
//!
//! A controller owns the shared values, gesture region and transform
//! composers of one widget. Hosts feed it touch samples and discrete
//! actions, step it once per frame and read composed snapshots back.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tactile_animation::{TransformSnapshot, ValueStore};
use tactile_gesture::{GestureKind, TouchSample};

use crate::config::InteractionConfig;
use crate::dismiss_modal::DismissModal;
use crate::error::Result;
use crate::flip_card::FlipCard;
use crate::free_transform::FreeTransform;

/// Discrete, non-gesture inputs such as button presses
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Return the label to its resting transform
    Reset,
    /// Flip the card between its front and share states
    ToggleShare,
    /// Bring the modal in from off-screen
    ShowModal,
    /// Commit the label's edited text
    SubmitText,
}

/// Composed output of one view
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ViewSnapshot {
    pub view: &'static str,
    pub transform: TransformSnapshot,
}

pub type ViewSnapshots = SmallVec<[ViewSnapshot; 2]>;

pub trait InteractionController {
    fn name(&self) -> &'static str;

    /// Deliver a sample to every recognizer of the widget
    fn handle_touch(&mut self, sample: &TouchSample);

    /// Deliver a sample to the widget's recognizer of one kind only
    fn handle_touch_to(&mut self, kind: GestureKind, sample: &TouchSample);

    /// Expire pending taps at `now_ms`
    fn poll_timeouts(&mut self, _now_ms: f64) {}

    /// Apply an action; returns `false` if the widget does not support it
    fn press(&mut self, action: Action) -> bool;

    fn values(&self) -> &ValueStore;

    fn values_mut(&mut self) -> &mut ValueStore;

    /// Snapshot every view of the widget in declared order
    fn compose(&self) -> ViewSnapshots;

    /// Advance all springs by `dt` seconds; `true` while still animating
    fn step(&mut self, dt: f64) -> bool {
        self.values_mut().step_all(dt)
    }

    fn is_animating(&self) -> bool {
        self.values().has_active_springs()
    }
}

/// The controllers a host can instantiate by name
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerKind {
    Label,
    Card,
    Modal,
}

impl ControllerKind {
    pub fn build(self, config: &InteractionConfig) -> Result<Box<dyn InteractionController>> {
        Ok(match self {
            ControllerKind::Label => Box::new(FreeTransform::new(config)?),
            ControllerKind::Card => Box::new(FlipCard::new(config)),
            ControllerKind::Modal => Box::new(DismissModal::new(config)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_names() {
        let action: Action = serde_json::from_str(r#""toggle_share""#).unwrap();
        assert_eq!(action, Action::ToggleShare);
        assert_eq!(
            serde_json::to_string(&Action::SubmitText).unwrap(),
            r#""submit_text""#
        );
    }

    #[test]
    fn test_build_every_kind() {
        let config = InteractionConfig::default();
        for (kind, name) in [
            (ControllerKind::Label, "label"),
            (ControllerKind::Card, "card"),
            (ControllerKind::Modal, "modal"),
        ] {
            let controller = kind.build(&config).unwrap();
            assert_eq!(controller.name(), name);
            assert!(!controller.is_animating());
        }
    }
}
