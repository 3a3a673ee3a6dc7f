//! Gesture recognizers
//!
//! A recognizer is a small state machine fed with [`TouchSample`]s:
//!
//! ```text
//! Idle -> Began -> Active -> Ended
//!           |        |
//!           |        +-----> Cancelled
//!           +--------------> Failed / Cancelled
//! ```
//!
//! The recognizer only decides what a sample *asks* for. Whether a
//! transition is allowed depends on its peers, which is the region's job.

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::input::{TouchPhase, TouchSample};

new_key_type! {
    /// Handle to a recognizer inside a [`GestureRegion`](crate::GestureRegion)
    pub struct RecognizerId;
}

/// Kind of continuous or discrete gesture
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    Pan,
    Pinch,
    Rotate,
    Tap,
}

impl GestureKind {
    pub fn name(self) -> &'static str {
        match self {
            GestureKind::Pan => "pan",
            GestureKind::Pinch => "pinch",
            GestureKind::Rotate => "rotate",
            GestureKind::Tap => "tap",
        }
    }
}

/// Lifecycle state of a recognizer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognizerState {
    #[default]
    Idle,
    Began,
    Active,
    Ended,
    Cancelled,
    Failed,
}

impl RecognizerState {
    /// Ended, Cancelled or Failed
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RecognizerState::Ended | RecognizerState::Cancelled | RecognizerState::Failed
        )
    }

    /// Began or Active
    pub fn is_in_progress(self) -> bool {
        matches!(self, RecognizerState::Began | RecognizerState::Active)
    }
}

/// Movement and duration budget of a tap
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TapConfig {
    /// Longest press that still counts as a tap
    pub max_duration_ms: f64,
    /// Furthest the finger may travel before the tap fails
    pub max_distance: f64,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            max_duration_ms: 500.0,
            max_distance: 10.0,
        }
    }
}

/// Minimum movement before a continuous gesture activates
///
/// The defaults activate on any change at all.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivationConfig {
    /// Pan: distance travelled
    pub pan_min_distance: f64,
    /// Pinch: deviation of the scale factor from 1
    pub pinch_min_delta: f64,
    /// Rotate: absolute rotation in radians
    pub rotate_min_angle: f64,
}

/// What a sample asks of a recognizer, before arbitration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Intent {
    /// Nothing to do
    Ignore,
    /// Leave Idle
    Begin,
    /// Began -> Active
    Activate,
    /// Already Active, deliver the update
    Update,
    /// Active -> Ended
    End,
    /// A tap released within budget: activate and end in one go
    Commit,
    /// Gesture conditions were not met
    Fail,
    /// External abort
    Cancel,
}

/// A single gesture recognizer
#[derive(Clone, Debug)]
pub struct GestureRecognizer {
    kind: GestureKind,
    state: RecognizerState,
    began_at_ms: Option<f64>,
    tap: TapConfig,
    activation: ActivationConfig,
}

impl GestureRecognizer {
    pub fn new(kind: GestureKind) -> Self {
        Self {
            kind,
            state: RecognizerState::Idle,
            began_at_ms: None,
            tap: TapConfig::default(),
            activation: ActivationConfig::default(),
        }
    }

    pub fn pan() -> Self {
        Self::new(GestureKind::Pan)
    }

    pub fn pinch() -> Self {
        Self::new(GestureKind::Pinch)
    }

    pub fn rotate() -> Self {
        Self::new(GestureKind::Rotate)
    }

    pub fn tap() -> Self {
        Self::new(GestureKind::Tap)
    }

    pub fn with_tap_config(mut self, tap: TapConfig) -> Self {
        self.tap = tap;
        self
    }

    pub fn with_activation(mut self, activation: ActivationConfig) -> Self {
        self.activation = activation;
        self
    }

    pub fn kind(&self) -> GestureKind {
        self.kind
    }

    pub fn state(&self) -> RecognizerState {
        self.state
    }

    /// Timestamp of the sample that began the current sequence
    pub fn began_at_ms(&self) -> Option<f64> {
        self.began_at_ms
    }

    pub fn tap_config(&self) -> &TapConfig {
        &self.tap
    }

    pub(crate) fn set_state(&mut self, state: RecognizerState) {
        self.state = state;
    }

    pub(crate) fn mark_began(&mut self, timestamp_ms: f64) {
        self.state = RecognizerState::Began;
        self.began_at_ms = Some(timestamp_ms);
    }

    /// Return to Idle, forgetting the previous sequence
    pub(crate) fn reset(&mut self) {
        self.state = RecognizerState::Idle;
        self.began_at_ms = None;
    }

    /// Whether the sample moved far enough to activate this gesture
    pub fn exceeds_activation(&self, sample: &TouchSample) -> bool {
        match self.kind {
            GestureKind::Pan => sample.distance() > self.activation.pan_min_distance,
            GestureKind::Pinch => (sample.scale - 1.0).abs() > self.activation.pinch_min_delta,
            GestureKind::Rotate => sample.rotation.abs() > self.activation.rotate_min_angle,
            GestureKind::Tap => false,
        }
    }

    /// Whether a tap sample is still within its movement and time budget
    pub fn within_tap_budget(&self, sample: &TouchSample) -> bool {
        sample.distance() <= self.tap.max_distance && !self.tap_expired(sample.timestamp_ms)
    }

    /// Whether a pending tap has outlived its duration budget at `now_ms`
    pub fn tap_expired(&self, now_ms: f64) -> bool {
        match self.began_at_ms {
            Some(start) => now_ms - start > self.tap.max_duration_ms,
            None => false,
        }
    }

    pub(crate) fn intent(&self, sample: &TouchSample) -> Intent {
        use RecognizerState::*;

        match (sample.phase, self.state) {
            (TouchPhase::Began, Idle) => Intent::Begin,
            (TouchPhase::Began, _) => Intent::Ignore,

            (TouchPhase::Active, Began) if self.kind == GestureKind::Tap => {
                if self.within_tap_budget(sample) {
                    Intent::Ignore
                } else {
                    Intent::Fail
                }
            }
            (TouchPhase::Active, Began) if self.exceeds_activation(sample) => Intent::Activate,
            (TouchPhase::Active, Active) => Intent::Update,
            (TouchPhase::Active, _) => Intent::Ignore,

            (TouchPhase::Ended, Began) if self.kind == GestureKind::Tap => {
                if self.within_tap_budget(sample) {
                    Intent::Commit
                } else {
                    Intent::Fail
                }
            }
            (TouchPhase::Ended, Began) => Intent::Fail,
            (TouchPhase::Ended, Active) => Intent::End,
            (TouchPhase::Ended, _) => Intent::Ignore,

            (TouchPhase::Cancelled, Began | Active) => Intent::Cancel,
            (TouchPhase::Cancelled, _) => Intent::Ignore,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_states() {
        assert!(RecognizerState::Ended.is_terminal());
        assert!(RecognizerState::Failed.is_terminal());
        assert!(!RecognizerState::Idle.is_terminal());
        assert!(RecognizerState::Began.is_in_progress());
        assert!(!RecognizerState::Cancelled.is_in_progress());
    }

    #[test]
    fn test_activation_metrics() {
        let pan = GestureRecognizer::pan();
        let pinch = GestureRecognizer::pinch();
        let rotate = GestureRecognizer::rotate();
        let still = TouchSample::moved(0.0, 0.0, 10.0);

        assert!(!pan.exceeds_activation(&still));
        assert!(!pinch.exceeds_activation(&still));
        assert!(!rotate.exceeds_activation(&still));

        assert!(pan.exceeds_activation(&TouchSample::moved(0.5, 0.0, 10.0)));
        assert!(pinch.exceeds_activation(&still.with_scale(1.2)));
        assert!(rotate.exceeds_activation(&still.with_rotation(-0.1)));
        assert!(!GestureRecognizer::tap().exceeds_activation(&TouchSample::moved(50.0, 0.0, 1.0)));
    }

    #[test]
    fn test_pan_threshold() {
        let pan = GestureRecognizer::pan().with_activation(ActivationConfig {
            pan_min_distance: 8.0,
            ..Default::default()
        });
        assert!(!pan.exceeds_activation(&TouchSample::moved(3.0, 4.0, 0.0)));
        assert!(pan.exceeds_activation(&TouchSample::moved(6.0, 8.0, 0.0)));
    }

    #[test]
    fn test_tap_budget() {
        let mut tap = GestureRecognizer::tap();
        tap.mark_began(1000.0);

        assert!(tap.within_tap_budget(&TouchSample::moved(6.0, 8.0, 1200.0)));
        assert!(!tap.within_tap_budget(&TouchSample::moved(8.0, 8.0, 1200.0)));
        assert!(!tap.within_tap_budget(&TouchSample::moved(0.0, 0.0, 1600.0)));
        assert!(tap.tap_expired(1501.0));
        assert!(!tap.tap_expired(1500.0));
    }

    #[test]
    fn test_intents() {
        let mut pan = GestureRecognizer::pan();
        assert_eq!(pan.intent(&TouchSample::began(0.0)), Intent::Begin);
        assert_eq!(pan.intent(&TouchSample::moved(1.0, 0.0, 1.0)), Intent::Ignore);

        pan.mark_began(0.0);
        assert_eq!(pan.intent(&TouchSample::moved(0.0, 0.0, 1.0)), Intent::Ignore);
        assert_eq!(pan.intent(&TouchSample::moved(1.0, 0.0, 1.0)), Intent::Activate);
        assert_eq!(pan.intent(&TouchSample::ended(0.0, 0.0, 2.0)), Intent::Fail);

        pan.set_state(RecognizerState::Active);
        assert_eq!(pan.intent(&TouchSample::moved(2.0, 0.0, 3.0)), Intent::Update);
        assert_eq!(pan.intent(&TouchSample::ended(2.0, 0.0, 4.0)), Intent::End);

        pan.set_state(RecognizerState::Ended);
        assert_eq!(pan.intent(&TouchSample::ended(2.0, 0.0, 5.0)), Intent::Ignore);
        assert_eq!(pan.intent(&TouchSample::cancelled(5.0)), Intent::Ignore);
    }
}
