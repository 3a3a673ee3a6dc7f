//! Per-gesture scratch storage

use smallvec::SmallVec;

use crate::recognizer::{GestureKind, RecognizerId};

/// Baselines captured when a gesture starts
///
/// Created when a recognizer leaves Idle and dropped when it reaches a
/// terminal state. Handlers get mutable access only in `on_start`; later
/// callbacks see it read-only, so the baselines stay fixed for the whole
/// sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureContext {
    recognizer: RecognizerId,
    kind: GestureKind,
    began_at_ms: f64,
    baselines: SmallVec<[(&'static str, f64); 4]>,
}

impl GestureContext {
    pub fn new(recognizer: RecognizerId, kind: GestureKind, began_at_ms: f64) -> Self {
        Self {
            recognizer,
            kind,
            began_at_ms,
            baselines: SmallVec::new(),
        }
    }

    pub fn recognizer(&self) -> RecognizerId {
        self.recognizer
    }

    pub fn kind(&self) -> GestureKind {
        self.kind
    }

    pub fn began_at_ms(&self) -> f64 {
        self.began_at_ms
    }

    /// Record a baseline under `name`
    ///
    /// The first capture of a name wins; later captures return the stored
    /// value unchanged.
    pub fn capture(&mut self, name: &'static str, value: f64) -> f64 {
        if let Some(existing) = self.get(name) {
            return existing;
        }
        self.baselines.push((name, value));
        value
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.baselines
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }

    /// Baseline under `name`, or `default` if it was never captured
    pub fn get_or(&self, name: &str, default: f64) -> f64 {
        self.get(name).unwrap_or(default)
    }

    pub fn len(&self) -> usize {
        self.baselines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.baselines.is_empty()
    }
}
