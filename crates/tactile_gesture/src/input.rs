//! Touch input samples
//!
//! Recognizers consume [`TouchSample`]s: one per touch update, already
//! routed to the region by the platform layer, carrying the gesture's
//! cumulative translation, scale and rotation since it began.
//!
//! [`PointerTracker`] derives those samples from raw per-finger pointer
//! positions for platforms that only report individual touches.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::f64::consts::{PI, TAU};

/// Phase tag of a touch update
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchPhase {
    /// First contact of a touch sequence
    Began,
    /// Movement or any other update while touching
    Active,
    /// All fingers lifted
    Ended,
    /// The sequence was aborted by the system
    Cancelled,
}

/// A single gesture update
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TouchSample {
    pub phase: TouchPhase,
    /// Horizontal translation since the sequence began
    #[serde(default)]
    pub translation_x: f64,
    /// Vertical translation since the sequence began
    #[serde(default)]
    pub translation_y: f64,
    /// Pinch scale factor relative to the start (1.0 = unchanged)
    #[serde(default = "unit_scale")]
    pub scale: f64,
    /// Rotation in radians since the sequence began
    #[serde(default)]
    pub rotation: f64,
    /// Timestamp in milliseconds on a monotonic clock
    #[serde(default)]
    pub timestamp_ms: f64,
}

fn unit_scale() -> f64 {
    1.0
}

impl TouchSample {
    /// A neutral sample in the given phase
    pub fn new(phase: TouchPhase, timestamp_ms: f64) -> Self {
        Self {
            phase,
            translation_x: 0.0,
            translation_y: 0.0,
            scale: 1.0,
            rotation: 0.0,
            timestamp_ms,
        }
    }

    pub fn began(timestamp_ms: f64) -> Self {
        Self::new(TouchPhase::Began, timestamp_ms)
    }

    /// An update with the given cumulative translation
    pub fn moved(translation_x: f64, translation_y: f64, timestamp_ms: f64) -> Self {
        Self {
            translation_x,
            translation_y,
            ..Self::new(TouchPhase::Active, timestamp_ms)
        }
    }

    /// Release with the final cumulative translation
    pub fn ended(translation_x: f64, translation_y: f64, timestamp_ms: f64) -> Self {
        Self {
            translation_x,
            translation_y,
            ..Self::new(TouchPhase::Ended, timestamp_ms)
        }
    }

    pub fn cancelled(timestamp_ms: f64) -> Self {
        Self::new(TouchPhase::Cancelled, timestamp_ms)
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Straight-line distance travelled since the sequence began
    pub fn distance(&self) -> f64 {
        self.translation_x.hypot(self.translation_y)
    }
}

/// Phase of a single raw pointer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// A raw per-finger event in view coordinates
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub id: u64,
    pub phase: PointerPhase,
    pub x: f64,
    pub y: f64,
    pub timestamp_ms: f64,
}

#[derive(Clone, Copy, Debug)]
struct Pointer {
    id: u64,
    x: f64,
    y: f64,
}

/// Reference geometry the cumulative values are measured against
#[derive(Clone, Copy, Debug)]
struct Baseline {
    centroid: (f64, f64),
    span: Option<f64>,
    angle: Option<f64>,
    translation: (f64, f64),
    scale: f64,
    rotation: f64,
}

/// Turns raw pointer events into cumulative gesture samples
///
/// Translation follows the centroid of all active pointers; scale and
/// rotation follow the span and angle between the first two. When a
/// finger joins or leaves, the baseline is re-anchored so the emitted
/// values stay continuous.
#[derive(Debug, Default)]
pub struct PointerTracker {
    pointers: SmallVec<[Pointer; 2]>,
    baseline: Option<Baseline>,
    last: Option<TouchSample>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fingers currently down
    pub fn active_pointers(&self) -> usize {
        self.pointers.len()
    }

    /// Feed one pointer event; returns the resulting sample, if any
    pub fn process(&mut self, event: &PointerEvent) -> Option<TouchSample> {
        match event.phase {
            PointerPhase::Down => {
                if let Some(pointer) = self.pointers.iter_mut().find(|p| p.id == event.id) {
                    tracing::trace!("pointer {} is already down", event.id);
                    pointer.x = event.x;
                    pointer.y = event.y;
                    return self.emit(TouchPhase::Active, event.timestamp_ms);
                }
                let first = self.pointers.is_empty();
                self.pointers.push(Pointer {
                    id: event.id,
                    x: event.x,
                    y: event.y,
                });
                if first {
                    self.baseline = Some(self.anchor(0.0, 0.0, 1.0, 0.0));
                    let sample = TouchSample::began(event.timestamp_ms);
                    self.last = Some(sample);
                    Some(sample)
                } else {
                    self.reanchor();
                    self.emit(TouchPhase::Active, event.timestamp_ms)
                }
            }
            PointerPhase::Move => {
                let pointer = self.pointers.iter_mut().find(|p| p.id == event.id)?;
                pointer.x = event.x;
                pointer.y = event.y;
                self.emit(TouchPhase::Active, event.timestamp_ms)
            }
            PointerPhase::Up => {
                let index = self.pointers.iter().position(|p| p.id == event.id)?;
                if self.pointers.len() == 1 {
                    let pointer = &mut self.pointers[index];
                    pointer.x = event.x;
                    pointer.y = event.y;
                    let sample = self.emit(TouchPhase::Ended, event.timestamp_ms);
                    self.clear();
                    sample
                } else {
                    self.pointers.remove(index);
                    self.reanchor();
                    None
                }
            }
            PointerPhase::Cancel => {
                if self.pointers.is_empty() {
                    return None;
                }
                self.clear();
                Some(TouchSample::cancelled(event.timestamp_ms))
            }
        }
    }

    fn clear(&mut self) {
        self.pointers.clear();
        self.baseline = None;
        self.last = None;
    }

    fn centroid(&self) -> (f64, f64) {
        let n = self.pointers.len().max(1) as f64;
        let (sx, sy) = self
            .pointers
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        (sx / n, sy / n)
    }

    fn pair(&self) -> Option<(Pointer, Pointer)> {
        match self.pointers.as_slice() {
            [a, b, ..] => Some((*a, *b)),
            _ => None,
        }
    }

    fn anchor(&self, tx: f64, ty: f64, scale: f64, rotation: f64) -> Baseline {
        let pair = self.pair();
        Baseline {
            centroid: self.centroid(),
            span: pair.map(|(a, b)| (b.x - a.x).hypot(b.y - a.y)),
            angle: pair.map(|(a, b)| (b.y - a.y).atan2(b.x - a.x)),
            translation: (tx, ty),
            scale,
            rotation,
        }
    }

    fn reanchor(&mut self) {
        let last = self.last.unwrap_or_else(|| TouchSample::began(0.0));
        self.baseline = Some(self.anchor(
            last.translation_x,
            last.translation_y,
            last.scale,
            last.rotation,
        ));
    }

    fn emit(&mut self, phase: TouchPhase, timestamp_ms: f64) -> Option<TouchSample> {
        let base = self.baseline?;
        let (cx, cy) = self.centroid();

        let (mut scale, mut rotation) = (base.scale, base.rotation);
        if let (Some((a, b)), Some(span), Some(angle)) = (self.pair(), base.span, base.angle) {
            let current_span = (b.x - a.x).hypot(b.y - a.y);
            if span > f64::EPSILON {
                scale = base.scale * current_span / span;
            }
            let current_angle = (b.y - a.y).atan2(b.x - a.x);
            rotation = base.rotation + wrap_angle(current_angle - angle);
            // Accumulate from the latest angle so twists past half a turn
            // keep counting instead of folding back
            if let Some(baseline) = self.baseline.as_mut() {
                baseline.angle = Some(current_angle);
                baseline.rotation = rotation;
            }
        }

        let sample = TouchSample {
            phase,
            translation_x: base.translation.0 + cx - base.centroid.0,
            translation_y: base.translation.1 + cy - base.centroid.1,
            scale,
            rotation,
            timestamp_ms,
        };
        self.last = Some(sample);
        Some(sample)
    }
}

/// Fold an angle difference into (-PI, PI]
fn wrap_angle(delta: f64) -> f64 {
    let wrapped = (delta + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn pointer(id: u64, phase: PointerPhase, x: f64, y: f64, t: f64) -> PointerEvent {
        PointerEvent {
            id,
            phase,
            x,
            y,
            timestamp_ms: t,
        }
    }

    #[test]
    fn test_single_finger_drag() {
        let mut tracker = PointerTracker::new();

        let began = tracker
            .process(&pointer(1, PointerPhase::Down, 100.0, 100.0, 0.0))
            .unwrap();
        assert_eq!(began.phase, TouchPhase::Began);

        let moved = tracker
            .process(&pointer(1, PointerPhase::Move, 130.0, 60.0, 16.0))
            .unwrap();
        assert_eq!(moved.phase, TouchPhase::Active);
        assert_eq!(moved.translation_x, 30.0);
        assert_eq!(moved.translation_y, -40.0);
        assert_eq!(moved.distance(), 50.0);

        let ended = tracker
            .process(&pointer(1, PointerPhase::Up, 140.0, 60.0, 32.0))
            .unwrap();
        assert_eq!(ended.phase, TouchPhase::Ended);
        assert_eq!(ended.translation_x, 40.0);
        assert_eq!(tracker.active_pointers(), 0);
    }

    #[test]
    fn test_two_finger_pinch_and_rotate() {
        let mut tracker = PointerTracker::new();
        tracker.process(&pointer(1, PointerPhase::Down, 0.0, 0.0, 0.0));
        tracker.process(&pointer(2, PointerPhase::Down, 100.0, 0.0, 5.0));

        // Spread to twice the span and turn a quarter
        tracker.process(&pointer(1, PointerPhase::Move, 0.0, 0.0, 10.0));
        let sample = tracker
            .process(&pointer(2, PointerPhase::Move, 0.0, 200.0, 20.0))
            .unwrap();

        assert!((sample.scale - 2.0).abs() < 1e-9);
        assert!((sample.rotation - FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_crosses_the_half_turn_smoothly() {
        let mut tracker = PointerTracker::new();
        tracker.process(&pointer(1, PointerPhase::Down, 0.0, 0.0, 0.0));
        tracker.process(&pointer(2, PointerPhase::Down, -100.0, 1.0, 5.0));

        // The pair angle goes from just under PI to just over -PI
        let small_turn = tracker
            .process(&pointer(2, PointerPhase::Move, -100.0, -1.0, 10.0))
            .unwrap();
        assert!((small_turn.rotation - 2.0 * 0.01f64.atan()).abs() < 1e-9);

        // Keep turning the same way: rotation keeps growing
        let quarter = tracker
            .process(&pointer(2, PointerPhase::Move, 0.0, -100.0, 20.0))
            .unwrap();
        assert!((quarter.rotation - (FRAC_PI_2 + 0.01f64.atan())).abs() < 1e-9);
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(-TAU + 0.5) - 0.5).abs() < 1e-12);
        assert!((wrap_angle(TAU - 0.5) + 0.5).abs() < 1e-12);
        assert_eq!(wrap_angle(-PI), PI);
        assert!((wrap_angle(0.25) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_repeated_down_does_not_duplicate_pointer() {
        let mut tracker = PointerTracker::new();
        tracker.process(&pointer(1, PointerPhase::Down, 0.0, 0.0, 0.0));
        let again = tracker
            .process(&pointer(1, PointerPhase::Down, 20.0, 0.0, 10.0))
            .unwrap();

        assert_eq!(tracker.active_pointers(), 1);
        assert_eq!(again.phase, TouchPhase::Active);
        assert_eq!(again.translation_x, 20.0);

        let ended = tracker
            .process(&pointer(1, PointerPhase::Up, 20.0, 0.0, 20.0))
            .unwrap();
        assert_eq!(ended.phase, TouchPhase::Ended);
    }

    #[test]
    fn test_second_finger_keeps_translation_continuous() {
        let mut tracker = PointerTracker::new();
        tracker.process(&pointer(1, PointerPhase::Down, 0.0, 0.0, 0.0));
        let before = tracker
            .process(&pointer(1, PointerPhase::Move, 10.0, 0.0, 10.0))
            .unwrap();

        let after = tracker
            .process(&pointer(2, PointerPhase::Down, 110.0, 0.0, 20.0))
            .unwrap();
        assert_eq!(after.translation_x, before.translation_x);
        assert_eq!(after.scale, 1.0);

        // Lifting one finger emits nothing and the last finger keeps driving
        assert!(tracker
            .process(&pointer(2, PointerPhase::Up, 110.0, 0.0, 30.0))
            .is_none());
        let moved = tracker
            .process(&pointer(1, PointerPhase::Move, 15.0, 0.0, 40.0))
            .unwrap();
        assert_eq!(moved.translation_x, 15.0);
    }

    #[test]
    fn test_cancel_and_unknown_pointer() {
        let mut tracker = PointerTracker::new();
        assert!(tracker
            .process(&pointer(9, PointerPhase::Move, 1.0, 1.0, 0.0))
            .is_none());
        assert!(tracker
            .process(&pointer(9, PointerPhase::Cancel, 1.0, 1.0, 0.0))
            .is_none());

        tracker.process(&pointer(1, PointerPhase::Down, 0.0, 0.0, 0.0));
        let cancelled = tracker
            .process(&pointer(1, PointerPhase::Cancel, 0.0, 0.0, 5.0))
            .unwrap();
        assert_eq!(cancelled.phase, TouchPhase::Cancelled);
        assert_eq!(tracker.active_pointers(), 0);
    }

    #[test]
    fn test_sample_deserializes_with_defaults() {
        let sample: TouchSample =
            serde_json::from_str(r#"{"phase": "active", "translation_y": 12.5}"#).unwrap();
        assert_eq!(sample.phase, TouchPhase::Active);
        assert_eq!(sample.translation_x, 0.0);
        assert_eq!(sample.translation_y, 12.5);
        assert_eq!(sample.scale, 1.0);
    }
}
