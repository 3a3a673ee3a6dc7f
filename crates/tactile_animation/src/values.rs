//! Shared animatable values
//!
//! A [`SharedValue`] is a scalar with a current value, a velocity and at
//! most one in-flight [`SpringTask`]. Values live in a [`ValueStore`]
//! owned by an interaction controller; everything else (recognizer
//! handlers, transform composers) refers to them through copyable
//! [`ValueId`] handles. Operations on a handle whose value has been
//! removed are silent no-ops.

use slotmap::{new_key_type, SlotMap};

use crate::spring::{SpringConfig, SpringTask};

new_key_type! {
    /// Handle to a value registered in a [`ValueStore`]
    pub struct ValueId;
}

impl ValueId {
    /// Convert to raw u64 for logging or external storage
    pub fn to_raw(self) -> u64 {
        use slotmap::Key;
        self.data().as_ffi()
    }
}

/// A single animatable scalar
#[derive(Clone, Debug, PartialEq)]
pub struct SharedValue {
    current: f64,
    velocity: f64,
    spring: Option<SpringTask>,
}

impl SharedValue {
    /// Create a value at rest
    pub fn new(initial: f64) -> Self {
        Self {
            current: initial,
            velocity: 0.0,
            spring: None,
        }
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Target of the in-flight spring, if any
    pub fn target(&self) -> Option<f64> {
        self.spring.map(|task| task.target())
    }

    pub fn spring(&self) -> Option<&SpringTask> {
        self.spring.as_ref()
    }

    /// Whether a spring task is in flight
    pub fn is_animating(&self) -> bool {
        self.spring.is_some()
    }

    /// Start a spring toward `target`, replacing any in-flight task
    ///
    /// The current value and velocity carry over as the new task's initial
    /// condition, so an interrupted motion bends toward the new target
    /// instead of restarting from rest.
    pub fn spring_to(&mut self, target: f64, config: SpringConfig) {
        self.spring = Some(SpringTask::new(target, config));
    }

    /// Write a value directly, bypassing the spring
    ///
    /// Used for 1:1 tracking while a finger is down. Cancels any task and
    /// leaves the value at rest.
    pub fn set_direct(&mut self, value: f64) {
        self.spring = None;
        self.current = value;
        self.velocity = 0.0;
    }

    /// Advance the in-flight spring by `dt` seconds
    ///
    /// Returns `true` while the value is still animating.
    pub fn step(&mut self, dt: f64) -> bool {
        let Some(task) = self.spring else {
            return false;
        };

        if task.step(&mut self.current, &mut self.velocity, dt) {
            self.spring = None;
            false
        } else {
            true
        }
    }
}

/// Owner of every shared value of one controller
#[derive(Debug, Default)]
pub struct ValueStore {
    values: SlotMap<ValueId, SharedValue>,
}

impl ValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new value at rest
    pub fn create(&mut self, initial: f64) -> ValueId {
        self.values.insert(SharedValue::new(initial))
    }

    /// Remove a value; outstanding handles become no-ops
    pub fn remove(&mut self, id: ValueId) -> Option<SharedValue> {
        self.values.remove(id)
    }

    pub fn get(&self, id: ValueId) -> Option<&SharedValue> {
        self.values.get(id)
    }

    /// Current value behind a handle
    pub fn current(&self, id: ValueId) -> Option<f64> {
        self.values.get(id).map(SharedValue::current)
    }

    /// Start or redirect a spring on a value
    pub fn spring_to(&mut self, id: ValueId, target: f64, config: SpringConfig) {
        match self.values.get_mut(id) {
            Some(value) => value.spring_to(target, config),
            None => tracing::warn!("spring_to on removed value {:#x}", id.to_raw()),
        }
    }

    /// Write a value directly, cancelling any spring
    pub fn set_direct(&mut self, id: ValueId, current: f64) {
        match self.values.get_mut(id) {
            Some(value) => value.set_direct(current),
            None => tracing::warn!("set_direct on removed value {:#x}", id.to_raw()),
        }
    }

    /// Advance every live spring by `dt` seconds
    ///
    /// Returns `true` if any value is still animating afterwards.
    pub fn step_all(&mut self, dt: f64) -> bool {
        let mut active = false;
        for (_, value) in self.values.iter_mut() {
            active |= value.step(dt);
        }
        active
    }

    /// Check if any value has a spring in flight
    pub fn has_active_springs(&self) -> bool {
        self.values.values().any(SharedValue::is_animating)
    }

    /// Number of values with a spring in flight
    pub fn active_count(&self) -> usize {
        self.values.values().filter(|v| v.is_animating()).count()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f64 = 1.0 / 60.0;

    #[test]
    fn test_step_without_spring_is_no_op() {
        let mut value = SharedValue::new(4.0);
        assert!(!value.step(FRAME));
        assert_eq!(value.current(), 4.0);
        assert_eq!(value.velocity(), 0.0);
    }

    #[test]
    fn test_converges_and_clears_task() {
        let mut value = SharedValue::new(0.0);
        value.spring_to(250.0, SpringConfig::heavy_damped());

        let mut frames = 0;
        while value.step(FRAME) {
            frames += 1;
            assert!(frames < 10_000, "spring never settled");
        }

        assert_eq!(value.current(), 250.0);
        assert!(value.spring().is_none());
        assert!(!value.is_animating());
    }

    #[test]
    fn test_retarget_preserves_velocity() {
        let mut value = SharedValue::new(0.0);
        value.spring_to(100.0, SpringConfig::snappy());
        for _ in 0..10 {
            value.step(FRAME);
        }

        let velocity = value.velocity();
        let current = value.current();
        assert!(velocity > 0.0);

        value.spring_to(-50.0, SpringConfig::snappy());
        assert_eq!(value.velocity(), velocity);
        assert_eq!(value.current(), current);
        assert_eq!(value.target(), Some(-50.0));

        // Momentum carries the value further away before it turns around
        value.step(FRAME);
        assert!(value.current() > current);
    }

    #[test]
    fn test_direct_write_cancels_spring() {
        let mut value = SharedValue::new(0.0);
        value.spring_to(100.0, SpringConfig::snappy());
        value.step(FRAME);

        value.set_direct(42.0);
        assert_eq!(value.current(), 42.0);
        assert_eq!(value.velocity(), 0.0);
        assert!(!value.is_animating());
    }

    #[test]
    fn test_store_handles() {
        let mut store = ValueStore::new();
        let a = store.create(1.0);
        let b = store.create(2.0);

        store.spring_to(a, 5.0, SpringConfig::snappy());
        assert_eq!(store.active_count(), 1);
        assert!(store.step_all(FRAME));

        store.remove(b);
        assert_eq!(store.current(b), None);
        // Stale handles are ignored
        store.spring_to(b, 9.0, SpringConfig::snappy());
        store.set_direct(b, 9.0);
        assert_eq!(store.len(), 1);

        while store.step_all(FRAME) {}
        assert_eq!(store.current(a), Some(5.0));
        assert!(!store.has_active_springs());
    }
}
