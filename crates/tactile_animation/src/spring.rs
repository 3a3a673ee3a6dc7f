//! Spring physics
//!
//! RK4-integrated mass-spring-damper dynamics driving a single scalar
//! toward a target. Parameters are validated when the configuration is
//! built so that integration itself never has to deal with degenerate
//! springs.

use serde::{Deserialize, Serialize};

use crate::error::{AnimationError, Result};

/// Largest integration sub-step in seconds.
///
/// Heavily damped springs have a fast decay mode (about -200/s for the
/// heavy preset) which leaves RK4's stability region at 60fps frame
/// sizes. Frames are split into sub-steps no larger than this.
pub const MAX_SUBSTEP: f64 = 1.0 / 240.0;

/// Longest span a single `step` call integrates, in seconds
///
/// Callers that bypass the scheduler's frame clamp still get a bounded
/// amount of work per call.
pub const MAX_STEP_DT: f64 = 1.0;

/// Default distance from target under which a spring may settle
pub const DEFAULT_REST_DISPLACEMENT: f64 = 0.1;

/// Default speed (units per second) under which a spring may settle
pub const DEFAULT_REST_VELOCITY: f64 = 0.1;

/// Configuration for a spring animation
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSpringConfig")]
pub struct SpringConfig {
    mass: f64,
    stiffness: f64,
    damping: f64,
    rest_displacement: f64,
    rest_velocity: f64,
}

impl SpringConfig {
    /// Create a validated spring configuration with default rest thresholds
    ///
    /// Rejects non-finite values and a non-positive mass, stiffness or
    /// damping coefficient. An undamped spring never comes to rest.
    pub fn new(mass: f64, stiffness: f64, damping: f64) -> Result<Self> {
        Self::with_rest_thresholds(
            mass,
            stiffness,
            damping,
            DEFAULT_REST_DISPLACEMENT,
            DEFAULT_REST_VELOCITY,
        )
    }

    /// Create a validated configuration with explicit convergence tolerances
    pub fn with_rest_thresholds(
        mass: f64,
        stiffness: f64,
        damping: f64,
        rest_displacement: f64,
        rest_velocity: f64,
    ) -> Result<Self> {
        positive("mass", mass)?;
        positive("stiffness", stiffness)?;
        positive("damping", damping)?;
        positive("rest_displacement", rest_displacement)?;
        positive("rest_velocity", rest_velocity)?;

        Ok(Self {
            mass,
            stiffness,
            damping,
            rest_displacement,
            rest_velocity,
        })
    }

    /// Lightly damped spring used for card and modal affordances
    pub const fn snappy() -> Self {
        Self {
            mass: 0.5,
            stiffness: 70.0,
            damping: 10.0,
            rest_displacement: DEFAULT_REST_DISPLACEMENT,
            rest_velocity: DEFAULT_REST_VELOCITY,
        }
    }

    /// Over-damped spring used for direct manipulation, so released
    /// objects do not overshoot
    pub const fn heavy_damped() -> Self {
        Self {
            mass: 0.5,
            stiffness: 70.0,
            damping: 100.0,
            rest_displacement: DEFAULT_REST_DISPLACEMENT,
            rest_velocity: DEFAULT_REST_VELOCITY,
        }
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    pub fn damping(&self) -> f64 {
        self.damping
    }

    pub fn rest_displacement(&self) -> f64 {
        self.rest_displacement
    }

    pub fn rest_velocity(&self) -> f64 {
        self.rest_velocity
    }

    /// Calculate critical damping for this spring's stiffness and mass
    pub fn critical_damping(&self) -> f64 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// Check if the spring is underdamped (will oscillate)
    pub fn is_underdamped(&self) -> bool {
        self.damping < self.critical_damping()
    }

    /// Check if the spring is overdamped (slow settling, no oscillation)
    pub fn is_overdamped(&self) -> bool {
        self.damping > self.critical_damping()
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::snappy()
    }
}

/// Unvalidated wire form of [`SpringConfig`]
#[derive(Deserialize)]
struct RawSpringConfig {
    mass: f64,
    stiffness: f64,
    damping: f64,
    #[serde(default = "default_rest_displacement")]
    rest_displacement: f64,
    #[serde(default = "default_rest_velocity")]
    rest_velocity: f64,
}

fn default_rest_displacement() -> f64 {
    DEFAULT_REST_DISPLACEMENT
}

fn default_rest_velocity() -> f64 {
    DEFAULT_REST_VELOCITY
}

impl TryFrom<RawSpringConfig> for SpringConfig {
    type Error = AnimationError;

    fn try_from(raw: RawSpringConfig) -> Result<Self> {
        Self::with_rest_thresholds(
            raw.mass,
            raw.stiffness,
            raw.damping,
            raw.rest_displacement,
            raw.rest_velocity,
        )
    }
}

fn finite(parameter: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AnimationError::InvalidSpring {
            parameter,
            value,
            reason: "must be finite",
        })
    }
}

fn positive(parameter: &'static str, value: f64) -> Result<()> {
    finite(parameter, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(AnimationError::InvalidSpring {
            parameter,
            value,
            reason: "must be greater than zero",
        })
    }
}

/// An in-flight spring transition owned by one shared value
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringTask {
    target: f64,
    config: SpringConfig,
}

impl SpringTask {
    pub fn new(target: f64, config: SpringConfig) -> Self {
        Self { target, config }
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn config(&self) -> &SpringConfig {
        &self.config
    }

    /// Check if a value/velocity pair is within the rest tolerances
    pub fn is_settled(&self, value: f64, velocity: f64) -> bool {
        (value - self.target).abs() < self.config.rest_displacement
            && velocity.abs() < self.config.rest_velocity
    }

    /// Advance `value`/`velocity` by `dt` seconds
    ///
    /// Returns `true` once the pair has converged, in which case the value
    /// has been snapped onto the target and the velocity zeroed.
    pub fn step(&self, value: &mut f64, velocity: &mut f64, dt: f64) -> bool {
        if self.is_settled(*value, *velocity) {
            *value = self.target;
            *velocity = 0.0;
            return true;
        }

        if !(dt.is_finite() && dt > 0.0) {
            return false;
        }

        let dt = dt.min(MAX_STEP_DT);
        let substeps = (dt / MAX_SUBSTEP).ceil().max(1.0) as u32;
        let h = dt / substeps as f64;
        for _ in 0..substeps {
            self.rk4(value, velocity, h);
        }

        if self.is_settled(*value, *velocity) {
            *value = self.target;
            *velocity = 0.0;
            true
        } else {
            false
        }
    }

    fn rk4(&self, x: &mut f64, v: &mut f64, h: f64) {
        let k1_v = self.acceleration(*x, *v);
        let k1_x = *v;

        let k2_v = self.acceleration(*x + k1_x * h * 0.5, *v + k1_v * h * 0.5);
        let k2_x = *v + k1_v * h * 0.5;

        let k3_v = self.acceleration(*x + k2_x * h * 0.5, *v + k2_v * h * 0.5);
        let k3_x = *v + k2_v * h * 0.5;

        let k4_v = self.acceleration(*x + k3_x * h, *v + k3_v * h);
        let k4_x = *v + k3_v * h;

        *v += (k1_v + 2.0 * k2_v + 2.0 * k3_v + k4_v) * h / 6.0;
        *x += (k1_x + 2.0 * k2_x + 2.0 * k3_x + k4_x) * h / 6.0;
    }

    fn acceleration(&self, x: f64, v: f64) -> f64 {
        let spring_force = -self.config.stiffness * (x - self.target);
        let damping_force = -self.config.damping * v;
        (spring_force + damping_force) / self.config.mass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f64 = 1.0 / 60.0;

    fn run(task: &SpringTask, value: &mut f64, velocity: &mut f64, frames: usize) -> bool {
        for _ in 0..frames {
            if task.step(value, velocity, FRAME) {
                return true;
            }
        }
        false
    }

    #[test]
    fn test_snappy_settles_exactly_on_target() {
        let task = SpringTask::new(100.0, SpringConfig::snappy());
        let (mut value, mut velocity) = (0.0, 0.0);

        assert!(run(&task, &mut value, &mut velocity, 600));
        assert_eq!(value, 100.0);
        assert_eq!(velocity, 0.0);
    }

    #[test]
    fn test_heavy_damped_does_not_overshoot() {
        let task = SpringTask::new(100.0, SpringConfig::heavy_damped());
        let (mut value, mut velocity) = (0.0, 0.0);

        for _ in 0..1200 {
            let settled = task.step(&mut value, &mut velocity, FRAME);
            assert!(value <= 100.0, "overshot to {value}");
            if settled {
                break;
            }
        }
        assert_eq!(value, 100.0);
    }

    #[test]
    fn test_heavy_damped_stable_at_large_frames() {
        let task = SpringTask::new(1000.0, SpringConfig::heavy_damped());
        let (mut value, mut velocity) = (0.0, 0.0);

        for _ in 0..200 {
            task.step(&mut value, &mut velocity, 0.1);
            assert!(value.is_finite());
            assert!(value < 1000.5);
            assert!(value > -0.5);
        }
    }

    #[test]
    fn test_zero_dt_is_a_no_op() {
        let task = SpringTask::new(10.0, SpringConfig::snappy());
        let (mut value, mut velocity) = (0.0, 3.0);

        assert!(!task.step(&mut value, &mut velocity, 0.0));
        assert!(!task.step(&mut value, &mut velocity, f64::NAN));
        assert_eq!(value, 0.0);
        assert_eq!(velocity, 3.0);
    }

    #[test]
    fn test_huge_dt_is_bounded() {
        let task = SpringTask::new(10.0, SpringConfig::snappy());
        let (mut value, mut velocity) = (0.0, 0.0);

        // Integrates at most one second of motion, which is enough for the
        // snappy preset to come to rest
        assert!(task.step(&mut value, &mut velocity, 1e12));
        assert_eq!(value, 10.0);
        assert_eq!(velocity, 0.0);
    }

    #[test]
    fn test_presets() {
        assert!(SpringConfig::snappy().is_underdamped());
        assert!(SpringConfig::heavy_damped().is_overdamped());
    }

    #[test]
    fn test_rejects_degenerate_parameters() {
        assert!(SpringConfig::new(0.0, 70.0, 10.0).is_err());
        assert!(SpringConfig::new(-1.0, 70.0, 10.0).is_err());
        assert!(SpringConfig::new(0.5, 0.0, 10.0).is_err());
        assert!(SpringConfig::new(0.5, 70.0, -1.0).is_err());
        assert!(SpringConfig::new(f64::NAN, 70.0, 10.0).is_err());
        assert!(SpringConfig::new(0.5, f64::INFINITY, 10.0).is_err());
        assert!(SpringConfig::with_rest_thresholds(0.5, 70.0, 10.0, 0.0, 0.1).is_err());
        // Undamped springs oscillate forever
        assert!(SpringConfig::new(0.5, 70.0, 0.0).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let config: SpringConfig =
            serde_json::from_str(r#"{"mass": 0.5, "stiffness": 70, "damping": 10}"#).unwrap();
        assert_eq!(config, SpringConfig::snappy());

        let err = serde_json::from_str::<SpringConfig>(
            r#"{"mass": 0, "stiffness": 70, "damping": 10}"#,
        );
        assert!(err.is_err());
    }
}
