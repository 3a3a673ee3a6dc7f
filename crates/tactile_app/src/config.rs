//! Interaction configuration
//!
//! Every tunable constant of the controllers lives here, loadable from a
//! TOML file. All sections and fields are optional; anything omitted keeps
//! its default.
//!
//! ```toml
//! [screen]
//! width = 390.0
//! height = 844.0
//!
//! [springs.heavy]
//! mass = 0.5
//! stiffness = 70.0
//! damping = 100.0
//!
//! [modal]
//! dismiss_threshold = 60.0
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tactile_animation::{SpringConfig, DEFAULT_MAX_FRAME_DT};
use tactile_gesture::{ActivationConfig, TapConfig};

use crate::error::{AppError, Result};

/// Configuration shared by all interaction controllers
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub screen: ScreenConfig,
    pub springs: SpringPresets,
    pub tap: TapConfig,
    pub activation: ActivationConfig,
    pub label: LabelConfig,
    pub card: CardConfig,
    pub modal: ModalConfig,
    pub scheduler: SchedulerConfig,
}

/// Window dimensions the modal positions are derived from
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 800.0,
        }
    }
}

/// The two spring personalities used by the controllers
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringPresets {
    /// Affordances, the card flip and the modal
    pub snappy: SpringConfig,
    /// Released or pinched label transforms
    pub heavy: SpringConfig,
}

impl Default for SpringPresets {
    fn default() -> Self {
        Self {
            snappy: SpringConfig::snappy(),
            heavy: SpringConfig::heavy_damped(),
        }
    }
}

/// Draggable label settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Scale factor applied while the label is held
    pub press_scale: f64,
    /// Text shown when the input is empty or unavailable
    pub placeholder: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            press_scale: 0.95,
            placeholder: "Drag me".to_string(),
        }
    }
}

/// Flip card targets in the shared state
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    /// Y rotation in degrees
    pub flip_degrees: f64,
    pub shared_scale: f64,
    /// Vertical offset of the card and share options
    pub lift: f64,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            flip_degrees: 180.0,
            shared_scale: 0.5,
            lift: -140.0,
        }
    }
}

/// Drag-to-dismiss modal geometry
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalConfig {
    /// Travel beyond which a release flips the modal's resting position
    pub dismiss_threshold: f64,
    /// Resting position when open
    pub open_offset: f64,
    /// Distance from the bottom edge when closed
    pub closed_inset: f64,
    /// Horizontal inset when not expanded
    pub width_inset: f64,
    pub press_scale: f64,
    pub elevation: f64,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            dismiss_threshold: 50.0,
            open_offset: 10.0,
            closed_inset: 100.0,
            width_inset: 20.0,
            press_scale: 0.95,
            elevation: 5.0,
        }
    }
}

/// Frame driver settings
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Largest time step a single frame may advance, in milliseconds
    pub max_frame_dt_ms: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_frame_dt_ms: 1000.0 / 15.0,
        }
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl InteractionConfig {
    /// Phone-sized screen with the stock springs
    pub fn standard() -> Self {
        Self {
            screen: ScreenConfig::default(),
            springs: SpringPresets::default(),
            tap: TapConfig::default(),
            activation: ActivationConfig::default(),
            label: LabelConfig::default(),
            card: CardConfig::default(),
            modal: ModalConfig::default(),
            scheduler: SchedulerConfig::default(),
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!("Loaded interaction config from {}", path.display());
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values the controllers cannot work with
    ///
    /// Spring tables are already validated while deserializing.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("screen.width", self.screen.width),
            ("screen.height", self.screen.height),
            ("label.press_scale", self.label.press_scale),
            ("modal.press_scale", self.modal.press_scale),
            ("scheduler.max_frame_dt_ms", self.scheduler.max_frame_dt_ms),
            ("tap.max_duration_ms", self.tap.max_duration_ms),
        ];
        for (name, value) in checks {
            if !(value.is_finite() && value > 0.0) {
                return Err(AppError::Config(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }

        let non_negative = [
            ("tap.max_distance", self.tap.max_distance),
            ("activation.pan_min_distance", self.activation.pan_min_distance),
            ("activation.pinch_min_delta", self.activation.pinch_min_delta),
            ("activation.rotate_min_angle", self.activation.rotate_min_angle),
            ("modal.dismiss_threshold", self.modal.dismiss_threshold),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(AppError::Config(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Set the screen size
    pub fn with_screen(mut self, width: f64, height: f64) -> Self {
        self.screen = ScreenConfig { width, height };
        self
    }

    /// Replace the snappy spring
    pub fn with_snappy_spring(mut self, spring: SpringConfig) -> Self {
        self.springs.snappy = spring;
        self
    }

    /// Replace the heavy-damped spring
    pub fn with_heavy_spring(mut self, spring: SpringConfig) -> Self {
        self.springs.heavy = spring;
        self
    }

    /// Set the tap budget
    pub fn with_tap(mut self, tap: TapConfig) -> Self {
        self.tap = tap;
        self
    }

    /// Set the activation thresholds
    pub fn with_activation(mut self, activation: ActivationConfig) -> Self {
        self.activation = activation;
        self
    }

    /// Set the label placeholder text
    pub fn with_placeholder(mut self, text: impl Into<String>) -> Self {
        self.label.placeholder = text.into();
        self
    }

    /// Set the modal release threshold
    pub fn with_dismiss_threshold(mut self, threshold: f64) -> Self {
        self.modal.dismiss_threshold = threshold;
        self
    }

    /// Set the per-frame time step cap
    pub fn with_max_frame_dt_ms(mut self, ms: f64) -> Self {
        self.scheduler.max_frame_dt_ms = ms;
        self
    }

    /// Frame step cap, falling back to the scheduler default if unusable
    pub fn max_frame_dt(&self) -> Duration {
        Duration::try_from_secs_f64(self.scheduler.max_frame_dt_ms / 1000.0)
            .unwrap_or(DEFAULT_MAX_FRAME_DT)
    }

    /// Vertical midpoint of the screen
    pub fn midpoint(&self) -> f64 {
        self.screen.height / 2.0
    }
}
