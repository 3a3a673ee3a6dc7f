//! Tactile Animation System
//!
//! Spring-driven shared values and the per-frame machinery around them.
//!
//! # Features
//!
//! - **Spring Physics**: RK4-integrated springs with mass, stiffness and damping,
//!   validated at configuration time
//! - **Shared Values**: scalars with at most one in-flight spring each, owned by a
//!   [`ValueStore`] and addressed through [`ValueId`] handles
//! - **Interruptible**: retargeting a moving value keeps its velocity
//! - **Frame Scheduler**: clamped, clock-driven stepping of every live spring
//! - **Transform Composition**: ordered snapshots of values for a view

pub mod error;
pub mod scheduler;
pub mod spring;
pub mod transform;
pub mod values;

pub use error::{AnimationError, Result};
pub use scheduler::{AnimationScheduler, DEFAULT_MAX_FRAME_DT};
pub use spring::{SpringConfig, SpringTask};
pub use transform::{
    AngleUnit, Mat4, TransformComposer, TransformEntry, TransformOp, TransformSnapshot,
};
pub use values::{SharedValue, ValueId, ValueStore};
