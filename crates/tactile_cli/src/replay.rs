//! Script replay
//!
//! Feeds a script into a controller on a fixed frame clock and writes one
//! JSON line per frame with every view's composed transform.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use tactile_animation::AnimationScheduler;
use tactile_app::{ControllerKind, InteractionConfig, InteractionController, ViewSnapshot};
use tactile_gesture::PointerTracker;

use crate::script::Step;

/// Frames to run before giving up on a settle
const SETTLE_LIMIT: u64 = 100_000;

#[derive(Serialize)]
struct FrameRecord<'a> {
    frame: u64,
    time_ms: f64,
    controller: &'a str,
    animating: bool,
    views: &'a [ViewSnapshot],
}

/// Replay options
#[derive(Clone, Copy, Debug)]
pub struct ReplayOptions {
    pub fps: u32,
    /// Only print the final, settled frame
    pub settle: bool,
}

pub struct Replayer<W: Write> {
    controller: Box<dyn InteractionController>,
    scheduler: AnimationScheduler,
    pointers: PointerTracker,
    options: ReplayOptions,
    frame_dt: f64,
    now_ms: f64,
    out: W,
}

impl<W: Write> Replayer<W> {
    pub fn new(
        kind: ControllerKind,
        config: &InteractionConfig,
        options: ReplayOptions,
        out: W,
    ) -> Result<Self> {
        if options.fps == 0 {
            anyhow::bail!("--fps must be at least 1");
        }
        let controller = kind
            .build(config)
            .with_context(|| format!("Failed to build {kind:?} controller"))?;

        Ok(Self {
            controller,
            scheduler: AnimationScheduler::new().with_max_frame_dt(config.max_frame_dt()),
            pointers: PointerTracker::new(),
            options,
            frame_dt: 1.0 / f64::from(options.fps),
            now_ms: 0.0,
            out,
        })
    }

    /// Run every step, then settle if requested
    pub fn run(&mut self, steps: &[Step]) -> Result<()> {
        for step in steps {
            self.apply(step)?;
        }

        if self.options.settle {
            while self.controller.is_animating() {
                if self.scheduler.frame() >= SETTLE_LIMIT {
                    anyhow::bail!("{} did not settle", self.controller.name());
                }
                self.advance();
            }
            self.emit()?;
        }

        tracing::info!(
            "Replayed {} steps on {} over {} frames",
            steps.len(),
            self.controller.name(),
            self.scheduler.frame()
        );
        Ok(())
    }

    fn apply(&mut self, step: &Step) -> Result<()> {
        match step {
            Step::Touch(sample) => {
                self.now_ms = self.now_ms.max(sample.timestamp_ms);
                self.controller.handle_touch(sample);
            }
            Step::TouchTo(target) => {
                self.now_ms = self.now_ms.max(target.sample.timestamp_ms);
                self.controller
                    .handle_touch_to(target.recognizer, &target.sample);
            }
            Step::Pointer(event) => {
                self.now_ms = self.now_ms.max(event.timestamp_ms);
                if let Some(sample) = self.pointers.process(event) {
                    self.controller.handle_touch(&sample);
                }
            }
            Step::Press(action) => {
                if !self.controller.press(*action) {
                    tracing::warn!(
                        "{} does not support {:?}",
                        self.controller.name(),
                        action
                    );
                }
            }
            Step::Frames(count) => {
                for _ in 0..*count {
                    self.advance();
                    if !self.options.settle {
                        self.emit()?;
                    }
                }
            }
        }
        Ok(())
    }

    fn advance(&mut self) {
        self.now_ms += self.frame_dt * 1000.0;
        self.controller.poll_timeouts(self.now_ms);
        self.scheduler
            .tick_with_dt(self.controller.values_mut(), self.frame_dt);
    }

    fn emit(&mut self) -> Result<()> {
        let views = self.controller.compose();
        let record = FrameRecord {
            frame: self.scheduler.frame(),
            time_ms: self.now_ms,
            controller: self.controller.name(),
            animating: self.controller.is_animating(),
            views: &views,
        };
        serde_json::to_writer(&mut self.out, &record).context("Failed to write frame")?;
        writeln!(self.out).context("Failed to write frame")?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
