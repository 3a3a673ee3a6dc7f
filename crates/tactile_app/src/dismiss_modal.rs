//! Drag-to-dismiss modal sheet
//!
//! The sheet follows the finger vertically while held, then springs to
//! either its open or closed resting position depending on where the drag
//! started and how far it went.

use tactile_animation::{SpringConfig, TransformComposer, TransformOp, ValueId, ValueStore};
use tactile_gesture::{
    GestureContext, GestureEvent, GestureHandler, GestureKind, GestureRecognizer, GestureRegion,
    TouchSample,
};

use crate::config::{InteractionConfig, ModalConfig, ScreenConfig};
use crate::controller::{Action, InteractionController, ViewSnapshot, ViewSnapshots};
use crate::error::Result;

const START_Y: &str = "start_y";

#[derive(Debug)]
pub struct DismissModal {
    region: GestureRegion,
    sheet: SheetState,
    composer: TransformComposer,
}

#[derive(Debug)]
struct SheetState {
    values: ValueStore,
    position: ValueId,
    scale: ValueId,
    width: ValueId,
    elevation: ValueId,
    screen: ScreenConfig,
    geometry: ModalConfig,
    spring: SpringConfig,
}

/// Where a released sheet comes to rest
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Release {
    pub position: f64,
    pub width: f64,
}

impl DismissModal {
    pub fn new(config: &InteractionConfig) -> Result<Self> {
        let screen = config.screen;
        let geometry = config.modal;

        let mut values = ValueStore::new();
        let position = values.create(screen.height - geometry.closed_inset);
        let scale = values.create(1.0);
        let width = values.create(screen.width - geometry.width_inset);
        let elevation = values.create(geometry.elevation);

        let mut region = GestureRegion::new("modal");
        region.add(GestureRecognizer::pan().with_activation(config.activation));

        let composer = TransformComposer::new()
            .with(TransformOp::TranslateY, position)
            .with(TransformOp::Scale, scale)
            .with(TransformOp::Width, width)
            .with(TransformOp::Elevation, elevation);

        Ok(Self {
            region,
            sheet: SheetState {
                values,
                position,
                scale,
                width,
                elevation,
                screen,
                geometry,
                spring: config.springs.snappy,
            },
            composer,
        })
    }

    pub fn position(&self) -> ValueId {
        self.sheet.position
    }

    pub fn scale(&self) -> ValueId {
        self.sheet.scale
    }

    pub fn width(&self) -> ValueId {
        self.sheet.width
    }

    pub fn elevation(&self) -> ValueId {
        self.sheet.elevation
    }

    /// Resting position and width for a drag from `start_y` to `final_y`
    pub fn release_targets(&self, start_y: f64, final_y: f64) -> Release {
        self.sheet.release_targets(start_y, final_y)
    }
}

impl SheetState {
    fn open(&self) -> f64 {
        self.geometry.open_offset
    }

    fn closed(&self) -> f64 {
        self.screen.height - self.geometry.closed_inset
    }

    /// A long drag flips the sheet away from where it started; a short one
    /// snaps it back by the same midpoint rule with the comparison reversed
    fn release_targets(&self, start_y: f64, final_y: f64) -> Release {
        let midpoint = self.screen.height / 2.0;
        let position = if (final_y - start_y).abs() > self.geometry.dismiss_threshold {
            if start_y > midpoint {
                self.open()
            } else {
                self.closed()
            }
        } else if start_y < midpoint {
            self.open()
        } else {
            self.closed()
        };

        let width = if start_y > midpoint {
            self.screen.width
        } else {
            self.screen.width - self.geometry.width_inset
        };

        Release { position, width }
    }

    fn settle_affordance(&mut self) {
        self.values.spring_to(self.scale, 1.0, self.spring);
        self.values
            .spring_to(self.elevation, self.geometry.elevation, self.spring);
    }
}

impl GestureHandler for SheetState {
    fn on_start(&mut self, _event: &GestureEvent<'_>, ctx: &mut GestureContext) {
        let current = self.values.current(self.position).unwrap_or_else(|| self.closed());
        ctx.capture(START_Y, current);
        self.values
            .spring_to(self.scale, self.geometry.press_scale, self.spring);
        self.values.spring_to(self.elevation, 0.0, self.spring);
    }

    fn on_active(&mut self, event: &GestureEvent<'_>, ctx: &GestureContext) {
        let start_y = ctx.get_or(START_Y, 0.0);
        self.values
            .set_direct(self.position, start_y + event.sample.translation_y);
    }

    fn on_end(&mut self, _event: &GestureEvent<'_>, ctx: &GestureContext) {
        self.settle_affordance();

        let start_y = ctx.get_or(START_Y, 0.0);
        let final_y = self.values.current(self.position).unwrap_or(start_y);
        let release = self.release_targets(start_y, final_y);
        tracing::debug!(
            "modal: released {:.1} -> {:.1}, resting at {:.1}",
            start_y,
            final_y,
            release.position
        );

        self.values
            .spring_to(self.position, release.position, self.spring);
        self.values.spring_to(self.width, release.width, self.spring);
    }

    fn on_cancel(&mut self, _event: &GestureEvent<'_>, _ctx: &GestureContext) {
        self.settle_affordance();
    }
}

impl InteractionController for DismissModal {
    fn name(&self) -> &'static str {
        "modal"
    }

    fn handle_touch(&mut self, sample: &TouchSample) {
        self.region.dispatch_all(sample, &mut self.sheet);
    }

    fn handle_touch_to(&mut self, kind: GestureKind, sample: &TouchSample) {
        match self.region.find(kind) {
            Some(id) => self.region.dispatch(id, sample, &mut self.sheet),
            None => tracing::trace!("modal: no {} recognizer", kind.name()),
        }
    }

    fn press(&mut self, action: Action) -> bool {
        match action {
            Action::ShowModal => {
                self.sheet
                    .values
                    .spring_to(self.sheet.position, 0.0, self.sheet.spring);
                true
            }
            _ => false,
        }
    }

    fn values(&self) -> &ValueStore {
        &self.sheet.values
    }

    fn values_mut(&mut self) -> &mut ValueStore {
        &mut self.sheet.values
    }

    fn compose(&self) -> ViewSnapshots {
        let mut views = ViewSnapshots::new();
        views.push(ViewSnapshot {
            view: "modal",
            transform: self.composer.compose(&self.sheet.values),
        });
        views
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modal() -> DismissModal {
        DismissModal::new(&InteractionConfig::default()).unwrap()
    }

    #[test]
    fn test_initial_layout() {
        let modal = modal();
        let views = modal.compose();
        let transform = &views[0].transform;

        assert_eq!(transform.get(TransformOp::TranslateY), Some(700.0));
        assert_eq!(transform.get(TransformOp::Scale), Some(1.0));
        assert_eq!(transform.get(TransformOp::Width), Some(380.0));
        assert_eq!(transform.get(TransformOp::Elevation), Some(5.0));
    }

    #[test]
    fn test_release_rule() {
        let modal = modal();
        let open = 10.0;
        let closed = 700.0;

        // Long drags go to the opposite side of where they started
        assert_eq!(modal.release_targets(700.0, 300.0).position, open);
        assert_eq!(modal.release_targets(50.0, 200.0).position, closed);
        // Short drags: start above the midpoint opens, otherwise closes
        assert_eq!(modal.release_targets(50.0, 80.0).position, open);
        assert_eq!(modal.release_targets(450.0, 460.0).position, closed);
        // Exactly on the midpoint: `<` fails so a short drag closes, and
        // `>` fails so a long drag also closes
        assert_eq!(modal.release_targets(400.0, 410.0).position, closed);
        assert_eq!(modal.release_targets(400.0, 100.0).position, closed);
        // Exactly at the threshold is still a short drag
        assert_eq!(modal.release_targets(100.0, 150.0).position, open);

        assert_eq!(modal.release_targets(450.0, 460.0).width, 400.0);
        assert_eq!(modal.release_targets(50.0, 200.0).width, 380.0);
        assert_eq!(modal.release_targets(400.0, 410.0).width, 380.0);
    }

    #[test]
    fn test_drag_tracks_and_presses() {
        let mut modal = modal();
        modal.handle_touch(&TouchSample::began(0.0));

        let values = modal.values();
        assert_eq!(values.get(modal.scale()).unwrap().target(), Some(0.95));
        assert_eq!(values.get(modal.elevation()).unwrap().target(), Some(0.0));

        modal.handle_touch(&TouchSample::moved(0.0, -120.0, 16.0));
        assert_eq!(modal.values().current(modal.position()), Some(580.0));
    }

    #[test]
    fn test_release_restores_rest_affordance() {
        let mut modal = modal();
        modal.handle_touch(&TouchSample::began(0.0));
        modal.handle_touch(&TouchSample::moved(0.0, -20.0, 16.0));
        modal.handle_touch(&TouchSample::ended(0.0, -20.0, 32.0));

        let values = modal.values();
        assert_eq!(values.get(modal.scale()).unwrap().target(), Some(1.0));
        assert_eq!(values.get(modal.elevation()).unwrap().target(), Some(5.0));
    }

    #[test]
    fn test_show_action() {
        let mut modal = modal();
        assert!(modal.press(Action::ShowModal));
        assert_eq!(
            modal.values().get(modal.position()).unwrap().target(),
            Some(0.0)
        );
        assert!(!modal.press(Action::ToggleShare));
        assert!(!modal.press(Action::Reset));
    }
}
