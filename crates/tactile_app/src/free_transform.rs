//! Draggable, pinchable, rotatable label
//!
//! Pan, pinch and rotate run together; a tap (which waits for the pan to
//! resolve) switches the label into text editing.
//!
//! Recognizers are declared tap, pan, pinch, rotate. That is also the
//! order in which a shared sample reaches them, so when several resolve
//! on the same sample the earlier one transitions first.

use tactile_animation::{
    AngleUnit, SpringConfig, TransformComposer, TransformOp, ValueId, ValueStore,
};
use tactile_gesture::{
    GestureContext, GestureEvent, GestureHandler, GestureKind, GestureRecognizer, GestureRegion,
    TouchSample,
};

use crate::config::InteractionConfig;
use crate::controller::{Action, InteractionController, ViewSnapshot, ViewSnapshots};
use crate::error::Result;
use crate::text_input::TextInputPort;

const START_X: &str = "start_x";
const START_Y: &str = "start_y";
const INITIAL_SCALE: &str = "initial_scale";
const START: &str = "start";

/// Free-transform controller for a text label
#[derive(Debug)]
pub struct FreeTransform {
    region: GestureRegion,
    label: LabelState,
    composer: TransformComposer,
}

/// Everything the gesture callbacks touch
#[derive(Debug)]
struct LabelState {
    values: ValueStore,
    translate_x: ValueId,
    translate_y: ValueId,
    rotation: ValueId,
    scale: ValueId,
    input: TextInputPort,
    editing: bool,
    text: String,
    placeholder: String,
    press_scale: f64,
    snappy: SpringConfig,
    heavy: SpringConfig,
}

impl FreeTransform {
    pub fn new(config: &InteractionConfig) -> Result<Self> {
        let mut values = ValueStore::new();
        let translate_x = values.create(0.0);
        let translate_y = values.create(0.0);
        let rotation = values.create(0.0);
        let scale = values.create(1.0);

        let mut region = GestureRegion::new("label");
        let tap = region.add(GestureRecognizer::tap().with_tap_config(config.tap));
        let pan = region.add(GestureRecognizer::pan().with_activation(config.activation));
        let pinch = region.add(GestureRecognizer::pinch().with_activation(config.activation));
        let rotate = region.add(GestureRecognizer::rotate().with_activation(config.activation));
        region.allow_simultaneous_all(&[pan, pinch, rotate])?;
        region.require_wait_for(tap, pan)?;

        let composer = TransformComposer::new()
            .with(TransformOp::TranslateX, translate_x)
            .with(TransformOp::TranslateY, translate_y)
            .with(TransformOp::RotateZ(AngleUnit::Radians), rotation)
            .with(TransformOp::Scale, scale);

        let placeholder = config.label.placeholder.clone();
        Ok(Self {
            region,
            label: LabelState {
                values,
                translate_x,
                translate_y,
                rotation,
                scale,
                input: TextInputPort::new(placeholder.clone()),
                editing: false,
                text: placeholder.clone(),
                placeholder,
                press_scale: config.label.press_scale,
                snappy: config.springs.snappy,
                heavy: config.springs.heavy,
            },
            composer,
        })
    }

    pub fn region(&self) -> &GestureRegion {
        &self.region
    }

    /// Port the text-entry widget is mounted into
    pub fn input_mut(&mut self) -> &mut TextInputPort {
        &mut self.label.input
    }

    pub fn is_editing(&self) -> bool {
        self.label.editing
    }

    /// Text shown on the label
    pub fn text(&self) -> &str {
        &self.label.text
    }

    pub fn translate_x(&self) -> ValueId {
        self.label.translate_x
    }

    pub fn translate_y(&self) -> ValueId {
        self.label.translate_y
    }

    pub fn rotation(&self) -> ValueId {
        self.label.rotation
    }

    pub fn scale(&self) -> ValueId {
        self.label.scale
    }
}

impl LabelState {
    fn current(&self, id: ValueId, fallback: f64) -> f64 {
        self.values.current(id).unwrap_or(fallback)
    }

    fn reset(&mut self) {
        self.input.blur();
        self.editing = false;
        self.values.spring_to(self.translate_x, 0.0, self.heavy);
        self.values.spring_to(self.translate_y, 0.0, self.heavy);
        self.values.spring_to(self.rotation, 0.0, self.heavy);
        self.values.spring_to(self.scale, 1.0, self.heavy);
    }

    fn submit_text(&mut self) -> bool {
        if !self.editing {
            return false;
        }
        let text = self.input.text();
        self.text = if text.trim().is_empty() {
            self.placeholder.clone()
        } else {
            text
        };
        self.editing = false;
        self.input.blur();
        tracing::debug!("label: text set to {:?}", self.text);
        true
    }
}

impl GestureHandler for LabelState {
    fn on_start(&mut self, event: &GestureEvent<'_>, ctx: &mut GestureContext) {
        match event.kind {
            GestureKind::Pan => {
                ctx.capture(START_X, self.current(self.translate_x, 0.0));
                ctx.capture(START_Y, self.current(self.translate_y, 0.0));
                let initial = ctx.capture(INITIAL_SCALE, self.current(self.scale, 1.0));
                self.values
                    .spring_to(self.scale, initial * self.press_scale, self.snappy);
                self.input.blur();
            }
            GestureKind::Pinch => {
                ctx.capture(START, self.current(self.scale, 1.0));
                self.input.blur();
            }
            GestureKind::Rotate => {
                ctx.capture(START, self.current(self.rotation, 0.0));
                self.input.blur();
            }
            GestureKind::Tap => {}
        }
    }

    fn on_active(&mut self, event: &GestureEvent<'_>, ctx: &GestureContext) {
        let sample = event.sample;
        match event.kind {
            GestureKind::Pan => {
                self.values.set_direct(
                    self.translate_x,
                    ctx.get_or(START_X, 0.0) + sample.translation_x,
                );
                self.values.set_direct(
                    self.translate_y,
                    ctx.get_or(START_Y, 0.0) + sample.translation_y,
                );
            }
            GestureKind::Pinch => {
                let target = ctx.get_or(START, 1.0) * sample.scale;
                self.values.spring_to(self.scale, target, self.heavy);
            }
            GestureKind::Rotate => {
                self.values
                    .set_direct(self.rotation, ctx.get_or(START, 0.0) + sample.rotation);
            }
            GestureKind::Tap => {}
        }
    }

    fn on_end(&mut self, event: &GestureEvent<'_>, _ctx: &GestureContext) {
        match event.kind {
            GestureKind::Pan => {
                let released = self.current(self.scale, 1.0) / self.press_scale;
                self.values.spring_to(self.scale, released, self.snappy);
            }
            GestureKind::Tap => {
                self.editing = true;
                self.input.focus();
            }
            GestureKind::Pinch | GestureKind::Rotate => {}
        }
    }

    fn on_cancel(&mut self, event: &GestureEvent<'_>, ctx: &GestureContext) {
        if event.kind == GestureKind::Pan {
            let initial = ctx.get_or(INITIAL_SCALE, 1.0);
            self.values.spring_to(self.scale, initial, self.snappy);
        }
    }
}

impl InteractionController for FreeTransform {
    fn name(&self) -> &'static str {
        "label"
    }

    fn handle_touch(&mut self, sample: &TouchSample) {
        self.region.dispatch_all(sample, &mut self.label);
    }

    fn handle_touch_to(&mut self, kind: GestureKind, sample: &TouchSample) {
        match self.region.find(kind) {
            Some(id) => self.region.dispatch(id, sample, &mut self.label),
            None => tracing::trace!("label: no {} recognizer", kind.name()),
        }
    }

    fn poll_timeouts(&mut self, now_ms: f64) {
        self.region.poll_timeouts(now_ms, &mut self.label);
    }

    fn press(&mut self, action: Action) -> bool {
        match action {
            Action::Reset => {
                self.label.reset();
                true
            }
            Action::SubmitText => self.label.submit_text(),
            Action::ToggleShare | Action::ShowModal => false,
        }
    }

    fn values(&self) -> &ValueStore {
        &self.label.values
    }

    fn values_mut(&mut self) -> &mut ValueStore {
        &mut self.label.values
    }

    fn compose(&self) -> ViewSnapshots {
        let mut views = ViewSnapshots::new();
        views.push(ViewSnapshot {
            view: "label",
            transform: self.composer.compose(&self.label.values),
        });
        views
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactile_gesture::RecognizerState;

    const FRAME: f64 = 1.0 / 60.0;

    fn settle(label: &mut FreeTransform) {
        let mut frames = 0;
        while label.step(FRAME) {
            frames += 1;
            assert!(frames < 10_000, "label never settled");
        }
    }

    #[test]
    fn test_pan_tracks_finger_directly() {
        let mut label = FreeTransform::new(&InteractionConfig::default()).unwrap();

        label.handle_touch(&TouchSample::began(0.0));
        label.handle_touch(&TouchSample::moved(40.0, -25.0, 16.0));

        let values = label.values();
        assert_eq!(values.current(label.translate_x()), Some(40.0));
        assert_eq!(values.current(label.translate_y()), Some(-25.0));
        // Held labels shrink toward the press scale
        assert_eq!(values.get(label.scale()).unwrap().target(), Some(0.95));
    }

    #[test]
    fn test_second_drag_continues_from_last_position() {
        let mut label = FreeTransform::new(&InteractionConfig::default()).unwrap();

        label.handle_touch(&TouchSample::began(0.0));
        label.handle_touch(&TouchSample::moved(30.0, 10.0, 16.0));
        label.handle_touch(&TouchSample::ended(30.0, 10.0, 32.0));
        settle(&mut label);

        label.handle_touch(&TouchSample::began(1000.0));
        label.handle_touch(&TouchSample::moved(5.0, 5.0, 1016.0));
        assert_eq!(label.values().current(label.translate_x()), Some(35.0));
        assert_eq!(label.values().current(label.translate_y()), Some(15.0));
    }

    #[test]
    fn test_rotation_is_direct_radians() {
        let mut label = FreeTransform::new(&InteractionConfig::default()).unwrap();
        let rotate = label.region().find(GestureKind::Rotate).unwrap();

        label.handle_touch_to(GestureKind::Rotate, &TouchSample::began(0.0));
        label.handle_touch_to(
            GestureKind::Rotate,
            &TouchSample::moved(0.0, 0.0, 16.0).with_rotation(0.5),
        );

        assert_eq!(label.region().state(rotate), Some(RecognizerState::Active));
        assert_eq!(label.values().current(label.rotation()), Some(0.5));

        let views = label.compose();
        let snapshot = &views[0].transform;
        assert_eq!(
            snapshot.ops().collect::<Vec<_>>(),
            [
                TransformOp::TranslateX,
                TransformOp::TranslateY,
                TransformOp::RotateZ(AngleUnit::Radians),
                TransformOp::Scale,
            ]
        );
        assert_eq!(snapshot.get(TransformOp::RotateZ(AngleUnit::Radians)), Some(0.5));
    }

    #[test]
    fn test_pinch_springs_toward_scaled_start() {
        let mut label = FreeTransform::new(&InteractionConfig::default()).unwrap();

        label.handle_touch_to(GestureKind::Pinch, &TouchSample::began(0.0));
        label.handle_touch_to(
            GestureKind::Pinch,
            &TouchSample::moved(0.0, 0.0, 16.0).with_scale(2.0),
        );

        let scale = label.values().get(label.scale()).unwrap();
        assert_eq!(scale.target(), Some(2.0));
        assert_eq!(scale.spring().unwrap().config(), &SpringConfig::heavy_damped());

        settle(&mut label);
        assert_eq!(label.values().current(label.scale()), Some(2.0));
    }

    #[test]
    fn test_recognizer_declaration_order() {
        let label = FreeTransform::new(&InteractionConfig::default()).unwrap();
        let region = label.region();
        let kinds: Vec<GestureKind> = region
            .order()
            .iter()
            .map(|&id| region.recognizer(id).unwrap().kind())
            .collect();

        assert_eq!(
            kinds,
            [
                GestureKind::Tap,
                GestureKind::Pan,
                GestureKind::Pinch,
                GestureKind::Rotate
            ]
        );
    }

    #[test]
    fn test_unsupported_actions() {
        let mut label = FreeTransform::new(&InteractionConfig::default()).unwrap();
        assert!(!label.press(Action::ToggleShare));
        assert!(!label.press(Action::ShowModal));
        // Nothing to submit outside editing mode
        assert!(!label.press(Action::SubmitText));
        assert_eq!(label.text(), "Drag me");
    }
}
