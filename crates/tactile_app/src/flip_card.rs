//! Two-state flip card
//!
//! Pressing share flips the card over, shrinks and lifts it, and fades
//! the share options in. Pressing again plays it all back.

use tactile_animation::{
    AngleUnit, SpringConfig, TransformComposer, TransformOp, ValueId, ValueStore,
};
use tactile_gesture::{GestureKind, TouchSample};

use crate::config::{CardConfig, InteractionConfig};
use crate::controller::{Action, InteractionController, ViewSnapshot, ViewSnapshots};

#[derive(Debug)]
pub struct FlipCard {
    values: ValueStore,
    rotation_x: ValueId,
    rotation_y: ValueId,
    scale: ValueId,
    translate_y: ValueId,
    share_opacity: ValueId,
    shared: bool,
    spring: SpringConfig,
    targets: CardConfig,
    card: TransformComposer,
    share_options: TransformComposer,
}

impl FlipCard {
    pub fn new(config: &InteractionConfig) -> Self {
        let mut values = ValueStore::new();
        let rotation_x = values.create(0.0);
        let rotation_y = values.create(0.0);
        let scale = values.create(1.0);
        let translate_y = values.create(0.0);
        let share_opacity = values.create(0.0);

        let card = TransformComposer::new()
            .with(TransformOp::TranslateY, translate_y)
            .with(TransformOp::RotateX(AngleUnit::Degrees), rotation_x)
            .with(TransformOp::RotateY(AngleUnit::Degrees), rotation_y)
            .with(TransformOp::Scale, scale);
        let share_options = TransformComposer::new()
            .with(TransformOp::TranslateY, translate_y)
            .with(TransformOp::Opacity, share_opacity);

        Self {
            values,
            rotation_x,
            rotation_y,
            scale,
            translate_y,
            share_opacity,
            shared: false,
            spring: config.springs.snappy,
            targets: config.card,
            card,
            share_options,
        }
    }

    /// Whether the card is showing its share side
    pub fn is_shared(&self) -> bool {
        self.shared
    }

    pub fn rotation_x(&self) -> ValueId {
        self.rotation_x
    }

    pub fn rotation_y(&self) -> ValueId {
        self.rotation_y
    }

    pub fn scale(&self) -> ValueId {
        self.scale
    }

    pub fn translate_y(&self) -> ValueId {
        self.translate_y
    }

    pub fn share_opacity(&self) -> ValueId {
        self.share_opacity
    }

    fn toggle_share(&mut self) {
        let (rotation, scale, lift, opacity) = if self.shared {
            (0.0, 1.0, 0.0, 0.0)
        } else {
            (
                self.targets.flip_degrees,
                self.targets.shared_scale,
                self.targets.lift,
                1.0,
            )
        };

        self.values.spring_to(self.rotation_y, rotation, self.spring);
        self.values.spring_to(self.scale, scale, self.spring);
        self.values.spring_to(self.translate_y, lift, self.spring);
        self.values.spring_to(self.share_opacity, opacity, self.spring);
        self.shared = !self.shared;
        tracing::debug!("card: shared={}", self.shared);
    }
}

impl InteractionController for FlipCard {
    fn name(&self) -> &'static str {
        "card"
    }

    fn handle_touch(&mut self, sample: &TouchSample) {
        tracing::trace!("card: ignoring {:?} sample", sample.phase);
    }

    fn handle_touch_to(&mut self, kind: GestureKind, _sample: &TouchSample) {
        tracing::trace!("card: no {} recognizer", kind.name());
    }

    fn press(&mut self, action: Action) -> bool {
        match action {
            Action::ToggleShare => {
                self.toggle_share();
                true
            }
            _ => false,
        }
    }

    fn values(&self) -> &ValueStore {
        &self.values
    }

    fn values_mut(&mut self) -> &mut ValueStore {
        &mut self.values
    }

    fn compose(&self) -> ViewSnapshots {
        let mut views = ViewSnapshots::new();
        views.push(ViewSnapshot {
            view: "card",
            transform: self.card.compose(&self.values),
        });
        views.push(ViewSnapshot {
            view: "share_options",
            transform: self.share_options.compose(&self.values),
        });
        views
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_writes_share_targets() {
        let mut card = FlipCard::new(&InteractionConfig::default());
        assert!(!card.is_shared());

        assert!(card.press(Action::ToggleShare));
        assert!(card.is_shared());

        let target = |id| card.values().get(id).and_then(|v| v.target());
        assert_eq!(target(card.rotation_y()), Some(180.0));
        assert_eq!(target(card.scale()), Some(0.5));
        assert_eq!(target(card.translate_y()), Some(-140.0));
        assert_eq!(target(card.share_opacity()), Some(1.0));
        // The flip is around the vertical axis only
        assert_eq!(target(card.rotation_x()), None);
        assert_eq!(card.values().current(card.rotation_x()), Some(0.0));
    }

    #[test]
    fn test_views_share_the_lift() {
        let mut card = FlipCard::new(&InteractionConfig::default());
        card.press(Action::ToggleShare);
        while card.step(1.0 / 60.0) {}

        let views = card.compose();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].view, "card");
        assert_eq!(views[0].transform.get(TransformOp::TranslateY), Some(-140.0));
        assert_eq!(
            views[0].transform.get(TransformOp::RotateY(AngleUnit::Degrees)),
            Some(180.0)
        );
        assert_eq!(views[1].view, "share_options");
        assert_eq!(views[1].transform.get(TransformOp::TranslateY), Some(-140.0));
        assert_eq!(views[1].transform.get(TransformOp::Opacity), Some(1.0));
    }

    #[test]
    fn test_touches_and_other_actions_are_ignored() {
        let mut card = FlipCard::new(&InteractionConfig::default());
        card.handle_touch(&TouchSample::began(0.0));
        card.handle_touch_to(GestureKind::Tap, &TouchSample::ended(0.0, 0.0, 10.0));
        assert!(!card.press(Action::Reset));
        assert!(!card.press(Action::ShowModal));
        assert!(!card.is_animating());
    }
}
