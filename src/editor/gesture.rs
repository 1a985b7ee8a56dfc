use super::*;
use crate::input::{resolve_press_intent, ModifierState, PressIntent};

/// Active pointer manipulation. Only one can be in effect at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureMode {
    #[default]
    Idle,
    Dragging,
    Resizing,
    Rotating,
}

impl GestureMode {
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }
}

impl From<PressIntent> for GestureMode {
    fn from(intent: PressIntent) -> Self {
        match intent {
            PressIntent::Move => Self::Dragging,
            PressIntent::Resize => Self::Resizing,
            PressIntent::Rotate => Self::Rotating,
        }
    }
}

impl OverlayEditor {
    /// Starts a manipulation when `point` lands on the overlay's box.
    /// Presses that miss leave the current mode untouched.
    pub fn pointer_press(&mut self, point: SurfacePoint, modifiers: ModifierState) -> GestureMode {
        if !self.placement.contains(point) {
            tracing::debug!(x = point.x, y = point.y, "press missed overlay; ignored");
            return self.mode;
        }
        let next = GestureMode::from(resolve_press_intent(modifiers));
        tracing::debug!(from = ?self.mode, to = ?next, "pointer gesture started");
        self.mode = next;
        next
    }

    /// Applies the active mode's update rule. Returns whether the placement changed.
    pub fn pointer_move(&mut self, point: SurfacePoint) -> bool {
        let next = match self.mode {
            GestureMode::Idle => return false,
            GestureMode::Dragging => self.placement.centered_on(point),
            GestureMode::Resizing => self.placement.resized_toward(point),
            GestureMode::Rotating => self.placement.rotated_toward(point),
        };
        self.update_placement(next)
    }

    pub fn pointer_release(&mut self) {
        if !self.mode.is_idle() {
            tracing::debug!(from = ?self.mode, "pointer gesture ended");
        }
        self.mode = GestureMode::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor() -> OverlayEditor {
        OverlayEditor::new(SurfaceSize::square(400), OverlayAsset::new(RgbaImage::new(30, 30)))
    }

    #[test]
    fn drag_recenters_overlay_under_pointer() {
        let mut editor = editor();
        let mode = editor.pointer_press(SurfacePoint::new(150.0, 150.0), ModifierState::none());
        assert_eq!(mode, GestureMode::Dragging);

        assert!(editor.pointer_move(SurfacePoint::new(200.0, 180.0)));
        assert_eq!(editor.mode(), GestureMode::Dragging);
        assert_eq!(editor.placement(), Placement::new(125.0, 105.0, 150.0, 0.0));
    }

    #[test]
    fn shift_press_resizes_from_left_edge() {
        let mut editor = editor();
        let mode = editor.pointer_press(SurfacePoint::new(150.0, 150.0), ModifierState::shift());
        assert_eq!(mode, GestureMode::Resizing);

        editor.pointer_move(SurfacePoint::new(300.0, 150.0));
        assert_eq!(editor.placement().size, 200.0);

        // Vertical motion alone does not change the width.
        editor.pointer_move(SurfacePoint::new(300.0, 390.0));
        assert_eq!(editor.placement().size, 200.0);

        editor.pointer_move(SurfacePoint::new(-500.0, 150.0));
        assert_eq!(editor.placement().size, MIN_OVERLAY_SIZE);
    }

    #[test]
    fn alt_press_rotates_toward_pointer() {
        let mut editor = editor();
        let mode = editor.pointer_press(SurfacePoint::new(150.0, 150.0), ModifierState::alt());
        assert_eq!(mode, GestureMode::Rotating);

        editor.pointer_move(SurfacePoint::new(100.0, 250.0));
        assert!((editor.placement().rotation - 135.0).abs() < 1e-9);
        assert_eq!(editor.placement().size, 150.0);
        assert_eq!(editor.placement().x, 100.0);
    }

    #[test]
    fn press_outside_box_enters_no_mode_and_moves_are_ignored() {
        let mut editor = editor();
        let mode = editor.pointer_press(SurfacePoint::new(20.0, 20.0), ModifierState::none());
        assert_eq!(mode, GestureMode::Idle);

        assert!(!editor.pointer_move(SurfacePoint::new(300.0, 300.0)));
        assert_eq!(editor.placement(), Placement::default());
    }

    #[test]
    fn press_hits_unrotated_box_even_when_rotated() {
        let mut editor = editor();
        editor.set_placement(Placement::new(100.0, 100.0, 150.0, 45.0));

        let mode = editor.pointer_press(SurfacePoint::new(101.0, 101.0), ModifierState::none());
        assert_eq!(mode, GestureMode::Dragging);
    }

    #[test]
    fn release_without_active_mode_is_noop() {
        let mut editor = editor();
        editor.pointer_release();
        assert_eq!(editor.mode(), GestureMode::Idle);
        assert_eq!(editor.placement(), Placement::default());
    }

    #[test]
    fn release_returns_to_idle_from_any_mode() {
        for modifiers in [
            ModifierState::none(),
            ModifierState::shift(),
            ModifierState::alt(),
        ] {
            let mut editor = editor();
            editor.pointer_press(SurfacePoint::new(150.0, 150.0), modifiers);
            assert!(!editor.mode().is_idle());
            editor.pointer_release();
            assert_eq!(editor.mode(), GestureMode::Idle);
        }
    }
}
