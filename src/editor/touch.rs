use super::*;

/// Separation of two touch points, used to derive per-frame pinch deltas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchState {
    pub distance: f64,
    /// Degrees, from the first touch point toward the second.
    pub angle: f64,
}

impl PinchState {
    pub fn between(first: SurfacePoint, second: SurfacePoint) -> Self {
        Self {
            distance: first.distance_to(second),
            angle: first.angle_to_degrees(second),
        }
    }

    /// `(scale, rotation_delta)` going from `self` to `next`.
    /// A collapsed previous pinch yields a neutral scale.
    pub fn delta_to(self, next: Self) -> (f64, f64) {
        let scale = if self.distance > f64::EPSILON {
            next.distance / self.distance
        } else {
            1.0
        };
        (scale, next.angle - self.angle)
    }
}

impl OverlayEditor {
    pub fn touch_start(&mut self, touches: &[SurfacePoint]) {
        match touches {
            [point] => {
                if self.placement.contains(*point) {
                    tracing::debug!(from = ?self.mode, "touch drag started");
                    self.mode = GestureMode::Dragging;
                }
            }
            [first, second] => {
                let pinch = PinchState::between(*first, *second);
                tracing::debug!(distance = pinch.distance, angle = pinch.angle, "pinch started");
                self.pinch = Some(pinch);
            }
            _ => {}
        }
    }

    /// Returns whether the placement changed.
    pub fn touch_move(&mut self, touches: &[SurfacePoint]) -> bool {
        match touches {
            [point] if self.mode == GestureMode::Dragging => {
                let next = self.placement.centered_on(*point);
                self.update_placement(next)
            }
            [first, second] => {
                let Some(previous) = self.pinch else {
                    return false;
                };
                let current = PinchState::between(*first, *second);
                let (scale, rotation_delta) = previous.delta_to(current);
                self.pinch = Some(current);
                let next = self.placement.scaled_and_rotated_by(scale, rotation_delta);
                self.update_placement(next)
            }
            _ => false,
        }
    }

    /// Drops drag and pinch tracking, even if other fingers remain down.
    pub fn touch_end(&mut self) {
        if self.mode == GestureMode::Dragging {
            self.mode = GestureMode::Idle;
        }
        if self.pinch.take().is_some() {
            tracing::debug!("pinch ended");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ModifierState;

    fn editor() -> OverlayEditor {
        OverlayEditor::new(SurfaceSize::square(400), OverlayAsset::new(RgbaImage::new(30, 30)))
    }

    fn polar(distance: f64, degrees: f64) -> SurfacePoint {
        let (sin, cos) = degrees.to_radians().sin_cos();
        SurfacePoint::new(distance * cos, distance * sin)
    }

    const ORIGIN: SurfacePoint = SurfacePoint::new(0.0, 0.0);

    #[test]
    fn pinch_applies_incremental_scale_and_rotation() {
        let mut editor = editor();
        editor.set_placement(Placement::new(100.0, 100.0, 150.0, 10.0));

        editor.touch_start(&[ORIGIN, polar(100.0, 0.0)]);
        assert!(editor.touch_move(&[ORIGIN, polar(150.0, 30.0)]));

        let placement = editor.placement();
        assert!((placement.size - 225.0).abs() < 1e-9);
        assert!((placement.rotation - 40.0).abs() < 1e-9);

        let pinch = editor.pinch().expect("pinch should still be tracked");
        assert!((pinch.distance - 150.0).abs() < 1e-9);
        assert!((pinch.angle - 30.0).abs() < 1e-9);
    }

    #[test]
    fn pinch_deltas_are_frame_to_frame() {
        let mut editor = editor();
        editor.touch_start(&[ORIGIN, polar(100.0, 0.0)]);
        editor.touch_move(&[ORIGIN, polar(200.0, 20.0)]);
        editor.touch_move(&[ORIGIN, polar(100.0, 20.0)]);

        let placement = editor.placement();
        assert!((placement.size - 150.0).abs() < 1e-9);
        assert!((placement.rotation - 20.0).abs() < 1e-9);
    }

    #[test]
    fn pinch_scale_respects_minimum_size() {
        let mut editor = editor();
        editor.touch_start(&[ORIGIN, polar(300.0, 0.0)]);
        editor.touch_move(&[ORIGIN, polar(1.0, 0.0)]);
        assert_eq!(editor.placement().size, MIN_OVERLAY_SIZE);

        editor.touch_move(&[ORIGIN, ORIGIN]);
        assert_eq!(editor.placement().size, MIN_OVERLAY_SIZE);
        // Growing back out of a collapsed pinch is neutral rather than infinite.
        editor.touch_move(&[ORIGIN, polar(80.0, 0.0)]);
        assert_eq!(editor.placement().size, MIN_OVERLAY_SIZE);
    }

    #[test]
    fn repeated_pinches_accumulate_rotation_past_full_turn() {
        let mut editor = editor();
        for _ in 0..5 {
            editor.touch_start(&[ORIGIN, polar(100.0, 0.0)]);
            editor.touch_move(&[ORIGIN, polar(100.0, 45.0)]);
            editor.touch_move(&[ORIGIN, polar(100.0, 90.0)]);
            editor.touch_end();
        }
        assert!((editor.placement().rotation - 450.0).abs() < 1e-9);
    }

    #[test]
    fn two_finger_move_without_pinch_start_is_ignored() {
        let mut editor = editor();
        assert!(!editor.touch_move(&[ORIGIN, polar(100.0, 0.0)]));
        assert_eq!(editor.placement(), Placement::default());
    }

    #[test]
    fn single_touch_on_overlay_drags_like_pointer() {
        let mut editor = editor();
        editor.touch_start(&[SurfacePoint::new(150.0, 150.0)]);
        assert_eq!(editor.mode(), GestureMode::Dragging);

        editor.touch_move(&[SurfacePoint::new(200.0, 180.0)]);
        assert_eq!(editor.placement(), Placement::new(125.0, 105.0, 150.0, 0.0));
    }

    #[test]
    fn single_touch_outside_overlay_does_not_drag() {
        let mut editor = editor();
        editor.touch_start(&[SurfacePoint::new(10.0, 10.0)]);
        assert_eq!(editor.mode(), GestureMode::Idle);
        assert!(!editor.touch_move(&[SurfacePoint::new(200.0, 180.0)]));
    }

    #[test]
    fn touch_end_clears_drag_and_pinch_together() {
        let mut editor = editor();
        editor.touch_start(&[SurfacePoint::new(150.0, 150.0)]);
        editor.touch_start(&[ORIGIN, polar(100.0, 0.0)]);
        assert_eq!(editor.mode(), GestureMode::Dragging);
        assert!(editor.pinch().is_some());

        editor.touch_end();
        assert_eq!(editor.mode(), GestureMode::Idle);
        assert!(editor.pinch().is_none());

        // A remaining finger does not resume dragging.
        assert!(!editor.touch_move(&[SurfacePoint::new(200.0, 200.0)]));
    }

    #[test]
    fn touch_end_leaves_pointer_resize_and_rotate_running() {
        let mut editor = editor();
        editor.pointer_press(SurfacePoint::new(150.0, 150.0), ModifierState::shift());
        assert_eq!(editor.mode(), GestureMode::Resizing);
        editor.touch_end();
        assert_eq!(editor.mode(), GestureMode::Resizing);
        editor.pointer_release();

        editor.pointer_press(SurfacePoint::new(150.0, 150.0), ModifierState::alt());
        assert_eq!(editor.mode(), GestureMode::Rotating);
        editor.touch_end();
        assert_eq!(editor.mode(), GestureMode::Rotating);
    }
}
