use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::editor::OverlayEditor;
use crate::geometry::SurfacePoint;

use gtk4::prelude::*;
use gtk4::DrawingArea;

use super::input_bridge::{is_touchscreen_event, modifier_state};

#[derive(Clone)]
pub(super) struct CanvasGestureContext {
    pub(super) canvas: DrawingArea,
    pub(super) editor: Rc<RefCell<OverlayEditor>>,
}

impl CanvasGestureContext {
    fn redraw_if(&self, changed: bool) {
        if changed {
            self.canvas.queue_draw();
        }
    }
}

/// Mouse press/move/release plus single-finger touch drags.
pub(super) fn connect_canvas_drag_gesture(context: CanvasGestureContext) {
    let drag = gtk4::GestureDrag::new();
    let touch_sequence = Rc::new(Cell::new(false));

    let begin_context = context.clone();
    let begin_touch = touch_sequence.clone();
    drag.connect_drag_begin(move |gesture, x, y| {
        let point = SurfacePoint::new(x, y);
        let is_touch = is_touchscreen_event(gesture);
        begin_touch.set(is_touch);
        let mut editor = begin_context.editor.borrow_mut();
        if is_touch {
            editor.touch_start(&[point]);
        } else {
            editor.pointer_press(point, modifier_state(gesture.current_event_state()));
        }
    });

    let update_context = context.clone();
    let update_touch = touch_sequence.clone();
    drag.connect_drag_update(move |gesture, offset_x, offset_y| {
        let Some((start_x, start_y)) = gesture.start_point() else {
            return;
        };
        let point = SurfacePoint::new(start_x + offset_x, start_y + offset_y);
        let changed = {
            let mut editor = update_context.editor.borrow_mut();
            if update_touch.get() {
                // Two fingers down: the pinch gesture owns the update.
                editor.pinch().is_none() && editor.touch_move(&[point])
            } else {
                editor.pointer_move(point)
            }
        };
        update_context.redraw_if(changed);
    });

    let end_context = context.clone();
    drag.connect_drag_end(move |_, _, _| {
        let mut editor = end_context.editor.borrow_mut();
        if touch_sequence.replace(false) {
            editor.touch_end();
        } else {
            editor.pointer_release();
        }
    });

    context.canvas.add_controller(drag);
}

/// Two-finger pinch: scale and rotation from the raw touch points.
pub(super) fn connect_canvas_pinch_gesture(context: CanvasGestureContext) {
    let pinch = gtk4::GestureZoom::new();

    let begin_context = context.clone();
    pinch.connect_begin(move |gesture, _| {
        if let Some(points) = two_touch_points(gesture) {
            begin_context.editor.borrow_mut().touch_start(&points);
        }
    });

    let update_context = context.clone();
    pinch.connect_scale_changed(move |gesture, _| {
        let Some(points) = two_touch_points(gesture) else {
            return;
        };
        let changed = update_context.editor.borrow_mut().touch_move(&points);
        update_context.redraw_if(changed);
    });

    let end_context = context.clone();
    pinch.connect_end(move |_, _| {
        end_context.editor.borrow_mut().touch_end();
    });

    context.canvas.add_controller(pinch);
}

fn two_touch_points<G: IsA<gtk4::Gesture>>(gesture: &G) -> Option<[SurfacePoint; 2]> {
    let sequences = gesture.sequences();
    let mut points = sequences
        .iter()
        .filter_map(|sequence| gesture.point(Some(sequence)))
        .map(|(x, y)| SurfacePoint::new(x, y));
    Some([points.next()?, points.next()?])
}
