use crate::input::ModifierState;

use gtk4::prelude::*;

pub(super) fn modifier_state(modifier: gtk4::gdk::ModifierType) -> ModifierState {
    ModifierState {
        shift: modifier.contains(gtk4::gdk::ModifierType::SHIFT_MASK),
        alt: modifier.contains(gtk4::gdk::ModifierType::ALT_MASK),
    }
}

/// Touchscreen input takes the touch path even when it arrives through a
/// single-point gesture.
pub(super) fn is_touchscreen_event<G: IsA<gtk4::EventController>>(gesture: &G) -> bool {
    gesture
        .current_event_device()
        .is_some_and(|device| device.source() == gtk4::gdk::InputSource::Touchscreen)
}
