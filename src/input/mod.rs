//! Keyboard modifier state carried with pointer presses.

/// Modifier keys held when a pointer press lands on the canvas. Only shift
/// and alt select a gesture; other modifiers are not tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModifierState {
    pub shift: bool,
    pub alt: bool,
}

impl ModifierState {
    pub const fn none() -> Self {
        Self {
            shift: false,
            alt: false,
        }
    }

    pub const fn shift() -> Self {
        Self {
            shift: true,
            ..Self::none()
        }
    }

    pub const fn alt() -> Self {
        Self {
            alt: true,
            ..Self::none()
        }
    }
}

/// What a press on the overlay should start, based on held modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressIntent {
    Move,
    Resize,
    Rotate,
}

/// Shift wins over alt when both are held.
pub const fn resolve_press_intent(modifiers: ModifierState) -> PressIntent {
    if modifiers.shift {
        PressIntent::Resize
    } else if modifiers.alt {
        PressIntent::Rotate
    } else {
        PressIntent::Move
    }
}
