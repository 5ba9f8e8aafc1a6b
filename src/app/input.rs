use num_enum::TryFromPrimitive;
use strum::Display;

use crate::utils::coords::ScreenPoint;

// ----------------------------------------------
// MouseButton / InputAction
// ----------------------------------------------

// Discriminants match the backend's raw button numbers.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, TryFromPrimitive)]
pub enum MouseButton {
    Left   = 1,
    Middle = 2,
    Right  = 3,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Display)]
pub enum InputAction {
    Press,
    Release,
}

// ----------------------------------------------
// InputEvent
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    CursorMoved(ScreenPoint),
    MouseButton(MouseButton, InputAction, ScreenPoint),
}

impl InputEvent {
    // Builds a button event from a raw backend button number.
    // Unknown buttons yield None.
    pub fn from_raw_button(button: u8, action: InputAction, position: ScreenPoint) -> Option<Self> {
        MouseButton::try_from(button)
            .ok()
            .map(|button| InputEvent::MouseButton(button, action, position))
    }

    #[inline]
    pub fn position(&self) -> ScreenPoint {
        match *self {
            InputEvent::CursorMoved(position) => position,
            InputEvent::MouseButton(_, _, position) => position,
        }
    }
}

// ----------------------------------------------
// UiInputEvent
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UiInputEvent {
    Handled,    // Input event was handled/consumed and should not propagate.
    NotHandled, // Input event wasn't handled and should propagate to other widgets.
}

impl UiInputEvent {
    #[inline]
    pub fn is_handled(self) -> bool {
        self == UiInputEvent::Handled
    }

    #[inline]
    pub fn not_handled(self) -> bool {
        self == UiInputEvent::NotHandled
    }
}
