use crate::constants::{STICK_PAD_MAX, STICK_PAD_MIN, TRIGGER_MAX, TRIGGER_MIN};

use super::capability::{Axis, Buttons};

/// Snapshot of every logical field of a controller. Snapshots are never
/// changed in place; the `with_*` methods return a new snapshot instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControllerState {
    buttons: Buttons,
    ltrig: i32,
    rtrig: i32,
    stick_x: i32,
    stick_y: i32,
    lpad_x: i32,
    lpad_y: i32,
    rpad_x: i32,
    rpad_y: i32,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            buttons: Buttons::empty(),
            ltrig: 0,
            rtrig: 0,
            stick_x: 0,
            stick_y: 0,
            lpad_x: 0,
            lpad_y: 0,
            rpad_x: 0,
            rpad_y: 0,
        }
    }
}

impl ControllerState {
    pub fn buttons(&self) -> Buttons {
        self.buttons
    }

    /// Returns the current value of the given axis
    pub fn axis(&self, axis: Axis) -> i32 {
        match axis {
            Axis::LTrig => self.ltrig,
            Axis::RTrig => self.rtrig,
            Axis::StickX => self.stick_x,
            Axis::StickY => self.stick_y,
            Axis::LPadX => self.lpad_x,
            Axis::LPadY => self.lpad_y,
            Axis::RPadX => self.rpad_x,
            Axis::RPadY => self.rpad_y,
        }
    }

    /// Returns a copy of this state with the given button mask
    pub fn with_buttons(self, buttons: Buttons) -> Self {
        Self { buttons, ..self }
    }

    /// Returns a copy of this state with the given button pressed or released
    pub fn with_button(self, button: Buttons, pressed: bool) -> Self {
        let mut buttons = self.buttons;
        buttons.set(button, pressed);
        self.with_buttons(buttons)
    }

    /// Returns a copy of this state with the given axis set to `value`. The
    /// value is clamped to the canonical range of the axis.
    pub fn with_axis(self, axis: Axis, value: i32) -> Self {
        match axis {
            Axis::LTrig => Self {
                ltrig: clamp_trigger(value),
                ..self
            },
            Axis::RTrig => Self {
                rtrig: clamp_trigger(value),
                ..self
            },
            Axis::StickX => Self {
                stick_x: clamp_stick(value),
                ..self
            },
            Axis::StickY => Self {
                stick_y: clamp_stick(value),
                ..self
            },
            Axis::LPadX => Self {
                lpad_x: clamp_stick(value),
                ..self
            },
            Axis::LPadY => Self {
                lpad_y: clamp_stick(value),
                ..self
            },
            Axis::RPadX => Self {
                rpad_x: clamp_stick(value),
                ..self
            },
            Axis::RPadY => Self {
                rpad_y: clamp_stick(value),
                ..self
            },
        }
    }
}

fn clamp_trigger(value: i32) -> i32 {
    value.clamp(TRIGGER_MIN, TRIGGER_MAX)
}

fn clamp_stick(value: i32) -> i32 {
    value.clamp(STICK_PAD_MIN, STICK_PAD_MAX)
}
