use crate::constants::{STICK_PAD_MAX, STICK_PAD_MIN, TRIGGER_MAX, TRIGGER_MIN};

use super::capability::AxisClass;

/// Absorbs floating point error when a value lands exactly half a raw step
/// from zero
const ROUNDING_TOLERANCE: f64 = 1e-6;

/// Linear transform from a device's raw axis range onto the canonical range
/// of a logical axis, with a dead zone around zero.
///
/// Calibrated values are `raw * scale + offset`, clamped to the canonical
/// range of the axis class. Any value whose magnitude is not greater than
/// `deadzone` becomes exactly zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisCalibration {
    pub scale: f64,
    pub offset: f64,
    pub deadzone: f64,
    class: AxisClass,
}

impl AxisCalibration {
    /// Compute the calibration for an axis declaring the given raw range.
    /// `max` may be less than `min` for axes that are physically inverted.
    pub fn new(min: i32, max: i32, center: i32, class: AxisClass) -> Self {
        let (out_min, out_max) = output_range(class);
        let (min, max) = (min as f64, max as f64);

        let (scale, offset, rest) = if max > min {
            let scale = (out_max - out_min) / (max - min);
            (scale, out_min - min * scale, min)
        } else {
            // Inverted axes. A single-value range always reads as zero.
            let span = min - max;
            let scale = if span == 0.0 {
                0.0
            } else {
                -(out_max - out_min) / span
            };
            let offset = if span == 0.0 {
                0.0
            } else {
                out_min - min * scale
            };
            (scale, offset, max)
        };

        // Triggers rest at one end of their raw range, sticks and pads at the
        // declared center.
        let deadzone_center = match class {
            AxisClass::Trigger => rest.abs(),
            AxisClass::Stick => (center as f64).abs(),
        };

        // Values within half a raw step of zero also read as rest. The slack
        // is capped at a quarter of the output range so both ends of tiny
        // ranges such as hat switches survive.
        let half_span = (out_max - out_min) / 2.0;
        let slack = (scale.abs() / 2.0 + ROUNDING_TOLERANCE).min(half_span / 2.0);
        let deadzone = deadzone_center.max(slack);

        Self {
            scale,
            offset,
            deadzone,
            class,
        }
    }

    pub fn class(&self) -> AxisClass {
        self.class
    }

    /// Convert the given raw sample into a calibrated value
    pub fn apply(&self, raw: i32) -> i32 {
        let (out_min, out_max) = output_range(self.class);
        let value = (raw as f64 * self.scale + self.offset).clamp(out_min, out_max);
        if value.abs() <= self.deadzone {
            return 0;
        }
        value.round() as i32
    }
}

/// Returns the canonical (min, max) output of the given axis class
fn output_range(class: AxisClass) -> (f64, f64) {
    match class {
        AxisClass::Trigger => (TRIGGER_MIN as f64, TRIGGER_MAX as f64),
        AxisClass::Stick => (STICK_PAD_MIN as f64, STICK_PAD_MAX as f64),
    }
}
