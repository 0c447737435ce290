use std::{fmt, str::FromStr};

use bitflags::bitflags;

bitflags! {
    /// Logical buttons a controller can report. Device configs refer to these
    /// by flag name (e.g. "A", "START", "LPAD").
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Buttons: u32 {
        const STICKPRESS = 0b0100_0000_0000_0000_0000_0000_0000_0000;
        const RPADTOUCH  = 0b0001_0000_0000_0000_0000_0000_0000_0000;
        const LPADTOUCH  = 0b0000_1000_0000_0000_0000_0000_0000_0000;
        const RPAD       = 0b0000_0100_0000_0000_0000_0000_0000_0000;
        const LPAD       = 0b0000_0010_0000_0000_0000_0000_0000_0000;
        const RGRIP      = 0b0000_0001_0000_0000_0000_0000_0000_0000;
        const LGRIP      = 0b0000_0000_1000_0000_0000_0000_0000_0000;
        const START      = 0b0000_0000_0100_0000_0000_0000_0000_0000;
        const C          = 0b0000_0000_0010_0000_0000_0000_0000_0000;
        const BACK       = 0b0000_0000_0001_0000_0000_0000_0000_0000;
        const A          = 0b0000_0000_0000_0000_1000_0000_0000_0000;
        const X          = 0b0000_0000_0000_0000_0100_0000_0000_0000;
        const B          = 0b0000_0000_0000_0000_0010_0000_0000_0000;
        const Y          = 0b0000_0000_0000_0000_0001_0000_0000_0000;
        const LB         = 0b0000_0000_0000_0000_0000_1000_0000_0000;
        const RB         = 0b0000_0000_0000_0000_0000_0100_0000_0000;
        const LT         = 0b0000_0000_0000_0000_0000_0010_0000_0000;
        const RT         = 0b0000_0000_0000_0000_0000_0001_0000_0000;
        const CPADTOUCH  = 0b0000_0000_0000_0000_0000_0000_0000_0100;
        const CPADPRESS  = 0b0000_0000_0000_0000_0000_0000_0000_0010;
    }
}

bitflags! {
    /// Describes the physical layout of a controller to the mapping engine
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ControllerFlags: u32 {
        const HAS_RSTICK     = 1 << 0;
        const SEPARATE_STICK = 1 << 1;
        const EUREL_GYROS    = 1 << 2;
        const HAS_CPAD       = 1 << 3;
        const HAS_DPAD       = 1 << 4;
        const NO_GRIPS       = 1 << 5;
    }
}

/// Class of a logical axis. Triggers and stick/pad axes are calibrated onto
/// different output ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisClass {
    Trigger,
    Stick,
}

/// Logical axes of a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    LTrig,
    RTrig,
    StickX,
    StickY,
    LPadX,
    LPadY,
    RPadX,
    RPadY,
}

impl Axis {
    pub const ALL: [Axis; 8] = [
        Axis::LTrig,
        Axis::RTrig,
        Axis::StickX,
        Axis::StickY,
        Axis::LPadX,
        Axis::LPadY,
        Axis::RPadX,
        Axis::RPadY,
    ];

    pub fn class(&self) -> AxisClass {
        match self {
            Axis::LTrig | Axis::RTrig => AxisClass::Trigger,
            _ => AxisClass::Stick,
        }
    }

    /// Name of the axis as used in device configs
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::LTrig => "ltrig",
            Axis::RTrig => "rtrig",
            Axis::StickX => "stick_x",
            Axis::StickY => "stick_y",
            Axis::LPadX => "lpad_x",
            Axis::LPadY => "lpad_y",
            Axis::RPadX => "rpad_x",
            Axis::RPadY => "rpad_y",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ltrig" => Ok(Axis::LTrig),
            "rtrig" => Ok(Axis::RTrig),
            "stick_x" => Ok(Axis::StickX),
            "stick_y" => Ok(Axis::StickY),
            "lpad_x" => Ok(Axis::LPadX),
            "lpad_y" => Ok(Axis::LPadY),
            "rpad_x" => Ok(Axis::RPadX),
            "rpad_y" => Ok(Axis::RPadY),
            _ => Err(format!("unknown axis '{s}'")),
        }
    }
}
