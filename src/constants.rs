use std::time::Duration;

/// Lowest value a stick or pad axis can report
pub const STICK_PAD_MIN: i32 = -32768;
/// Highest value a stick or pad axis can report
pub const STICK_PAD_MAX: i32 = 32768;
/// Value of a fully released trigger
pub const TRIGGER_MIN: i32 = 0;
/// Value of a fully pressed trigger
pub const TRIGGER_MAX: i32 = 255;

/// Raw axis range assumed when a device config entry does not declare one
pub const DEFAULT_AXIS_MIN: i32 = -127;
pub const DEFAULT_AXIS_MAX: i32 = 128;
pub const DEFAULT_AXIS_CENTER: i32 = 0;

/// Time between two background device scans
pub const SCAN_INTERVAL: Duration = Duration::from_secs(5);

/// Prefix of every identity handed out to evdev controllers
pub const ID_PREFIX: &str = "ev";

/// Controller type reported by evdev controllers
pub const CONTROLLER_TYPE: &str = "evdev";

/// Directory name used below the XDG and system config locations
pub const CONFIG_PREFIX: &str = "evpad";
