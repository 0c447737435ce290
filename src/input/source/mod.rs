pub mod evdev;

#[cfg(test)]
pub mod mock;

use std::{
    fmt::Debug,
    io,
    os::fd::RawFd,
    path::{Path, PathBuf},
};

use thiserror::Error;

use super::event::RawEvent;

/// Possible errors for a source input device
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("Failed to open device: {0}")]
    Open(io::Error),
    #[error("Failed to read events: {0}")]
    Read(io::Error),
    #[error("Failed to grab device: {0}")]
    Grab(io::Error),
    #[error("Failed to ungrab device: {0}")]
    Ungrab(io::Error),
    #[error("Failed to set non-blocking mode: {0}")]
    Nonblocking(#[from] nix::Error),
}

/// A physical input device that emits raw input events. Dropping the source
/// closes the underlying device.
pub trait InputSource: Send + Debug {
    /// Path of the device node (e.g. /dev/input/event5). This is the handle
    /// the device is tracked by.
    fn path(&self) -> &Path;

    /// Name the device advertises
    fn name(&self) -> &str;

    /// File descriptor that becomes readable when events are pending
    fn raw_fd(&self) -> RawFd;

    /// Read all pending events without blocking and append them to `events`.
    /// Nothing is appended if no events are pending. Any error means the
    /// device is gone; events read before the error are kept in `events`.
    fn fetch_events(&mut self, events: &mut Vec<RawEvent>) -> Result<(), DeviceError>;

    /// Take exclusive access to the device
    fn grab(&mut self) -> Result<(), DeviceError>;

    /// Release exclusive access to the device
    fn ungrab(&mut self) -> Result<(), DeviceError>;
}

/// Lists the input devices that are currently present
pub trait SourceEnumerator: Send + Sync {
    fn enumerate(&self) -> Vec<Box<dyn InputSource>>;
}

/// Summary of a present input device, used for listing
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub path: PathBuf,
    pub name: String,
}

impl From<&dyn InputSource> for SourceInfo {
    fn from(source: &dyn InputSource) -> Self {
        Self {
            path: source.path().to_path_buf(),
            name: source.name().to_string(),
        }
    }
}
