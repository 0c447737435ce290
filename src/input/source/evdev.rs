use std::{
    fmt::Debug,
    io,
    os::fd::{AsRawFd, RawFd},
    path::{Path, PathBuf},
};

use evdev::Device;
use nix::fcntl::{FcntlArg, OFlag};

use crate::input::event::RawEvent;

use super::{DeviceError, InputSource, SourceEnumerator};

/// Source device implementation for evdev input devices
pub struct EvdevSource {
    path: PathBuf,
    name: String,
    device: Device,
}

impl EvdevSource {
    /// Open the input device at the given path (e.g. /dev/input/event0)
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DeviceError> {
        let path = path.as_ref();
        log::debug!("Opening device at: {}", path.display());
        let device = Device::open(path).map_err(DeviceError::Open)?;
        Self::from_device(path.to_path_buf(), device)
    }

    fn from_device(path: PathBuf, device: Device) -> Result<Self, DeviceError> {
        // Reads are driven by readiness notifications, so they must never block
        let raw_fd = device.as_raw_fd();
        nix::fcntl::fcntl(raw_fd, FcntlArg::F_SETFL(OFlag::O_NONBLOCK))?;

        let name = device.name().unwrap_or_default().to_string();
        Ok(Self { path, name, device })
    }
}

impl InputSource for EvdevSource {
    fn path(&self) -> &Path {
        &self.path
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn raw_fd(&self) -> RawFd {
        self.device.as_raw_fd()
    }

    fn fetch_events(&mut self, events: &mut Vec<RawEvent>) -> Result<(), DeviceError> {
        // Readiness is edge triggered, so read until the device runs dry
        loop {
            match self.device.fetch_events() {
                Ok(batch) => {
                    let count = events.len();
                    events.extend(batch.map(RawEvent::from));
                    if events.len() == count {
                        break;
                    }
                }
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => break,
                Err(err) => return Err(DeviceError::Read(err)),
            }
        }
        Ok(())
    }

    fn grab(&mut self) -> Result<(), DeviceError> {
        self.device.grab().map_err(DeviceError::Grab)
    }

    fn ungrab(&mut self) -> Result<(), DeviceError> {
        self.device.ungrab().map_err(DeviceError::Ungrab)
    }
}

impl Debug for EvdevSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvdevSource")
            .field("path", &self.path)
            .field("name", &self.name)
            .finish()
    }
}

/// Enumerates evdev devices under /dev/input
#[derive(Debug, Default, Clone)]
pub struct EvdevEnumerator;

impl SourceEnumerator for EvdevEnumerator {
    fn enumerate(&self) -> Vec<Box<dyn InputSource>> {
        let mut sources: Vec<Box<dyn InputSource>> = Vec::new();
        for (path, device) in evdev::enumerate() {
            match EvdevSource::from_device(path.clone(), device) {
                Ok(source) => sources.push(Box::new(source)),
                Err(e) => log::debug!("Unable to use device {}: {e}", path.display()),
            }
        }

        // Enumeration order is not guaranteed; scan devices by path instead
        sources.sort_by(|a, b| a.path().cmp(b.path()));
        sources
    }
}
