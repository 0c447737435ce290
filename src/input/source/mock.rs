//! In-memory devices and collaborators used by unit tests

use std::{
    collections::VecDeque,
    io,
    os::fd::RawFd,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicI32, Ordering},
        Arc, Mutex,
    },
    time::SystemTime,
};

use mio::Token;

use crate::input::{
    controller::Controller, event::RawEvent, manager::Daemon, mapper::Mapper, poller::Poller,
    state::ControllerState,
};

use super::{DeviceError, InputSource, SourceEnumerator};

static NEXT_FD: AtomicI32 = AtomicI32::new(1000);

/// Shared view of a mock device, kept by the test to script reads and
/// inspect what happened to the device.
#[derive(Debug, Default)]
pub struct MockDevice {
    pub batches: VecDeque<Result<Vec<RawEvent>, io::ErrorKind>>,
    pub grabbed: bool,
    pub grab_fails: bool,
    pub ungrab_fails: bool,
    /// Number of currently open handles to this device
    pub open: usize,
    pub reads: usize,
}

pub type MockHandle = Arc<Mutex<MockDevice>>;

#[derive(Debug)]
pub struct MockSource {
    path: PathBuf,
    name: String,
    fd: RawFd,
    device: MockHandle,
}

impl MockSource {
    pub fn new(path: &str, name: &str) -> (Self, MockHandle) {
        let device = MockHandle::default();
        (Self::with_handle(path, name, device.clone()), device)
    }

    pub fn with_handle(path: &str, name: &str, device: MockHandle) -> Self {
        device.lock().unwrap().open += 1;
        Self {
            path: PathBuf::from(path),
            name: name.to_string(),
            fd: NEXT_FD.fetch_add(1, Ordering::SeqCst),
            device,
        }
    }
}

impl Drop for MockSource {
    fn drop(&mut self) {
        if let Ok(mut device) = self.device.lock() {
            device.open -= 1;
        }
    }
}

impl InputSource for MockSource {
    fn path(&self) -> &Path {
        &self.path
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn raw_fd(&self) -> RawFd {
        self.fd
    }

    fn fetch_events(&mut self, events: &mut Vec<RawEvent>) -> Result<(), DeviceError> {
        let mut device = self.device.lock().unwrap();
        device.reads += 1;
        // Drains every scripted batch like a real device read
        while let Some(batch) = device.batches.pop_front() {
            match batch {
                Ok(batch) => events.extend(batch),
                Err(kind) => return Err(DeviceError::Read(io::Error::from(kind))),
            }
        }
        Ok(())
    }

    fn grab(&mut self) -> Result<(), DeviceError> {
        let mut device = self.device.lock().unwrap();
        if device.grab_fails {
            return Err(DeviceError::Grab(io::Error::from(io::ErrorKind::PermissionDenied)));
        }
        device.grabbed = true;
        Ok(())
    }

    fn ungrab(&mut self) -> Result<(), DeviceError> {
        let mut device = self.device.lock().unwrap();
        if device.ungrab_fails {
            return Err(DeviceError::Ungrab(io::Error::from(io::ErrorKind::NotFound)));
        }
        device.grabbed = false;
        Ok(())
    }
}

/// Enumerator over a scripted list of present devices. Every enumeration
/// opens a new handle to each present device.
#[derive(Debug, Default)]
pub struct MockEnumerator {
    devices: Mutex<Vec<(String, String, MockHandle)>>,
    pub scans: Mutex<usize>,
}

impl MockEnumerator {
    /// Plug in a device and return its handle
    pub fn plug(&self, path: &str, name: &str) -> MockHandle {
        let device = MockHandle::default();
        self.devices
            .lock()
            .unwrap()
            .push((path.to_string(), name.to_string(), device.clone()));
        device
    }

    pub fn unplug(&self, path: &str) {
        self.devices.lock().unwrap().retain(|(p, _, _)| p != path);
    }
}

impl SourceEnumerator for MockEnumerator {
    fn enumerate(&self) -> Vec<Box<dyn InputSource>> {
        *self.scans.lock().unwrap() += 1;
        self.devices
            .lock()
            .unwrap()
            .iter()
            .map(|(path, name, device)| {
                Box::new(MockSource::with_handle(path, name, device.clone())) as Box<dyn InputSource>
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollerCall {
    Register(RawFd, Token),
    Unregister(RawFd),
}

#[derive(Debug, Default, Clone)]
pub struct MockPoller {
    pub calls: Arc<Mutex<Vec<PollerCall>>>,
}

impl MockPoller {
    /// Descriptors that are currently registered
    pub fn registered(&self) -> Vec<RawFd> {
        let mut fds = Vec::new();
        for call in self.calls.lock().unwrap().iter() {
            match call {
                PollerCall::Register(fd, _) => fds.push(*fd),
                PollerCall::Unregister(fd) => fds.retain(|f| f != fd),
            }
        }
        fds
    }
}

impl Poller for MockPoller {
    fn register(&self, fd: RawFd, token: Token) -> io::Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(PollerCall::Register(fd, token));
        Ok(())
    }

    fn unregister(&self, fd: RawFd) -> io::Result<()> {
        self.calls.lock().unwrap().push(PollerCall::Unregister(fd));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaemonCall {
    Added(String),
    Removed(String),
}

#[derive(Debug, Default, Clone)]
pub struct MockDaemon {
    pub calls: Arc<Mutex<Vec<DaemonCall>>>,
}

impl Daemon for MockDaemon {
    fn add_controller(&mut self, controller: &dyn Controller) {
        self.calls
            .lock()
            .unwrap()
            .push(DaemonCall::Added(controller.get_id().to_string()));
    }

    fn remove_controller(&mut self, controller: &dyn Controller) {
        self.calls
            .lock()
            .unwrap()
            .push(DaemonCall::Removed(controller.get_id().to_string()));
    }
}

#[derive(Debug, Default, Clone)]
pub struct MockMapper {
    pub inputs: Arc<Mutex<Vec<(String, ControllerState, ControllerState)>>>,
}

impl Mapper for MockMapper {
    fn input(
        &self,
        controller_id: &str,
        _timestamp: SystemTime,
        old_state: &ControllerState,
        new_state: &ControllerState,
    ) {
        self.inputs
            .lock()
            .unwrap()
            .push((controller_id.to_string(), *old_state, *new_state));
    }
}
