use std::{
    collections::{HashMap, VecDeque},
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use mio::Token;

use crate::config::{path::find_device_config, DeviceConfig};

use super::source::{InputSource, SourceEnumerator};

/// A device found by a scan together with its parsed config
#[derive(Debug)]
pub struct Discovered {
    pub source: Box<dyn InputSource>,
    pub config: DeviceConfig,
    pub config_path: PathBuf,
}

/// State shared between the main loop and the scan thread
#[derive(Debug, Default)]
pub struct SharedState {
    /// Attached devices by device path
    pub devices: HashMap<PathBuf, Token>,
    /// Devices found by the scan thread that are not attached yet
    pub discovered: VecDeque<Discovered>,
    scan_thread: Option<JoinHandle<()>>,
    next_scan: Option<Instant>,
}

/// Lock the shared state. A scan thread that panicked while holding the lock
/// leaves the state usable, so poisoning is ignored.
pub fn lock(shared: &Mutex<SharedState>) -> MutexGuard<'_, SharedState> {
    shared.lock().unwrap_or_else(|e| e.into_inner())
}

/// Looks for present input devices that have a device config, on a
/// background thread.
pub struct DeviceScanner {
    shared: Arc<Mutex<SharedState>>,
    enumerator: Arc<dyn SourceEnumerator>,
    config_paths: Arc<Vec<PathBuf>>,
    interval: Duration,
}

impl DeviceScanner {
    pub fn new(
        enumerator: Arc<dyn SourceEnumerator>,
        config_paths: Vec<PathBuf>,
        interval: Duration,
    ) -> Self {
        Self {
            shared: Arc::new(Mutex::new(SharedState::default())),
            enumerator,
            config_paths: Arc::new(config_paths),
            interval,
        }
    }

    pub fn shared(&self) -> &Arc<Mutex<SharedState>> {
        &self.shared
    }

    /// Start a scan on a background thread. Does nothing if a scan is
    /// already running. Returns true if a new scan was started.
    pub fn scan(&self) -> bool {
        let mut shared = lock(&self.shared);
        if shared.scan_thread.is_some() {
            log::trace!("Scan already in progress");
            return false;
        }

        let state = self.shared.clone();
        let enumerator = self.enumerator.clone();
        let config_paths = self.config_paths.clone();
        let interval = self.interval;

        // The lock is held until the handle is stored, so the thread cannot
        // finish and clear the handle before it is set.
        let result = thread::Builder::new()
            .name("evpad-scan".to_string())
            .spawn(move || {
                scan_devices(&state, enumerator.as_ref(), &config_paths);
                let mut shared = lock(&state);
                shared.scan_thread.take();
                shared.next_scan = Some(Instant::now() + interval);
            });

        match result {
            Ok(handle) => {
                shared.scan_thread = Some(handle);
                true
            }
            Err(e) => {
                log::error!("Unable to start scan thread: {e}");
                shared.next_scan = Some(Instant::now() + interval);
                false
            }
        }
    }

    /// Returns true if a scan is currently running
    pub fn is_scanning(&self) -> bool {
        lock(&self.shared).scan_thread.is_some()
    }

    /// Returns true if the next scan should be started at the given time
    pub fn scan_due(&self, now: Instant) -> bool {
        match lock(&self.shared).next_scan {
            Some(next_scan) => now >= next_scan,
            None => true,
        }
    }

    /// Time at which the next scan is scheduled, if any
    pub fn next_scan(&self) -> Option<Instant> {
        lock(&self.shared).next_scan
    }

    pub fn is_attached(&self, path: &Path) -> bool {
        lock(&self.shared).devices.contains_key(path)
    }

    /// Take all discovered devices out of the queue, oldest first
    pub fn take_discovered(&self) -> Vec<Discovered> {
        lock(&self.shared).discovered.drain(..).collect()
    }
}

/// Enumerate present devices and queue every device that is not attached yet
/// and has a valid device config.
pub fn scan_devices(
    shared: &Mutex<SharedState>,
    enumerator: &dyn SourceEnumerator,
    config_paths: &[PathBuf],
) {
    log::debug!("Scanning for input devices");
    for source in enumerator.enumerate() {
        if lock(shared).devices.contains_key(source.path()) {
            log::trace!("Device already attached: {}", source.path().display());
            continue;
        }

        let Some(config_path) = find_device_config(config_paths, source.name()) else {
            log::trace!(
                "No config for device '{}' at {}",
                source.name(),
                source.path().display()
            );
            continue;
        };

        let config = match DeviceConfig::from_path(&config_path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load device config {config_path:?}: {e}");
                continue;
            }
        };

        log::debug!(
            "Discovered device '{}' at {} using {config_path:?}",
            source.name(),
            source.path().display()
        );
        lock(shared).discovered.push_back(Discovered {
            source,
            config,
            config_path,
        });
    }
}
