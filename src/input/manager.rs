use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

use mio::Token;

use crate::{config::path::get_devices_paths, constants::SCAN_INTERVAL};

use super::{
    controller::{Controller, EvdevController},
    identity::IdentityAllocator,
    mapper::Mapper,
    poller::Poller,
    scanner::{lock, DeviceScanner, Discovered},
    source::SourceEnumerator,
};

/// Receives every controller that is attached and removed. Each controller
/// is added and removed exactly once.
pub trait Daemon {
    fn add_controller(&mut self, controller: &dyn Controller);
    fn remove_controller(&mut self, controller: &dyn Controller);
}

/// Options for creating a [Manager]
#[derive(Debug, Clone)]
pub struct ManagerOptions {
    /// Directories searched for device configs, in load order
    pub config_paths: Vec<PathBuf>,
    /// Time between the end of one device scan and the start of the next
    pub scan_interval: Duration,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            config_paths: get_devices_paths(),
            scan_interval: SCAN_INTERVAL,
        }
    }
}

/// Manages evdev controllers
///
/// The [Manager] periodically scans for input devices on a background thread.
/// Devices with a device config are queued by the scan and attached on the
/// next call to [Manager::mainloop]. Attached devices are read whenever the
/// poller reports them as readable and are removed when reading fails.
pub struct Manager {
    poller: Box<dyn Poller>,
    daemon: Box<dyn Daemon>,
    mapper: Option<Arc<dyn Mapper>>,
    scanner: DeviceScanner,
    identities: IdentityAllocator,
    /// Attached controllers by poller token
    controllers: HashMap<Token, EvdevController>,
    next_token: usize,
}

impl Manager {
    /// Returns a new instance of [Manager]. No devices are scanned for until
    /// [Manager::start] or [Manager::mainloop] is called.
    pub fn new(
        poller: Box<dyn Poller>,
        daemon: Box<dyn Daemon>,
        mapper: Option<Arc<dyn Mapper>>,
        enumerator: Arc<dyn SourceEnumerator>,
        options: ManagerOptions,
    ) -> Self {
        log::debug!("Device configs are loaded from: {:?}", options.config_paths);
        let scanner = DeviceScanner::new(enumerator, options.config_paths, options.scan_interval);
        Self {
            poller,
            daemon,
            mapper,
            scanner,
            identities: IdentityAllocator::new(),
            controllers: HashMap::new(),
            next_token: 0,
        }
    }

    /// Start the first device scan
    pub fn start(&mut self) {
        self.scanner.scan();
    }

    /// Process one tick of the main loop: start a new scan if one is due and
    /// attach every device that was discovered since the last tick.
    pub fn mainloop(&mut self) {
        self.tick(Instant::now());
    }

    /// Same as [Manager::mainloop] using the given time as the current time
    pub fn tick(&mut self, now: Instant) {
        if self.scanner.scan_due(now) {
            self.scanner.scan();
        }

        for discovered in self.scanner.take_discovered() {
            if self.scanner.is_attached(discovered.source.path()) {
                log::debug!(
                    "Dropping discovered device {}: already attached",
                    discovered.source.path().display()
                );
                continue;
            }
            self.attach(discovered);
        }
    }

    /// Called by the owner of the poller when the device registered with the
    /// given token is readable.
    pub fn on_readable(&mut self, token: Token) {
        let Some(controller) = self.controllers.get_mut(&token) else {
            log::trace!("Readiness for unknown token {token:?}");
            return;
        };

        if let Err(e) = controller.input() {
            // A failed read means the device was unplugged
            log::error!("{controller}: {e}");
            let path = controller.path().to_path_buf();
            self.remove_device(&path);
        }
    }

    /// Create a controller for the given discovered device and hand it to the
    /// daemon.
    fn attach(&mut self, discovered: Discovered) {
        let Discovered {
            source,
            config,
            config_path,
        } = discovered;
        let path = source.path().to_path_buf();
        let token = Token(self.next_token);
        self.next_token += 1;

        let mut controller = match EvdevController::attach(
            source,
            &config,
            &mut self.identities,
            token,
            self.poller.as_ref(),
        ) {
            Ok(controller) => controller,
            Err(e) => {
                log::error!("Unable to watch device {}: {e}", path.display());
                return;
            }
        };
        controller.set_mapper(self.mapper.clone());

        lock(self.scanner.shared())
            .devices
            .insert(path.clone(), token);
        self.daemon.add_controller(&controller);
        log::info!(
            "Evdev device added: {controller} as {} ({config_path:?})",
            controller.get_id()
        );
        self.controllers.insert(token, controller);
    }

    /// Remove the device with the given path. Returns false if no such device
    /// is attached.
    pub fn remove_device(&mut self, path: &Path) -> bool {
        let Some(token) = lock(self.scanner.shared()).devices.remove(path) else {
            return false;
        };
        let Some(mut controller) = self.controllers.remove(&token) else {
            return false;
        };

        controller.close(self.poller.as_ref());
        self.identities.release(controller.get_id());
        self.daemon.remove_controller(&controller);
        log::info!("Evdev device removed: {controller}");

        // Dropping the controller closes the device
        true
    }

    /// Remove every attached device
    pub fn shutdown(&mut self) {
        let paths: Vec<PathBuf> = self
            .controllers
            .values()
            .map(|controller| controller.path().to_path_buf())
            .collect();
        for path in paths {
            self.remove_device(&path);
        }
    }

    /// Attached controllers in no particular order
    pub fn controllers(&self) -> impl Iterator<Item = &EvdevController> {
        self.controllers.values()
    }

    /// Returns the controller with the given identity
    pub fn get_controller(&self, id: &str) -> Option<&EvdevController> {
        self.controllers.values().find(|c| c.get_id() == id)
    }

    /// Returns the controller attached for the given device path
    pub fn get_controller_by_path(&self, path: &Path) -> Option<&EvdevController> {
        let token = *lock(self.scanner.shared()).devices.get(path)?;
        self.controllers.get(&token)
    }

    pub fn scanner(&self) -> &DeviceScanner {
        &self.scanner
    }
}
