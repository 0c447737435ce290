use std::{
    collections::HashMap,
    fmt::{self, Display},
    path::Path,
    sync::Arc,
    time::SystemTime,
};

use mio::Token;

use crate::{config::DeviceConfig, constants::CONTROLLER_TYPE};

use super::{
    calibration::AxisCalibration,
    capability::{Axis, Buttons, ControllerFlags},
    event::{EventKind, RawEvent},
    identity::IdentityAllocator,
    mapper::Mapper,
    poller::Poller,
    source::{DeviceError, InputSource},
    state::ControllerState,
};

/// Common interface of every controller handed to the daemon
pub trait Controller: Display {
    /// Short name of the driver backing this controller
    fn get_type(&self) -> &str;

    /// Identity of the controller, unique among attached controllers
    fn get_id(&self) -> &str;

    /// True if the same device is expected to get the same identity when it
    /// is connected again
    fn get_id_is_persistent(&self) -> bool;

    fn get_flags(&self) -> ControllerFlags;

    /// Replace the consumer of state changes
    fn set_mapper(&mut self, mapper: Option<Arc<dyn Mapper>>);

    fn get_gyro_enabled(&self) -> bool {
        false
    }

    fn set_gyro_enabled(&mut self, _enabled: bool) {}

    fn set_led_level(&mut self, _level: f64) {}

    /// Controllers that cannot be switched off ignore this
    fn turnoff(&mut self) {}

    fn feedback(&mut self, _data: &[u8]) {}

    fn apply_config(&mut self, _config: &DeviceConfig) {}

    fn disconnected(&mut self) {}
}

/// Logical target and calibration of one raw axis code
#[derive(Debug, Clone, Copy)]
struct AxisMapping {
    axis: Axis,
    calibration: AxisCalibration,
}

/// Wrapper around an evdev device that folds its raw events into
/// [ControllerState] snapshots.
pub struct EvdevController {
    source: Box<dyn InputSource>,
    id: String,
    token: Token,
    flags: ControllerFlags,
    state: ControllerState,
    buttons: HashMap<u16, Buttons>,
    axes: HashMap<u16, AxisMapping>,
    mapper: Option<Arc<dyn Mapper>>,
}

impl EvdevController {
    /// Create a new controller for the given source. The identity is taken
    /// from the given allocator and the device is grabbed for exclusive use.
    /// The device is not registered for readiness yet; see [Self::attach].
    pub fn new(
        mut source: Box<dyn InputSource>,
        config: &DeviceConfig,
        identities: &mut IdentityAllocator,
        token: Token,
    ) -> Self {
        // Keep using the device even if another process holds a grab
        if let Err(e) = source.grab() {
            log::warn!("Unable to grab {}: {e}", source.path().display());
        }

        let id = identities.allocate(source.name());

        let axes = config
            .axes()
            .iter()
            .map(|(code, axis)| {
                let calibration =
                    AxisCalibration::new(axis.min, axis.max, axis.center, axis.axis.class());
                log::trace!("Calibration for axis {code} ({}): {calibration:?}", axis.axis);
                (
                    *code,
                    AxisMapping {
                        axis: axis.axis,
                        calibration,
                    },
                )
            })
            .collect();

        Self {
            source,
            id,
            token,
            flags: ControllerFlags::HAS_RSTICK | ControllerFlags::SEPARATE_STICK,
            state: ControllerState::default(),
            buttons: config.buttons().clone(),
            axes,
            mapper: None,
        }
    }

    /// Create a new controller and register it with the given poller. On
    /// failure the identity is released again and the device is closed.
    pub fn attach(
        source: Box<dyn InputSource>,
        config: &DeviceConfig,
        identities: &mut IdentityAllocator,
        token: Token,
        poller: &dyn Poller,
    ) -> Result<Self, std::io::Error> {
        let mut controller = Self::new(source, config, identities, token);
        if let Err(e) = poller.register(controller.source.raw_fd(), token) {
            identities.release(&controller.id);
            if let Err(e) = controller.source.ungrab() {
                log::debug!("{e}");
            }
            return Err(e);
        }
        Ok(controller)
    }

    /// Read all pending events from the device and fold them into a new
    /// state. If the state changed, the mapper is notified with the old and
    /// the new state. A read error means the device is gone; events read
    /// before the error are still applied.
    pub fn input(&mut self) -> Result<(), DeviceError> {
        let mut events = Vec::new();
        let result = self.source.fetch_events(&mut events);
        self.process(&events);
        result
    }

    /// Fold the given batch of events into the controller state, notifying
    /// the mapper if the state changed. Returns true if it changed.
    pub fn process(&mut self, events: &[RawEvent]) -> bool {
        let new_state = self.translate(events);
        if new_state == self.state {
            return false;
        }

        let old_state = std::mem::replace(&mut self.state, new_state);
        if let Some(mapper) = self.mapper.as_ref() {
            mapper.input(&self.id, SystemTime::now(), &old_state, &new_state);
        }
        true
    }

    /// Returns the state that results from applying the given events to the
    /// current state. The current state is left untouched.
    pub fn translate(&self, events: &[RawEvent]) -> ControllerState {
        events
            .iter()
            .fold(self.state, |state, event| self.apply(state, event))
    }

    fn apply(&self, state: ControllerState, event: &RawEvent) -> ControllerState {
        match event.kind {
            EventKind::Key => match self.buttons.get(&event.code) {
                Some(button) => state.with_button(*button, event.value != 0),
                None => state,
            },
            EventKind::Absolute => match self.axes.get(&event.code) {
                Some(mapping) => {
                    let value = mapping.calibration.apply(event.value);
                    state.with_axis(mapping.axis, value)
                }
                None => state,
            },
            EventKind::Other(_) => state,
        }
    }

    /// Stop receiving readiness notifications and release the device grab.
    /// The device itself is closed when the controller is dropped.
    pub fn close(&mut self, poller: &dyn Poller) {
        if let Err(e) = poller.unregister(self.source.raw_fd()) {
            log::warn!("Unable to unregister {}: {e}", self.path().display());
        }
        if let Err(e) = self.source.ungrab() {
            log::debug!("Ignoring failed ungrab of {}: {e}", self.path().display());
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn token(&self) -> Token {
        self.token
    }

    pub fn path(&self) -> &Path {
        self.source.path()
    }

    pub fn name(&self) -> &str {
        self.source.name()
    }
}

impl Controller for EvdevController {
    fn get_type(&self) -> &str {
        CONTROLLER_TYPE
    }

    fn get_id(&self) -> &str {
        &self.id
    }

    fn get_id_is_persistent(&self) -> bool {
        true
    }

    fn get_flags(&self) -> ControllerFlags {
        self.flags
    }

    fn set_mapper(&mut self, mapper: Option<Arc<dyn Mapper>>) {
        self.mapper = mapper;
    }
}

impl Display for EvdevController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Evdev {}>", self.name())
    }
}

impl fmt::Debug for EvdevController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvdevController")
            .field("id", &self.id)
            .field("source", &self.source)
            .field("token", &self.token)
            .field("state", &self.state)
            .finish()
    }
}
