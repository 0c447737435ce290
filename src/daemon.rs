use std::{
    io,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, SystemTime},
};

use mio::{Events, Poll};

use crate::input::{
    capability::Axis,
    controller::Controller,
    manager::{Daemon, Manager, ManagerOptions},
    mapper::Mapper,
    source::evdev::EvdevEnumerator,
    state::ControllerState,
};

/// Longest time the main loop waits for device readiness before it checks
/// for newly discovered devices and shutdown requests.
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Daemon that keeps track of attached controllers and logs every change
#[derive(Debug, Default)]
pub struct LogDaemon {
    controllers: Vec<String>,
}

impl LogDaemon {
    /// Identities of the attached controllers, in attach order
    pub fn controllers(&self) -> &[String] {
        &self.controllers
    }
}

impl Daemon for LogDaemon {
    fn add_controller(&mut self, controller: &dyn Controller) {
        log::info!(
            "Controller connected: {controller} ({} {})",
            controller.get_type(),
            controller.get_id()
        );
        self.controllers.push(controller.get_id().to_string());
    }

    fn remove_controller(&mut self, controller: &dyn Controller) {
        log::info!("Controller disconnected: {controller} ({})", controller.get_id());
        self.controllers.retain(|id| id != controller.get_id());
    }
}

/// Mapper that logs every state change at debug level
#[derive(Debug, Default)]
pub struct LogMapper;

impl Mapper for LogMapper {
    fn input(
        &self,
        controller_id: &str,
        _timestamp: SystemTime,
        old_state: &ControllerState,
        new_state: &ControllerState,
    ) {
        let pressed = new_state.buttons() & !old_state.buttons();
        let released = old_state.buttons() & !new_state.buttons();
        if !pressed.is_empty() {
            log::debug!("{controller_id}: pressed {pressed:?}");
        }
        if !released.is_empty() {
            log::debug!("{controller_id}: released {released:?}");
        }

        for axis in Axis::ALL {
            let value = new_state.axis(axis);
            if value != old_state.axis(axis) {
                log::trace!("{controller_id}: {axis} = {value}");
            }
        }
    }
}

/// Run the driver until `running` is cleared. Device readiness is delivered
/// through a mio poll, and discovered devices are attached between polls.
pub fn run(options: ManagerOptions, running: Arc<AtomicBool>) -> io::Result<()> {
    let mut poll = Poll::new()?;
    let registry = poll.registry().try_clone()?;
    let mut events = Events::with_capacity(64);

    let mapper: Arc<dyn Mapper> = Arc::new(LogMapper);
    let mut manager = Manager::new(
        Box::new(registry),
        Box::new(LogDaemon::default()),
        Some(mapper),
        Arc::new(EvdevEnumerator),
        options,
    );
    manager.start();

    log::info!("Waiting for input devices");
    while running.load(Ordering::SeqCst) {
        if let Err(e) = poll.poll(&mut events, Some(POLL_TIMEOUT)) {
            if e.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            manager.shutdown();
            return Err(e);
        }

        for event in events.iter() {
            manager.on_readable(event.token());
        }
        manager.mainloop();
    }

    log::info!("Stopping driver");
    manager.shutdown();
    Ok(())
}
