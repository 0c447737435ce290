use std::time::SystemTime;

use super::state::ControllerState;

/// Consumer of controller state changes. The mapper is invoked once per
/// processed batch of events that changed the state of a controller.
pub trait Mapper: Send + Sync {
    fn input(
        &self,
        controller_id: &str,
        timestamp: SystemTime,
        old_state: &ControllerState,
        new_state: &ControllerState,
    );
}
