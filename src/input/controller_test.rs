use std::{error::Error, io, sync::Arc};

use mio::Token;

use crate::config::DeviceConfig;
use crate::constants::{STICK_PAD_MAX, STICK_PAD_MIN, TRIGGER_MAX};
use crate::input::{
    capability::{Axis, Buttons, ControllerFlags},
    controller::{Controller, EvdevController},
    event::{EventKind, RawEvent},
    identity::{generate_id, IdentityAllocator},
    source::mock::{MockMapper, MockPoller, MockSource, PollerCall},
    state::ControllerState,
};

const CONFIG: &str = r#"{
    "buttons": { "304": "A", "305": "B", "315": "START" },
    "axes": {
        "0": { "axis": "stick_x" },
        "1": { "axis": "stick_y", "min": 0, "max": 255, "center": 128 },
        "2": { "axis": "ltrig", "min": 0, "max": 1023 }
    }
}"#;

fn new_controller(
    name: &str,
) -> Result<(EvdevController, crate::input::source::mock::MockHandle, MockMapper), Box<dyn Error>>
{
    let config = DeviceConfig::from_json(CONFIG)?;
    let (source, device) = MockSource::new("/dev/input/event7", name);
    let mut identities = IdentityAllocator::new();
    let mut controller =
        EvdevController::new(Box::new(source), &config, &mut identities, Token(0));
    let mapper = MockMapper::default();
    controller.set_mapper(Some(Arc::new(mapper.clone())));
    Ok((controller, device, mapper))
}

#[test]
fn test_controller_surface() -> Result<(), Box<dyn Error>> {
    let (controller, device, _) = new_controller("Gamepad")?;

    assert_eq!(controller.get_type(), "evdev");
    assert_eq!(controller.get_id(), generate_id("Gamepad", 0));
    assert!(controller.get_id_is_persistent());
    assert_eq!(
        controller.get_flags(),
        ControllerFlags::HAS_RSTICK | ControllerFlags::SEPARATE_STICK
    );
    assert!(!controller.get_gyro_enabled());
    assert_eq!(controller.to_string(), "<Evdev Gamepad>");
    assert_eq!(controller.state(), &ControllerState::default());

    // The device is grabbed as soon as it is wrapped
    assert!(device.lock().unwrap().grabbed);

    Ok(())
}

#[test]
fn test_button_press_and_release() -> Result<(), Box<dyn Error>> {
    let (mut controller, device, mapper) = new_controller("Gamepad")?;

    device
        .lock()
        .unwrap()
        .batches
        .push_back(Ok(vec![RawEvent::key(304, 1)]));
    controller.input()?;
    assert_eq!(controller.state().buttons(), Buttons::A);

    device
        .lock()
        .unwrap()
        .batches
        .push_back(Ok(vec![RawEvent::key(304, 0)]));
    controller.input()?;
    assert_eq!(controller.state().buttons(), Buttons::empty());

    let inputs = mapper.inputs.lock().unwrap();
    assert_eq!(inputs.len(), 2);
    let (id, old, new) = &inputs[0];
    assert_eq!(id, controller.get_id());
    assert_eq!(old.buttons(), Buttons::empty());
    assert_eq!(new.buttons(), Buttons::A);
    let (_, old, new) = &inputs[1];
    assert_eq!(old.buttons(), Buttons::A);
    assert_eq!(new.buttons(), Buttons::empty());

    Ok(())
}

#[test]
fn test_key_repeat_counts_as_pressed() -> Result<(), Box<dyn Error>> {
    let (mut controller, _, mapper) = new_controller("Gamepad")?;

    assert!(controller.process(&[RawEvent::key(315, 1)]));
    // Repeat keeps the button held without a state change
    assert!(!controller.process(&[RawEvent::key(315, 2)]));
    assert_eq!(controller.state().buttons(), Buttons::START);
    assert_eq!(mapper.inputs.lock().unwrap().len(), 1);

    Ok(())
}

#[test]
fn test_unmapped_events_are_ignored() -> Result<(), Box<dyn Error>> {
    let (mut controller, _, mapper) = new_controller("Gamepad")?;

    let events = [
        RawEvent::key(999, 1),
        RawEvent::absolute(40, 100),
        RawEvent::new(EventKind::Other(0), 0, 0),
        RawEvent::new(EventKind::Other(4), 4, 589825),
    ];
    assert!(!controller.process(&events));
    assert_eq!(controller.state(), &ControllerState::default());

    // Empty batches never reach the mapper
    assert!(!controller.process(&[]));
    controller.input()?;
    assert!(mapper.inputs.lock().unwrap().is_empty());

    Ok(())
}

#[test]
fn test_axis_events() -> Result<(), Box<dyn Error>> {
    let (mut controller, _, mapper) = new_controller("Gamepad")?;

    // Default range -127..128 around 0
    controller.process(&[RawEvent::absolute(0, 128)]);
    assert_eq!(controller.state().axis(Axis::StickX), STICK_PAD_MAX);
    controller.process(&[RawEvent::absolute(0, -127)]);
    assert_eq!(controller.state().axis(Axis::StickX), STICK_PAD_MIN);
    controller.process(&[RawEvent::absolute(0, 0)]);
    assert_eq!(controller.state().axis(Axis::StickX), 0);

    // Configured range 0..255 with the stick resting at 128
    controller.process(&[RawEvent::absolute(1, 128)]);
    assert_eq!(controller.state().axis(Axis::StickY), 0);
    controller.process(&[RawEvent::absolute(1, 255)]);
    assert_eq!(controller.state().axis(Axis::StickY), STICK_PAD_MAX);

    // Trigger range 0..1023
    controller.process(&[RawEvent::absolute(2, 1023)]);
    assert_eq!(controller.state().axis(Axis::LTrig), TRIGGER_MAX);
    controller.process(&[RawEvent::absolute(2, 0)]);
    assert_eq!(controller.state().axis(Axis::LTrig), 0);

    // Out of range values are clamped
    controller.process(&[RawEvent::absolute(2, 5000)]);
    assert_eq!(controller.state().axis(Axis::LTrig), TRIGGER_MAX);

    assert!(!mapper.inputs.lock().unwrap().is_empty());

    Ok(())
}

#[test]
fn test_batch_is_folded_into_one_change() -> Result<(), Box<dyn Error>> {
    let (mut controller, _, mapper) = new_controller("Gamepad")?;

    let events = [
        RawEvent::key(304, 1),
        RawEvent::key(305, 1),
        RawEvent::absolute(0, 128),
        RawEvent::key(305, 0),
    ];
    assert!(controller.process(&events));

    let inputs = mapper.inputs.lock().unwrap();
    assert_eq!(inputs.len(), 1);
    let (_, old, new) = &inputs[0];
    assert_eq!(old, &ControllerState::default());
    assert_eq!(new.buttons(), Buttons::A);
    assert_eq!(new.axis(Axis::StickX), STICK_PAD_MAX);

    Ok(())
}

#[test]
fn test_translate_leaves_state_untouched() -> Result<(), Box<dyn Error>> {
    let (controller, _, mapper) = new_controller("Gamepad")?;

    let state = controller.translate(&[RawEvent::key(304, 1)]);
    assert_eq!(state.buttons(), Buttons::A);
    assert_eq!(controller.state(), &ControllerState::default());
    assert!(mapper.inputs.lock().unwrap().is_empty());

    Ok(())
}

#[test]
fn test_without_mapper() -> Result<(), Box<dyn Error>> {
    let (mut controller, _, mapper) = new_controller("Gamepad")?;
    controller.set_mapper(None);

    assert!(controller.process(&[RawEvent::key(304, 1)]));
    assert_eq!(controller.state().buttons(), Buttons::A);
    assert!(mapper.inputs.lock().unwrap().is_empty());

    Ok(())
}

#[test]
fn test_grab_failure_is_not_fatal() -> Result<(), Box<dyn Error>> {
    let config = DeviceConfig::from_json(CONFIG)?;
    let (source, device) = MockSource::new("/dev/input/event3", "Gamepad");
    device.lock().unwrap().grab_fails = true;

    let mut identities = IdentityAllocator::new();
    let mut controller =
        EvdevController::new(Box::new(source), &config, &mut identities, Token(3));
    assert!(!device.lock().unwrap().grabbed);
    assert!(identities.is_used(controller.get_id()));

    assert!(controller.process(&[RawEvent::key(304, 1)]));

    Ok(())
}

#[test]
fn test_read_error() -> Result<(), Box<dyn Error>> {
    let (mut controller, device, mapper) = new_controller("Gamepad")?;

    device
        .lock()
        .unwrap()
        .batches
        .push_back(Err(io::ErrorKind::NotConnected));
    assert!(controller.input().is_err());
    assert_eq!(controller.state(), &ControllerState::default());
    assert!(mapper.inputs.lock().unwrap().is_empty());

    Ok(())
}

#[test]
fn test_attach_and_close() -> Result<(), Box<dyn Error>> {
    let config = DeviceConfig::from_json(CONFIG)?;
    let (source, device) = MockSource::new("/dev/input/event9", "Gamepad");
    let poller = MockPoller::default();
    let mut identities = IdentityAllocator::new();

    let mut controller = EvdevController::attach(
        Box::new(source),
        &config,
        &mut identities,
        Token(9),
        &poller,
    )?;
    assert_eq!(controller.token(), Token(9));
    assert_eq!(poller.registered().len(), 1);

    controller.close(&poller);
    assert!(poller.registered().is_empty());
    assert!(matches!(
        poller.calls.lock().unwrap().last(),
        Some(PollerCall::Unregister(_))
    ));
    assert!(!device.lock().unwrap().grabbed);
    assert_eq!(device.lock().unwrap().open, 1);

    drop(controller);
    assert_eq!(device.lock().unwrap().open, 0);

    Ok(())
}

#[test]
fn test_events_before_read_error_are_applied() -> Result<(), Box<dyn Error>> {
    let (mut controller, device, mapper) = new_controller("Gamepad")?;

    {
        let mut device = device.lock().unwrap();
        device
            .batches
            .push_back(Ok(vec![RawEvent::key(304, 1), RawEvent::absolute(0, 128)]));
        device.batches.push_back(Err(io::ErrorKind::NotConnected));
    }
    assert!(controller.input().is_err());

    assert_eq!(controller.state().buttons(), Buttons::A);
    assert_eq!(controller.state().axis(Axis::StickX), STICK_PAD_MAX);
    let inputs = mapper.inputs.lock().unwrap();
    assert_eq!(inputs.len(), 1);
    assert_eq!(inputs[0].2.buttons(), Buttons::A);

    Ok(())
}
