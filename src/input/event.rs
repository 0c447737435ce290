use evdev::{EventType, InputEvent};

/// Kind of a raw input event. Only key and absolute axis events carry
/// controller input; everything else is passed along as [EventKind::Other].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Key,
    Absolute,
    Other(u16),
}

/// A single (type, code, value) sample read from an input device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    pub kind: EventKind,
    pub code: u16,
    pub value: i32,
}

impl RawEvent {
    pub fn new(kind: EventKind, code: u16, value: i32) -> Self {
        Self { kind, code, value }
    }

    /// Key press (value 1), release (value 0) or repeat (value 2) event
    pub fn key(code: u16, value: i32) -> Self {
        Self::new(EventKind::Key, code, value)
    }

    /// Absolute axis event
    pub fn absolute(code: u16, value: i32) -> Self {
        Self::new(EventKind::Absolute, code, value)
    }
}

impl From<InputEvent> for RawEvent {
    fn from(event: InputEvent) -> Self {
        let kind = match event.event_type() {
            EventType::KEY => EventKind::Key,
            EventType::ABSOLUTE => EventKind::Absolute,
            other => EventKind::Other(other.0),
        };
        Self::new(kind, event.code(), event.value())
    }
}
