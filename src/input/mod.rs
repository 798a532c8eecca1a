//! Input handling: raw bridge payloads, selection hints and canonical events

pub mod normalizer;
pub mod payload;
pub mod selection;

pub use normalizer::{EventNormalizer, EventTypeResolver, OsEventTypeResolver};
pub use payload::{PayloadObject, RawBridgeEvent, RawSection, SelfDescribing};
pub use selection::SelectionPayload;

/// The fixed vocabulary of input kinds screens react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    Up,
    Down,
    Click,
    DoubleClick,
    SelectionChange,
}

enum_display!(InputKind, {
    Up => "Up",
    Down => "Down",
    Click => "Click",
    DoubleClick => "DoubleClick",
    SelectionChange => "SelectionChange",
});

/// One canonical event per bridge callback.
///
/// The raw payload is kept only so selection hints can be read from it later.
#[derive(Debug, Clone)]
pub struct CanonicalInputEvent {
    pub kind: InputKind,
    raw: RawBridgeEvent,
}

impl CanonicalInputEvent {
    pub fn new(kind: InputKind, raw: RawBridgeEvent) -> Self {
        Self { kind, raw }
    }

    /// An event with no payload, as produced by timers or tests.
    pub fn bare(kind: InputKind) -> Self {
        Self::new(kind, RawBridgeEvent::default())
    }

    pub fn raw(&self) -> &RawBridgeEvent {
        &self.raw
    }

    pub fn selection(&self) -> SelectionPayload {
        SelectionPayload::read(&self.raw)
    }
}
