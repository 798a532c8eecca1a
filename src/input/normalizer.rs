//! Raw bridge payload -> canonical input event

use serde_json::Value;

use super::payload::{PayloadObject, RawBridgeEvent, normalize_hint};
use super::selection::SelectionPayload;
use super::{CanonicalInputEvent, InputKind};

/// Host event codes as reported by the glasses OS.
pub mod os_event {
    pub const CLICK: i64 = 0;
    pub const SCROLL_TOP: i64 = 1;
    pub const SCROLL_BOTTOM: i64 = 2;
    pub const DOUBLE_CLICK: i64 = 3;
    pub const FOREGROUND_ENTER: i64 = 4;
    pub const FOREGROUND_EXIT: i64 = 5;
    pub const ABNORMAL_EXIT: i64 = 6;

    pub(super) const NAMES: [(&str, i64); 7] = [
        ("CLICK_EVENT", CLICK),
        ("SCROLL_TOP_EVENT", SCROLL_TOP),
        ("SCROLL_BOTTOM_EVENT", SCROLL_BOTTOM),
        ("DOUBLE_CLICK_EVENT", DOUBLE_CLICK),
        ("FOREGROUND_ENTER_EVENT", FOREGROUND_ENTER),
        ("FOREGROUND_EXIT_EVENT", FOREGROUND_EXIT),
        ("ABNORMAL_EXIT_EVENT", ABNORMAL_EXIT),
    ];
}

/// Resolves a normalized type hint to a host event code.
pub trait EventTypeResolver: Send + Sync {
    fn resolve(&self, hint: &Value) -> Option<i64>;
}

/// Resolver for the host OS event enum.
///
/// Accepts enum codes as numbers and enum names as strings (case-insensitive).
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEventTypeResolver;

impl EventTypeResolver for OsEventTypeResolver {
    fn resolve(&self, hint: &Value) -> Option<i64> {
        match hint {
            Value::Number(number) => {
                let code = number.as_f64()?;
                if code.fract() != 0.0 {
                    return None;
                }
                let code = code as i64;
                os_event::NAMES
                    .iter()
                    .any(|(_, known)| *known == code)
                    .then_some(code)
            }
            Value::String(name) => os_event::NAMES
                .iter()
                .find(|(known, _)| unicase::eq(*known, name.trim()))
                .map(|(_, code)| *code),
            _ => None,
        }
    }
}

/// Outcome of trying the type hints of one raw event.
enum HintOutcome {
    Absent,
    Unmapped,
    Mapped(InputKind),
}

/// Converts raw bridge payloads into canonical input events.
pub struct EventNormalizer {
    resolver: Box<dyn EventTypeResolver>,
}

impl Default for EventNormalizer {
    fn default() -> Self {
        Self::new(Box::new(OsEventTypeResolver))
    }
}

impl EventNormalizer {
    pub fn new(resolver: Box<dyn EventTypeResolver>) -> Self {
        Self { resolver }
    }

    /// Map one raw event to a canonical event. `None` means the event is dropped.
    pub fn normalize(&self, raw: RawBridgeEvent) -> Option<CanonicalInputEvent> {
        let kind = match self.resolve_hints(&raw) {
            HintOutcome::Mapped(kind) => Some(kind),
            HintOutcome::Absent if raw.list_event.is_some() || raw.text_event.is_some() => {
                Some(InputKind::Click)
            }
            HintOutcome::Absent | HintOutcome::Unmapped => SelectionPayload::read(&raw)
                .has_selection()
                .then_some(InputKind::SelectionChange),
        }?;

        Some(CanonicalInputEvent::new(kind, raw))
    }

    fn resolve_hints(&self, raw: &RawBridgeEvent) -> HintOutcome {
        let mut outcome = HintOutcome::Absent;
        for (_, section) in raw.sections() {
            let Some(object) = section.and_then(PayloadObject::from_section) else {
                continue;
            };
            let Some(hint) = object.type_hint() else {
                continue;
            };

            outcome = HintOutcome::Unmapped;
            let code = self.resolver.resolve(&normalize_hint(hint));
            if let Some(kind) = code.and_then(kind_for_code) {
                return HintOutcome::Mapped(kind);
            }
        }
        outcome
    }
}

fn kind_for_code(code: i64) -> Option<InputKind> {
    match code {
        os_event::CLICK => Some(InputKind::Click),
        os_event::SCROLL_TOP => Some(InputKind::Up),
        os_event::SCROLL_BOTTOM => Some(InputKind::Down),
        os_event::DOUBLE_CLICK => Some(InputKind::DoubleClick),
        _ => None,
    }
}
