//! Raw bridge payloads and their canonical key/value form
//!
//! Host firmware delivers each sub-object of an event (`listEvent`, `textEvent`,
//! `sysEvent`, `jsonData`) in one of three shapes:
//! - a plain JSON mapping
//! - a JSON string that encodes a mapping
//! - a native object exposing a zero-argument serializer
//!
//! Every lookup in this crate goes through [`PayloadObject`], which folds all three
//! shapes into one map before any field is read.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

/// Keys under which hosts report the event type of a sub-object.
pub const EVENT_TYPE_KEYS: [&str; 3] = ["eventType", "event_type", "Event_Type"];

/// A host object that can describe itself through a serialization method.
pub trait SelfDescribing: Send + Sync + fmt::Debug {
    /// Fields readable directly on the object.
    fn fields(&self) -> Map<String, Value> {
        Map::new()
    }

    /// Output of the object's serializer. Errors and non-object output are ignored.
    fn to_json(&self) -> std::result::Result<Value, String>;
}

/// One sub-object of a raw bridge event, in whatever shape the host sent it.
#[derive(Debug, Clone)]
pub enum RawSection {
    Value(Value),
    Describing(Arc<dyn SelfDescribing>),
}

impl RawSection {
    pub fn describing(object: impl SelfDescribing + 'static) -> Self {
        RawSection::Describing(Arc::new(object))
    }
}

impl From<Value> for RawSection {
    fn from(value: Value) -> Self {
        RawSection::Value(value)
    }
}

/// The raw payload delivered by one bridge callback.
#[derive(Debug, Clone, Default)]
pub struct RawBridgeEvent {
    pub list_event: Option<RawSection>,
    pub text_event: Option<RawSection>,
    pub sys_event: Option<RawSection>,
    pub json_data: Option<RawSection>,
}

impl RawBridgeEvent {
    /// Build a raw event from a JSON value (object or string-encoded object).
    ///
    /// Both camelCase and snake_case top-level keys are accepted. Anything that is
    /// not a mapping yields an event with no sub-objects.
    pub fn from_json(value: Value) -> Self {
        let Some(map) = as_mapping(value) else {
            return Self::default();
        };

        let section = |keys: [&str; 2]| {
            keys.iter()
                .find_map(|key| map.get(*key))
                .filter(|value| !value.is_null())
                .cloned()
                .map(RawSection::Value)
        };

        Self {
            list_event: section(["listEvent", "list_event"]),
            text_event: section(["textEvent", "text_event"]),
            sys_event: section(["sysEvent", "sys_event"]),
            json_data: section(["jsonData", "json_data"]),
        }
    }

    /// Parse one line of NDJSON input. Invalid JSON is treated as a plain string.
    pub fn from_line(line: &str) -> Self {
        let value = serde_json::from_str(line).unwrap_or(Value::String(line.to_string()));
        Self::from_json(value)
    }

    pub fn list(mut self, section: impl Into<RawSection>) -> Self {
        self.list_event = Some(section.into());
        self
    }

    pub fn text(mut self, section: impl Into<RawSection>) -> Self {
        self.text_event = Some(section.into());
        self
    }

    pub fn sys(mut self, section: impl Into<RawSection>) -> Self {
        self.sys_event = Some(section.into());
        self
    }

    pub fn json(mut self, section: impl Into<RawSection>) -> Self {
        self.json_data = Some(section.into());
        self
    }

    /// Sub-objects in type-hint priority order.
    pub fn sections(&self) -> [(&'static str, Option<&RawSection>); 4] {
        [
            ("listEvent", self.list_event.as_ref()),
            ("textEvent", self.text_event.as_ref()),
            ("sysEvent", self.sys_event.as_ref()),
            ("jsonData", self.json_data.as_ref()),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.sections().iter().all(|(_, section)| section.is_none())
    }

    /// Canonical map of the list sub-object, if present and readable.
    pub fn list_object(&self) -> Option<PayloadObject> {
        self.list_event.as_ref().and_then(PayloadObject::from_section)
    }

    /// Canonical map of the json sub-object, if present and readable.
    pub fn json_object(&self) -> Option<PayloadObject> {
        self.json_data.as_ref().and_then(PayloadObject::from_section)
    }
}

/// Canonical key/value view of one raw sub-object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PayloadObject(Map<String, Value>);

impl PayloadObject {
    /// Fold any section shape into a map.
    ///
    /// Serialized fields take precedence over raw fields on self-describing objects.
    pub fn from_section(section: &RawSection) -> Option<Self> {
        match section {
            RawSection::Value(value) => as_mapping(value.clone()).map(PayloadObject),
            RawSection::Describing(object) => {
                let mut merged = object.fields();
                if let Ok(Value::Object(serialized)) = object.to_json() {
                    merged.extend(serialized);
                }
                Some(PayloadObject(merged))
            }
        }
    }

    /// First non-null value stored under any of `keys`.
    pub fn first_of(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .find_map(|key| self.0.get(*key).filter(|value| !value.is_null()))
    }

    /// Event type hint stored in this object.
    pub fn type_hint(&self) -> Option<&Value> {
        self.first_of(&EVENT_TYPE_KEYS)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl From<Map<String, Value>> for PayloadObject {
    fn from(map: Map<String, Value>) -> Self {
        PayloadObject(map)
    }
}

/// Parse numeric strings into numbers; every other value passes through.
pub fn normalize_hint(value: &Value) -> Value {
    if let Value::String(text) = value
        && let Some(number) = parse_finite(text)
        && let Some(number) = serde_json::Number::from_f64(number)
    {
        return Value::Number(number);
    }
    value.clone()
}

/// Read an integer from a number or numeric string, rejecting non-finite values.
pub fn read_integer(value: &Value) -> Option<i64> {
    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => parse_finite(text)?,
        _ => return None,
    };
    if !number.is_finite() {
        return None;
    }
    Some(number.trunc() as i64)
}

fn parse_finite(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|number| number.is_finite())
}

fn as_mapping(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        },
        _ => None,
    }
}
