//! Explicit selection hints carried inside raw bridge payloads

use serde_json::Value;

use super::payload::{PayloadObject, RawBridgeEvent, read_integer};

const INDEX_KEYS: [&str; 4] = [
    "currentSelectItemIndex",
    "current_select_item_index",
    "CurrentSelect_ItemIndex",
    "currentSelect_ItemIndex",
];

const NAME_KEYS: [&str; 4] = [
    "currentSelectItemName",
    "current_select_item_name",
    "CurrentSelect_ItemName",
    "currentSelect_ItemName",
];

/// Index, name and type hint read from one raw event. Each part is independent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionPayload {
    pub index: Option<i64>,
    pub name: Option<String>,
    pub type_hint: Option<Value>,
}

impl SelectionPayload {
    /// Read the selection hints of a raw event.
    ///
    /// `listEvent` is searched before `jsonData` for the index and the name. The type
    /// hint follows the normalizer order `listEvent, textEvent, sysEvent, jsonData`.
    pub fn read(raw: &RawBridgeEvent) -> Self {
        let sources: Vec<PayloadObject> = [raw.list_object(), raw.json_object()]
            .into_iter()
            .flatten()
            .collect();

        let index = sources.iter().find_map(read_index);
        let name = sources.iter().find_map(read_name);

        Self {
            index,
            name,
            type_hint: read_type_hint(raw),
        }
    }

    /// True when the host named or indexed a row explicitly.
    pub fn has_selection(&self) -> bool {
        self.index.is_some() || self.name.is_some()
    }
}

/// First type hint present across the sub-objects, before any resolution.
pub fn read_type_hint(raw: &RawBridgeEvent) -> Option<Value> {
    raw.sections().into_iter().find_map(|(_, section)| {
        let object = PayloadObject::from_section(section?)?;
        object.type_hint().cloned()
    })
}

fn read_index(object: &PayloadObject) -> Option<i64> {
    INDEX_KEYS
        .iter()
        .find_map(|key| object.get(key).and_then(read_integer))
}

fn read_name(object: &PayloadObject) -> Option<String> {
    NAME_KEYS.iter().find_map(|key| match object.get(key) {
        Some(Value::String(name)) if !name.trim().is_empty() => Some(name.clone()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::payload::RawSection;
    use crate::input::payload::tests::FakeHostObject;
    use serde_json::json;

    #[test]
    fn test_reads_index_from_list_event() {
        let raw = RawBridgeEvent::default().list(json!({"currentSelectItemIndex": 2}));
        let payload = SelectionPayload::read(&raw);
        assert_eq!(payload.index, Some(2));
        assert!(payload.name.is_none());
        assert!(payload.has_selection());
    }

    #[test]
    fn test_reads_proto_style_keys_from_string_payload() {
        let raw = RawBridgeEvent::default()
            .json(json!("{\"CurrentSelect_ItemIndex\":\"2\",\"Event_Type\":4}"));
        let payload = SelectionPayload::read(&raw);
        assert_eq!(payload.index, Some(2));
        assert_eq!(payload.type_hint, Some(json!(4)));
    }

    #[test]
    fn test_list_event_wins_over_json_data() {
        let raw = RawBridgeEvent::default()
            .list(json!({"current_select_item_name": "item1"}))
            .json(json!({"currentSelectItemName": "item2", "currentSelectItemIndex": 1}));
        let payload = SelectionPayload::read(&raw);
        assert_eq!(payload.name.as_deref(), Some("item1"));
        assert_eq!(payload.index, Some(1));
    }

    #[test]
    fn test_invalid_index_falls_through_to_json_data() {
        let raw = RawBridgeEvent::default()
            .list(json!({"currentSelectItemIndex": "abc"}))
            .json(json!({"currentSelect_ItemIndex": 3}));
        assert_eq!(SelectionPayload::read(&raw).index, Some(3));
    }

    #[test]
    fn test_blank_name_is_ignored() {
        let raw = RawBridgeEvent::default().list(json!({"currentSelectItemName": "   "}));
        let payload = SelectionPayload::read(&raw);
        assert!(payload.name.is_none());
        assert!(!payload.has_selection());
    }

    #[test]
    fn test_self_describing_payload_is_expanded() {
        let object = FakeHostObject::serializing(json!({
            "currentSelectItemName": "Shopping List",
            "eventType": 0,
        }));
        let raw = RawBridgeEvent::default().list(RawSection::describing(object));
        let payload = SelectionPayload::read(&raw);
        assert_eq!(payload.name.as_deref(), Some("Shopping List"));
        assert_eq!(payload.type_hint, Some(json!(0)));
    }

    #[test]
    fn test_type_hint_order_prefers_list_event() {
        let raw = RawBridgeEvent::default()
            .sys(json!({"eventType": 2}))
            .text(json!({"eventType": 1}));
        assert_eq!(read_type_hint(&raw), Some(json!(1)));
    }

    #[test]
    fn test_text_and_sys_events_carry_no_selection() {
        let raw = RawBridgeEvent::default()
            .text(json!({"currentSelectItemIndex": 1}))
            .sys(json!({"currentSelectItemName": "x"}));
        assert!(!SelectionPayload::read(&raw).has_selection());
    }
}
