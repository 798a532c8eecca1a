//! Shopping list persistence in bridge storage

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{StoredEntries, dedupe_id, read_envelope, trimmed_str, write_envelope};
use crate::bridge::HostBridge;
use crate::error::{GlassError, Result};
use crate::utils::text::{fnv1a_hex, slugify};

pub const SHOPPING_STORAGE_KEY: &str = "shopping_config_v1";
pub const SHOPPING_STORAGE_VERSION: u64 = 1;
const SAVE_FAILED: &str = "Shopping-Konfiguration konnte nicht gespeichert werden.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub id: String,
    pub title: String,
    pub done: bool,
    pub position: u64,
}

impl ShoppingItem {
    pub fn new(id: &str, title: &str, done: bool, position: u64) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            done,
            position,
        }
    }
}

pub struct ShoppingConfigService {
    storage: Arc<dyn HostBridge>,
    defaults: Vec<ShoppingItem>,
}

impl ShoppingConfigService {
    /// The shipped default list is empty.
    pub fn new(storage: Arc<dyn HostBridge>) -> Self {
        Self::with_defaults(storage, Vec::new())
    }

    pub fn with_defaults(storage: Arc<dyn HostBridge>, defaults: Vec<ShoppingItem>) -> Self {
        Self { storage, defaults }
    }

    /// Load the stored list, reseeding or repairing the stored copy when needed.
    pub async fn load_items(&self) -> Result<Vec<ShoppingItem>> {
        let stored = self.storage.get_storage(SHOPPING_STORAGE_KEY).await?;

        let entries = match read_envelope(&stored, "items", SHOPPING_STORAGE_VERSION) {
            StoredEntries::Entries(entries) => entries,
            state => {
                tracing::info!(?state, "seeding default shopping list");
                let seeded = self.defaults.clone();
                self.persist(&seeded).await?;
                return Ok(seeded);
            }
        };

        let (items, changed) = normalize_items(&entries);
        if changed {
            tracing::debug!(count = items.len(), "repairing stored shopping list");
            self.persist(&items).await?;
        }
        Ok(items)
    }

    pub async fn save_items(&self, items: &[ShoppingItem]) -> Result<()> {
        let values = items
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let (normalized, _) = normalize_items(&values);
        self.persist(&normalized).await
    }

    async fn persist(&self, items: &[ShoppingItem]) -> Result<()> {
        let payload = write_envelope("items", SHOPPING_STORAGE_VERSION, items)?;
        let written = self
            .storage
            .set_storage(SHOPPING_STORAGE_KEY, &payload)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "shopping storage write failed");
                false
            });
        if !written {
            return Err(GlassError::StorageWrite(SAVE_FAILED.to_string()));
        }
        Ok(())
    }
}

/// Clean stored entries. The flag reports whether anything had to be repaired.
pub fn normalize_items(entries: &[Value]) -> (Vec<ShoppingItem>, bool) {
    let mut items = Vec::with_capacity(entries.len());
    let mut used = HashSet::new();
    let mut changed = false;

    for (index, candidate) in entries.iter().enumerate() {
        let Value::Object(entry) = candidate else {
            changed = true;
            continue;
        };

        let title = trimmed_str(entry, "title");
        if title.is_empty() {
            changed = true;
            continue;
        }

        let done = match entry.get("done") {
            Some(Value::Bool(done)) => *done,
            Some(Value::Number(number)) => {
                changed = true;
                number.as_f64() != Some(0.0)
            }
            _ => {
                changed = true;
                false
            }
        };

        let raw_position = entry.get("position");
        let position = read_position(raw_position, index);
        if raw_position.and_then(Value::as_f64) != Some(position as f64) {
            changed = true;
        }

        let raw_id = trimmed_str(entry, "id");
        if raw_id.is_empty() {
            changed = true;
        }
        let base_id = if raw_id.is_empty() {
            create_item_id(title, index)
        } else {
            raw_id.to_string()
        };
        let id = dedupe_id(&base_id, &mut used);
        if id != raw_id {
            changed = true;
        }

        items.push(ShoppingItem {
            id,
            title: title.to_string(),
            done,
            position,
        });
    }

    (items, changed)
}

fn read_position(value: Option<&Value>, fallback: usize) -> u64 {
    match value.and_then(Value::as_f64) {
        Some(position) if position.is_finite() && position >= 0.0 => position.floor() as u64,
        _ => fallback as u64,
    }
}

fn create_item_id(title: &str, index: usize) -> String {
    let slug = slugify(title, "item");
    let hash = fnv1a_hex(&format!("{title}:{index}"));
    format!("{slug}-{hash}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_keeps_clean_entries() {
        let entries = vec![
            json!({"id": "milk", "title": "Milch", "done": false, "position": 0}),
            json!({"id": "soap", "title": "Seife", "done": true, "position": 1}),
        ];
        let (items, changed) = normalize_items(&entries);
        assert!(!changed);
        assert_eq!(items[1], ShoppingItem::new("soap", "Seife", true, 1));
    }

    #[test]
    fn test_normalize_repairs_entries() {
        let entries = vec![
            json!("garbage"),
            json!({"title": "  Brot  ", "done": 1}),
            json!({"id": "x", "title": ""}),
            json!({"id": "dup", "title": "A", "done": false, "position": 2.7}),
            json!({"id": "dup", "title": "B", "done": false, "position": -1}),
        ];
        let (items, changed) = normalize_items(&entries);
        assert!(changed);
        assert_eq!(items.len(), 3);

        assert_eq!(items[0].title, "Brot");
        assert!(items[0].done);
        assert_eq!(items[0].position, 1);
        assert!(items[0].id.starts_with("brot-"));
        assert_eq!(items[0].id.len(), "brot-".len() + 8);

        assert_eq!(items[1].id, "dup");
        assert_eq!(items[1].position, 2);
        assert_eq!(items[2].id, "dup-2");
        assert_eq!(items[2].position, 4);
    }

    #[test]
    fn test_generated_ids_are_stable() {
        assert_eq!(create_item_id("Milch", 0), create_item_id("Milch", 0));
        assert_ne!(create_item_id("Milch", 0), create_item_id("Milch", 1));
        assert!(create_item_id("!!!", 0).starts_with("item-"));
    }
}
