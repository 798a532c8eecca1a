//! Data behind the screens: dashboard entries, RSS items and the shopping list
//!
//! Persistent configuration lives in bridge storage as versioned JSON envelopes
//! (`{"version": 1, "<field>": [...]}`). Anything unreadable is reseeded with
//! defaults; a refused write is an error for the operation that caused it.

pub mod data;
pub mod feed;
pub mod rss_config;
pub mod shopping_config;

use std::collections::HashSet;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;

pub use data::{
    AppDataService, DashboardData, DashboardItem, DataService, DetailData, Direction, ListData,
    RSS_LIST_ID, SHOPPING_DIVIDER_ID, SHOPPING_LIST_ID,
};
pub use feed::{FeedSource, HttpFeedSource};
pub use rss_config::{FeedConfig, RssConfigService, RssFeed};
pub use shopping_config::{ShoppingConfigService, ShoppingItem};

/// Decoded content of a storage envelope.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StoredEntries {
    /// Nothing stored yet, or blank.
    Empty,
    /// Not JSON, wrong version, or the entry field is not an array.
    Invalid,
    Entries(Vec<Value>),
}

pub(crate) fn read_envelope(stored: &str, field: &str, version: u64) -> StoredEntries {
    if stored.trim().is_empty() {
        return StoredEntries::Empty;
    }

    let Ok(parsed) = serde_json::from_str::<Value>(stored) else {
        return StoredEntries::Invalid;
    };

    if parsed.get("version").and_then(Value::as_u64) != Some(version) {
        return StoredEntries::Invalid;
    }

    match parsed.get(field) {
        Some(Value::Array(entries)) => StoredEntries::Entries(entries.clone()),
        _ => StoredEntries::Invalid,
    }
}

pub(crate) fn write_envelope<T: Serialize>(field: &str, version: u64, entries: &[T]) -> Result<String> {
    let mut envelope = Map::new();
    envelope.insert("version".to_string(), Value::from(version));
    envelope.insert(field.to_string(), serde_json::to_value(entries)?);
    Ok(serde_json::to_string(&Value::Object(envelope))?)
}

/// First of `base`, `base-2`, `base-3`, ... not yet in `used`.
pub(crate) fn dedupe_id(base: &str, used: &mut HashSet<String>) -> String {
    let mut candidate = base.to_string();
    let mut suffix = 2;
    while used.contains(&candidate) {
        candidate = format!("{base}-{suffix}");
        suffix += 1;
    }
    used.insert(candidate.clone());
    candidate
}

/// Trimmed string field of a JSON object, empty when absent or not a string.
pub(crate) fn trimmed_str<'a>(entry: &'a Map<String, Value>, key: &str) -> &'a str {
    entry.get(key).and_then(Value::as_str).map(str::trim).unwrap_or("")
}
