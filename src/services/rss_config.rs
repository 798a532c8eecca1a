//! Configured RSS feeds, persisted in bridge storage

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::{StoredEntries, dedupe_id, read_envelope, trimmed_str, write_envelope};
use crate::bridge::HostBridge;
use crate::error::{GlassError, Result};
use crate::utils::text::{fnv1a_hex, slugify};

pub const RSS_STORAGE_KEY: &str = "rss_config_v1";
pub const RSS_STORAGE_VERSION: u64 = 1;
pub const RSS_MAX_ENTRIES: usize = 50;
const SAVE_FAILED: &str = "RSS-Konfiguration konnte nicht gespeichert werden.";

/// A feed as stored and edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RssFeed {
    pub id: String,
    pub title: String,
    pub url: String,
}

/// A feed ready to be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    pub id: String,
    pub title: String,
    pub url: String,
    pub max_entries: usize,
}

pub fn default_feeds() -> Vec<RssFeed> {
    vec![RssFeed {
        id: "tagesschau".to_string(),
        title: "Tagesschau".to_string(),
        url: "https://www.tagesschau.de/infoservices/alle-meldungen-100~rss2.xml".to_string(),
    }]
}

pub struct RssConfigService {
    storage: Arc<dyn HostBridge>,
}

impl RssConfigService {
    pub fn new(storage: Arc<dyn HostBridge>) -> Self {
        Self { storage }
    }

    /// Load the stored feeds. An empty result is never returned: defaults are seeded.
    pub async fn load_feeds(&self) -> Result<Vec<RssFeed>> {
        let stored = self.storage.get_storage(RSS_STORAGE_KEY).await?;

        let entries = match read_envelope(&stored, "feeds", RSS_STORAGE_VERSION) {
            StoredEntries::Entries(entries) => entries,
            state => {
                tracing::info!(?state, "seeding default RSS feeds");
                return self.seed().await;
            }
        };

        let (feeds, changed) = normalize_feeds(&entries);
        if feeds.is_empty() {
            return self.seed().await;
        }
        if changed {
            self.persist(&feeds).await?;
        }
        Ok(feeds)
    }

    pub async fn save_feeds(&self, feeds: &[RssFeed]) -> Result<()> {
        let values = feeds
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let (normalized, _) = normalize_feeds(&values);
        if normalized.is_empty() {
            return self.persist(&default_feeds()).await;
        }
        self.persist(&normalized).await
    }

    /// Stored feeds with the per-feed entry limit applied.
    pub async fn load_runtime_feeds(&self) -> Result<Vec<FeedConfig>> {
        let feeds = self.load_feeds().await?;
        Ok(feeds
            .into_iter()
            .map(|feed| FeedConfig {
                id: feed.id,
                title: feed.title,
                url: feed.url,
                max_entries: RSS_MAX_ENTRIES,
            })
            .collect())
    }

    async fn seed(&self) -> Result<Vec<RssFeed>> {
        let seeded = default_feeds();
        self.persist(&seeded).await?;
        Ok(seeded)
    }

    async fn persist(&self, feeds: &[RssFeed]) -> Result<()> {
        let payload = write_envelope("feeds", RSS_STORAGE_VERSION, feeds)?;
        let written = self
            .storage
            .set_storage(RSS_STORAGE_KEY, &payload)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "RSS storage write failed");
                false
            });
        if !written {
            return Err(GlassError::StorageWrite(SAVE_FAILED.to_string()));
        }
        Ok(())
    }
}

/// Clean stored feed entries. The flag reports whether anything had to be repaired.
pub fn normalize_feeds(entries: &[Value]) -> (Vec<RssFeed>, bool) {
    let mut feeds = Vec::with_capacity(entries.len());
    let mut used = HashSet::new();
    let mut changed = false;

    for candidate in entries {
        let Value::Object(entry) = candidate else {
            changed = true;
            continue;
        };

        let title = trimmed_str(entry, "title");
        let raw_url = trimmed_str(entry, "url");
        let url = canonicalize_feed_url(raw_url);
        if title.is_empty() || url.is_empty() || !is_http_url(&url) {
            changed = true;
            continue;
        }
        if url != raw_url {
            changed = true;
        }

        let raw_id = trimmed_str(entry, "id");
        let base_id = if raw_id.is_empty() {
            changed = true;
            create_feed_id(title, &url)
        } else {
            raw_id.to_string()
        };
        let id = dedupe_id(&base_id, &mut used);
        if id != raw_id {
            changed = true;
        }

        feeds.push(RssFeed {
            id,
            title: title.to_string(),
            url,
        });
    }

    (feeds, changed)
}

fn is_http_url(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Google Groups feeds moved from `/group/` to `/g/` and require https.
fn canonicalize_feed_url(value: &str) -> String {
    let Ok(mut url) = Url::parse(value) else {
        return value.to_string();
    };
    if url.host_str() != Some("groups.google.com") {
        return value.to_string();
    }

    // http -> https is always allowed for special schemes
    let _ = url.set_scheme("https");
    let moved = url
        .path()
        .strip_prefix("/group/")
        .map(|rest| format!("/g/{rest}"));
    if let Some(path) = moved {
        url.set_path(&path);
    }
    url.to_string()
}

fn create_feed_id(title: &str, url: &str) -> String {
    let slug = slugify(title, "feed");
    let hash = fnv1a_hex(&format!("{title}::{url}"));
    format!("{slug}-{hash}")
}
