//! Screen-facing data access

use std::cmp::Ordering;
use std::sync::Arc;

use futures::future::join_all;
use parking_lot::RwLock;
use tokio::sync::Mutex;

use super::feed::{FeedItem, FeedSource, parse_feed};
use super::rss_config::{FeedConfig, RssConfigService};
use super::shopping_config::{ShoppingConfigService, ShoppingItem};
use crate::error::{GlassError, Result};
use crate::selection::SelectableRow;

pub const RSS_LIST_ID: &str = "rss";
pub const SHOPPING_LIST_ID: &str = "shopping-list";
pub const SHOPPING_DIVIDER_ID: &str = "__shopping-divider__";
pub const SHOPPING_DIVIDER_LABEL: &str = "-------- Erledigt --------";

const NO_FEEDS: &str = "Keine gueltigen RSS-Feeds konfiguriert.";
const FEEDS_UNREACHABLE: &str = "RSS-Feeds sind nicht erreichbar. Letzter Stand bleibt sichtbar.";
const FEEDS_FAILED: &str = "RSS-Feeds konnten nicht geladen werden.";
const MISSING_ITEM_TITLE: &str = "Eintrag nicht gefunden";
const MISSING_ITEM_TEXT: &str = "Der RSS-Eintrag ist nicht mehr verfuegbar.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardItem {
    pub id: String,
    pub label: String,
    pub list_id: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardData {
    pub title: String,
    pub items: Vec<DashboardItem>,
}

/// Rows of one list as last loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListData {
    pub id: String,
    pub title: String,
    pub rows: Vec<SelectableRow>,
}

impl ListData {
    pub fn empty(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            rows: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailData {
    pub id: String,
    pub title: String,
    pub description: String,
    pub pages: Vec<String>,
    pub source: String,
    pub link: Option<String>,
    pub pub_date_text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Everything screens read or change.
///
/// Async methods may hit storage or the network. Sync methods only read caches.
#[async_trait::async_trait]
pub trait DataService: Send + Sync {
    fn dashboard(&self) -> DashboardData;

    /// Reload a list from its source and return the fresh rows.
    async fn refresh_list(&self, list_id: &str) -> Result<ListData>;

    /// Cached rows of a list.
    fn list(&self, list_id: &str) -> ListData;

    /// Flip a shopping item's done state, persist it, and return the reloaded list.
    ///
    /// Unknown ids are ignored. A failed write leaves the cached list untouched.
    async fn toggle_shopping_item(&self, item_id: &str) -> Result<ListData>;

    fn detail(&self, item_id: &str) -> DetailData;

    fn adjacent_item_id(&self, item_id: &str, direction: Direction) -> Option<String>;
}

pub fn default_dashboard() -> DashboardData {
    DashboardData {
        title: "Dashboard".to_string(),
        items: vec![
            DashboardItem {
                id: "dashboard-rss".to_string(),
                label: "RSS-Feeds".to_string(),
                list_id: RSS_LIST_ID.to_string(),
                description: Some(
                    "Aktuelle Meldungen aus konfigurierten RSS-Feeds lesen.".to_string(),
                ),
            },
            DashboardItem {
                id: "dashboard-shopping-list".to_string(),
                label: "Shopping List".to_string(),
                list_id: SHOPPING_LIST_ID.to_string(),
                description: Some(
                    "Offene Einkaeufe abhaken und erledigte Eintraege pruefen.".to_string(),
                ),
            },
        ],
    }
}

/// The production data service: RSS feeds plus the stored shopping list.
pub struct AppDataService {
    rss_config: RssConfigService,
    shopping_config: ShoppingConfigService,
    feeds: Arc<dyn FeedSource>,
    rss_items: RwLock<Vec<FeedItem>>,
    shopping_items: RwLock<Vec<ShoppingItem>>,
    /// Held across each shopping load and read-modify-save so toggles apply in order.
    shopping_writes: Mutex<()>,
}

impl AppDataService {
    pub fn new(
        rss_config: RssConfigService,
        shopping_config: ShoppingConfigService,
        feeds: Arc<dyn FeedSource>,
    ) -> Self {
        Self {
            rss_config,
            shopping_config,
            feeds,
            rss_items: RwLock::new(Vec::new()),
            shopping_items: RwLock::new(Vec::new()),
            shopping_writes: Mutex::new(()),
        }
    }

    async fn refresh_rss(&self) -> Result<()> {
        let feeds = self.rss_config.load_runtime_feeds().await?;
        if feeds.is_empty() {
            return Err(GlassError::Feed(NO_FEEDS.to_string()));
        }

        let results = join_all(feeds.iter().map(|feed| self.load_feed(feed))).await;

        let mut loaded = Vec::new();
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(items) => loaded.extend(items),
                Err(message) => failures.push(message),
            }
        }

        if !failures.is_empty() {
            tracing::warn!(failed = ?failures, loaded = loaded.len(), "some feeds failed");
        }

        if !loaded.is_empty() {
            loaded.sort_by(compare_newest_first);
            tracing::info!(items = loaded.len(), "RSS items refreshed");
            *self.rss_items.write() = loaded;
            return Ok(());
        }

        if !self.rss_items.read().is_empty() {
            return Err(GlassError::Feed(FEEDS_UNREACHABLE.to_string()));
        }

        let details = if failures.is_empty() {
            String::new()
        } else {
            format!(" Details: {}", failures.join(" | "))
        };
        Err(GlassError::Feed(format!("{FEEDS_FAILED}{details}")))
    }

    async fn load_feed(&self, feed: &FeedConfig) -> std::result::Result<Vec<FeedItem>, String> {
        let xml = self
            .feeds
            .fetch(&feed.url)
            .await
            .map_err(|e| format!("{}: {}", feed.title, e.user_message()))?;
        parse_feed(&xml, feed).map_err(|e| format!("{}: {}", feed.title, e.user_message()))
    }

    fn rss_list(&self) -> ListData {
        let rows = self
            .rss_items
            .read()
            .iter()
            .map(|item| SelectableRow::item(&item.id, format!("{} - {}", item.title, item.snippet)))
            .collect();
        ListData {
            id: RSS_LIST_ID.to_string(),
            title: "RSS-Feeds".to_string(),
            rows,
        }
    }

    fn shopping_list(&self) -> ListData {
        let mut items = self.shopping_items.read().clone();
        items.sort_by(|a, b| {
            a.done
                .cmp(&b.done)
                .then(a.position.cmp(&b.position))
                .then_with(|| a.title.cmp(&b.title))
        });

        let (done, open): (Vec<_>, Vec<_>) = items.into_iter().partition(|item| item.done);
        let mut rows: Vec<SelectableRow> = open
            .iter()
            .map(|item| SelectableRow::item(&item.id, format!("[ ] {}", item.title)))
            .collect();
        if !open.is_empty() && !done.is_empty() {
            rows.push(SelectableRow::divider(SHOPPING_DIVIDER_ID, SHOPPING_DIVIDER_LABEL));
        }
        rows.extend(
            done.iter()
                .map(|item| SelectableRow::item(&item.id, format!("[x] {}", item.title))),
        );

        ListData {
            id: SHOPPING_LIST_ID.to_string(),
            title: "Shopping List".to_string(),
            rows,
        }
    }
}

#[async_trait::async_trait]
impl DataService for AppDataService {
    fn dashboard(&self) -> DashboardData {
        default_dashboard()
    }

    async fn refresh_list(&self, list_id: &str) -> Result<ListData> {
        match list_id {
            SHOPPING_LIST_ID => {
                let _writes = self.shopping_writes.lock().await;
                let items = self.shopping_config.load_items().await?;
                *self.shopping_items.write() = items;
            }
            RSS_LIST_ID => self.refresh_rss().await?,
            other => tracing::debug!(list = other, "refresh requested for unknown list"),
        }
        Ok(self.list(list_id))
    }

    fn list(&self, list_id: &str) -> ListData {
        match list_id {
            SHOPPING_LIST_ID => self.shopping_list(),
            RSS_LIST_ID => self.rss_list(),
            other => ListData::empty(other, "Liste"),
        }
    }

    async fn toggle_shopping_item(&self, item_id: &str) -> Result<ListData> {
        let _writes = self.shopping_writes.lock().await;
        let mut next = self.shopping_items.read().clone();
        let Some(target) = next.iter_mut().find(|item| item.id == item_id) else {
            tracing::debug!(item = item_id, "toggle ignored for unknown shopping item");
            return Ok(self.shopping_list());
        };
        target.done = !target.done;
        let done = target.done;

        self.shopping_config.save_items(&next).await?;
        let reloaded = self.shopping_config.load_items().await?;
        *self.shopping_items.write() = reloaded;
        tracing::info!(item = item_id, done, "shopping item toggled");

        Ok(self.shopping_list())
    }

    fn detail(&self, item_id: &str) -> DetailData {
        let items = self.rss_items.read();
        let Some(item) = items.iter().find(|item| item.id == item_id) else {
            return DetailData {
                id: item_id.to_string(),
                title: MISSING_ITEM_TITLE.to_string(),
                description: MISSING_ITEM_TEXT.to_string(),
                pages: vec![MISSING_ITEM_TEXT.to_string()],
                source: "RSS".to_string(),
                link: None,
                pub_date_text: None,
            };
        };

        DetailData {
            id: item.id.clone(),
            title: item.title.clone(),
            description: item.description.clone(),
            pages: item.pages.clone(),
            source: item.source.clone(),
            link: item.link.clone(),
            pub_date_text: item.pub_date_text.clone(),
        }
    }

    fn adjacent_item_id(&self, item_id: &str, direction: Direction) -> Option<String> {
        let items = self.rss_items.read();
        let index = items.iter().position(|item| item.id == item_id)?;
        let target = match direction {
            Direction::Up => index.checked_sub(1)?,
            Direction::Down => index + 1,
        };
        items.get(target).map(|item| item.id.clone())
    }
}

/// Newest first; undated items last, ordered by title.
fn compare_newest_first(a: &FeedItem, b: &FeedItem) -> Ordering {
    match (a.published, b.published) {
        (Some(a_date), Some(b_date)) => b_date.cmp(&a_date),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.title.cmp(&b.title),
    }
}
