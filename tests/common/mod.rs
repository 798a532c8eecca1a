#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Write;
use std::process::{Command, Output, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tempfile::TempDir;

use glassdeck::bridge::{HostBridge, TextUpdate};
use glassdeck::error::{GlassError, Result};
use glassdeck::render::PageLayout;
use glassdeck::services::{
    AppDataService, FeedSource, RssConfigService, RssFeed, ShoppingConfigService,
};

/// Helper struct to run the glassdeck binary against an isolated state directory
pub struct GlassdeckTest {
    pub temp_dir: TempDir,
}

impl GlassdeckTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        GlassdeckTest { temp_dir }
    }

    pub fn root(&self) -> std::path::PathBuf {
        self.temp_dir.path().join(".glassdeck")
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(env!("CARGO_BIN_EXE_glassdeck"));
        command
            .args(args)
            .current_dir(self.temp_dir.path())
            .env("GLASSDECK_ROOT", self.root())
            .env("GLASSDECK_LOG", "off")
            .env("NO_COLOR", "1");
        command
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.run_with_stdin(args, "")
    }

    pub fn run_with_stdin(&self, args: &[&str], stdin: &str) -> Output {
        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to execute glassdeck command");
        child
            .stdin
            .take()
            .expect("stdin should be piped")
            .write_all(stdin.as_bytes())
            .expect("Failed to write stdin");
        child.wait_with_output().expect("Failed to wait for glassdeck")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        self.run_success_with_stdin(args, "")
    }

    pub fn run_success_with_stdin(&self, args: &[&str], stdin: &str) -> String {
        let output = self.run_with_stdin(args, stdin);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    /// Like [`run_success`](Self::run_success), with terminal colors removed.
    pub fn run_plain(&self, args: &[&str]) -> String {
        strip_ansi(&self.run_success(args))
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }
}

/// Remove ANSI color sequences.
pub fn strip_ansi(text: &str) -> String {
    let ansi = regex::Regex::new(r"\x1b\[[0-9;]*m").expect("ansi regex should be valid");
    ansi.replace_all(text, "").into_owned()
}

/// One bridge call as seen by [`RecordingBridge`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create(PageLayout),
    Rebuild(PageLayout),
    Text(TextUpdate),
}

impl Call {
    pub fn name(&self) -> &'static str {
        match self {
            Call::Create(_) => "create",
            Call::Rebuild(_) => "rebuild",
            Call::Text(_) => "text",
        }
    }
}

/// Host bridge that records every surface call and keeps storage in memory.
#[derive(Default)]
pub struct RecordingBridge {
    pub calls: Mutex<Vec<Call>>,
    pub storage: Mutex<HashMap<String, String>>,
    pub refuse_text: AtomicBool,
    pub refuse_writes: AtomicBool,
}

impl RecordingBridge {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.calls.lock().iter().map(Call::name).collect()
    }

    pub fn last(&self) -> Option<Call> {
        self.calls.lock().last().cloned()
    }

    /// List items of the most recent create or rebuild.
    pub fn last_list_items(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .rev()
            .find_map(|call| match call {
                Call::Create(layout) | Call::Rebuild(layout) => layout
                    .list_containers
                    .first()
                    .map(|list| list.item_container.item_name.clone()),
                Call::Text(_) => None,
            })
            .unwrap_or_default()
    }

    /// Text of the most recent render that carried one.
    pub fn last_text(&self) -> Option<String> {
        self.calls.lock().iter().rev().find_map(|call| match call {
            Call::Create(layout) | Call::Rebuild(layout) => layout
                .text_containers
                .first()
                .map(|text| text.content.clone()),
            Call::Text(update) => Some(update.content.clone()),
        })
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

#[async_trait::async_trait]
impl HostBridge for RecordingBridge {
    async fn create_surface(&self, layout: &PageLayout) -> Result<bool> {
        self.calls.lock().push(Call::Create(layout.clone()));
        Ok(true)
    }

    async fn rebuild_surface(&self, layout: &PageLayout) -> Result<bool> {
        self.calls.lock().push(Call::Rebuild(layout.clone()));
        Ok(true)
    }

    async fn update_text(&self, update: &TextUpdate) -> Result<bool> {
        self.calls.lock().push(Call::Text(update.clone()));
        Ok(!self.refuse_text.load(Ordering::SeqCst))
    }

    async fn get_storage(&self, key: &str) -> Result<String> {
        Ok(self.storage.lock().get(key).cloned().unwrap_or_default())
    }

    async fn set_storage(&self, key: &str, value: &str) -> Result<bool> {
        if self.refuse_writes.load(Ordering::SeqCst) {
            return Ok(false);
        }
        self.storage.lock().insert(key.to_string(), value.to_string());
        Ok(true)
    }
}

/// Feed source serving fixed documents by URL; anything else is a 503.
#[derive(Default)]
pub struct CannedFeeds {
    pub documents: Mutex<HashMap<String, String>>,
}

impl CannedFeeds {
    pub fn with(url: &str, document: String) -> Arc<Self> {
        let feeds = Self::default();
        feeds.documents.lock().insert(url.to_string(), document);
        Arc::new(feeds)
    }
}

#[async_trait::async_trait]
impl FeedSource for CannedFeeds {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.documents
            .lock()
            .get(url)
            .cloned()
            .ok_or_else(|| GlassError::Feed("HTTP 503".to_string()))
    }
}

pub const FEED_URL: &str = "https://example.com/news.xml";

/// RSS document with one item per `(title, pubDate, body)`.
pub fn rss_document(items: &[(&str, &str, &str)]) -> String {
    let body: String = items
        .iter()
        .map(|(title, date, text)| {
            format!(
                "<item><title>{title}</title><guid>{title}</guid><pubDate>{date}</pubDate><description>{text}</description></item>"
            )
        })
        .collect();
    format!("<rss><channel>{body}</channel></rss>")
}

/// Data service over `bridge` storage with one configured feed at [`FEED_URL`].
pub async fn data_service(bridge: Arc<RecordingBridge>, feeds: Arc<CannedFeeds>) -> AppDataService {
    let bridge: Arc<dyn HostBridge> = bridge;
    let rss_config = RssConfigService::new(bridge.clone());
    rss_config
        .save_feeds(&[RssFeed {
            id: "news".to_string(),
            title: "News".to_string(),
            url: FEED_URL.to_string(),
        }])
        .await
        .expect("feeds should save");
    AppDataService::new(rss_config, ShoppingConfigService::new(bridge), feeds)
}

/// Store a shopping list envelope directly in bridge storage.
pub fn store_shopping(bridge: &RecordingBridge, items: serde_json::Value) {
    let envelope = serde_json::json!({ "version": 1, "items": items });
    bridge
        .storage
        .lock()
        .insert("shopping_config_v1".to_string(), envelope.to_string());
}
