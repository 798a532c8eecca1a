//! Line-oriented host simulator
//!
//! Every bridge call is written as one JSON record per line to the output stream.
//! Raw input events are read the same way from the input stream. Storage lives in a
//! JSON file so shopping lists and feed settings survive restarts.

use std::collections::BTreeMap;
use std::path::PathBuf;

use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{HostBridge, TextUpdate};
use crate::error::{GlassError, Result};
use crate::input::RawBridgeEvent;
use crate::render::layout::PageLayout;
use crate::utils::{read_optional, write_file_atomic};

type Output = Box<dyn AsyncWrite + Send + Unpin>;

pub struct SimulatorBridge {
    output: tokio::sync::Mutex<Output>,
    storage: Mutex<BTreeMap<String, String>>,
    storage_path: Option<PathBuf>,
}

impl SimulatorBridge {
    /// Simulator writing call records to `output`. Storage is kept in memory only.
    pub fn new(output: impl AsyncWrite + Send + Unpin + 'static) -> Self {
        Self {
            output: tokio::sync::Mutex::new(Box::new(output)),
            storage: Mutex::new(BTreeMap::new()),
            storage_path: None,
        }
    }

    /// Back storage with a JSON file, loading whatever it already holds.
    pub fn with_storage_file(mut self, path: PathBuf) -> Result<Self> {
        if let Some(content) = read_optional(&path)? {
            let values: BTreeMap<String, String> = if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).map_err(|e| {
                    GlassError::StorageRead(format!("{}: {e}", path.display()))
                })?
            };
            tracing::debug!(path = %path.display(), keys = values.len(), "loaded simulator storage");
            *self.storage.get_mut() = values;
        }
        self.storage_path = Some(path);
        Ok(self)
    }

    /// Simulator on the process's stdout.
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdout())
    }

    async fn emit(&self, call: &'static str, record: Value) -> Result<()> {
        let mut line = serde_json::to_string(&json!({ "call": call, "args": record }))?;
        line.push('\n');

        let mut output = self.output.lock().await;
        output
            .write_all(line.as_bytes())
            .await
            .map_err(|e| GlassError::Bridge(call, e.to_string()))?;
        output
            .flush()
            .await
            .map_err(|e| GlassError::Bridge(call, e.to_string()))
    }

    fn persist_storage(&self) -> Result<()> {
        let Some(path) = &self.storage_path else {
            return Ok(());
        };
        let content = serde_json::to_string_pretty(&*self.storage.lock())?;
        write_file_atomic(path, &content)
    }
}

#[async_trait::async_trait]
impl HostBridge for SimulatorBridge {
    async fn create_surface(&self, layout: &PageLayout) -> Result<bool> {
        self.emit("createStartUpPageContainer", serde_json::to_value(layout)?)
            .await?;
        Ok(true)
    }

    async fn rebuild_surface(&self, layout: &PageLayout) -> Result<bool> {
        self.emit("rebuildPageContainer", serde_json::to_value(layout)?)
            .await?;
        Ok(true)
    }

    async fn update_text(&self, update: &TextUpdate) -> Result<bool> {
        self.emit("textContainerUpgrade", serde_json::to_value(update)?)
            .await?;
        Ok(true)
    }

    async fn get_storage(&self, key: &str) -> Result<String> {
        Ok(self.storage.lock().get(key).cloned().unwrap_or_default())
    }

    async fn set_storage(&self, key: &str, value: &str) -> Result<bool> {
        let previous = self
            .storage
            .lock()
            .insert(key.to_string(), value.to_string());

        if let Err(e) = self.persist_storage() {
            tracing::warn!(key, error = %e, "simulator storage write failed");
            let mut storage = self.storage.lock();
            match previous {
                Some(previous) => storage.insert(key.to_string(), previous),
                None => storage.remove(key),
            };
            return Ok(false);
        }

        self.emit("setLocalStorage", json!({ "key": key, "bytes": value.len() }))
            .await?;
        Ok(true)
    }
}

/// Forward raw events, one JSON document per line, until the reader closes or the
/// receiver is dropped. Blank lines are skipped.
pub fn spawn_input<R>(reader: R, events: mpsc::Sender<RawBridgeEvent>) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    if events.send(RawBridgeEvent::from_line(&line)).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "input stream failed");
                    break;
                }
            }
        }
        tracing::debug!("input stream closed");
    })
}
