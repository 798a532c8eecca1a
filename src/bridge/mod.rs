//! Host bridge: the device surface, key/value storage and the raw input stream

pub mod simulator;

use serde::Serialize;

use crate::error::Result;
use crate::render::layout::PageLayout;

pub use simulator::SimulatorBridge;

/// Incremental replacement of a text container's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextUpdate {
    #[serde(rename = "containerID")]
    pub container_id: u32,
    pub container_name: String,
    pub content_offset: usize,
    pub content_length: usize,
    pub content: String,
}

impl TextUpdate {
    /// Replace the whole content of a container.
    pub fn replace_all(container_id: u32, container_name: &str, content: &str) -> Self {
        Self {
            container_id,
            container_name: container_name.to_string(),
            content_offset: 0,
            // host measures UTF-16 units
            content_length: content.encode_utf16().count(),
            content: content.to_string(),
        }
    }
}

/// Calls the runtime makes into the host.
///
/// `Ok(false)` is a refusal reported by the host; `Err` means the call itself failed.
#[async_trait::async_trait]
pub trait HostBridge: Send + Sync {
    async fn create_surface(&self, layout: &PageLayout) -> Result<bool>;

    async fn rebuild_surface(&self, layout: &PageLayout) -> Result<bool>;

    async fn update_text(&self, update: &TextUpdate) -> Result<bool>;

    /// Stored value, or an empty string when the key was never written.
    async fn get_storage(&self, key: &str) -> Result<String>;

    async fn set_storage(&self, key: &str, value: &str) -> Result<bool>;
}
