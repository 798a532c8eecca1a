//! Render diffing: incremental text updates when safe, full rebuilds otherwise

use std::sync::Arc;

use super::layout::{PageLayout, build_layout};
use super::view_model::ViewModel;
use crate::bridge::{HostBridge, TextUpdate};

/// What the pipeline knows about the surface it drew last.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderState {
    /// Set once the surface exists. Never reverts.
    pub created: bool,
    pub last_render_was_text_only: bool,
}

/// Bridge call a render ended with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPath {
    Create,
    Incremental,
    Rebuild,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderReport {
    pub path: RenderPath,
    pub ok: bool,
    /// An incremental update was refused and a rebuild followed.
    pub fell_back: bool,
}

/// The one render pipeline of a running app.
///
/// `render` takes `&mut self`, so a render can never start while another is
/// outstanding.
pub struct RenderPipeline {
    bridge: Arc<dyn HostBridge>,
    state: RenderState,
}

impl RenderPipeline {
    pub fn new(bridge: Arc<dyn HostBridge>) -> Self {
        Self {
            bridge,
            state: RenderState::default(),
        }
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub async fn render(&mut self, view: &ViewModel) -> RenderReport {
        let layout = build_layout(view);
        let text_only = layout.is_text_only();

        if !self.state.created {
            let created = self.call("create_surface", self.bridge.create_surface(&layout).await);
            self.state.created = created;
            self.state.last_render_was_text_only = text_only;
            tracing::info!(created, "startup surface requested");
            return RenderReport {
                path: RenderPath::Create,
                ok: created,
                fell_back: false,
            };
        }

        let mut fell_back = false;
        if text_only && self.state.last_render_was_text_only {
            if self.update_text(&layout).await {
                self.state.last_render_was_text_only = true;
                return RenderReport {
                    path: RenderPath::Incremental,
                    ok: true,
                    fell_back: false,
                };
            }
            tracing::info!("text update failed, falling back to rebuild");
            fell_back = true;
        }

        let rebuilt = self.call("rebuild_surface", self.bridge.rebuild_surface(&layout).await);
        if !rebuilt {
            tracing::warn!("surface rebuild failed");
        }
        self.state.last_render_was_text_only = text_only;

        RenderReport {
            path: RenderPath::Rebuild,
            ok: rebuilt,
            fell_back,
        }
    }

    async fn update_text(&self, layout: &PageLayout) -> bool {
        let Some(text) = layout.text_containers.first() else {
            return false;
        };
        let update = TextUpdate::replace_all(text.container_id, &text.container_name, &text.content);
        self.call("update_text", self.bridge.update_text(&update).await)
    }

    fn call(&self, name: &str, result: crate::error::Result<bool>) -> bool {
        match result {
            Ok(ok) => ok,
            Err(e) => {
                tracing::warn!(call = name, error = %e, "bridge call failed");
                false
            }
        }
    }
}
