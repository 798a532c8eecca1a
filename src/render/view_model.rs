//! Screen output: a title plus an ordered list of text and list containers

use serde::Serialize;

/// Layout hint for views that carry both a list and a text container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutMode {
    TwoColumn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextContainer {
    pub id: String,
    pub content: String,
    pub event_capture: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListContainer {
    pub id: String,
    pub title: String,
    pub items: Vec<String>,
    pub selected_index: usize,
    pub event_capture: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Container {
    Text(TextContainer),
    List(ListContainer),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_mode: Option<LayoutMode>,
    pub containers: Vec<Container>,
}

impl ViewModel {
    /// A single capturing text container.
    pub fn text_only(title: impl Into<String>, id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            layout_mode: None,
            containers: vec![Container::Text(TextContainer {
                id: id.into(),
                content: content.into(),
                event_capture: true,
            })],
        }
    }

    /// Exactly one text container and no list.
    pub fn is_text_only(&self) -> bool {
        matches!(self.containers.as_slice(), [Container::Text(_)])
    }

    pub fn text(&self) -> Option<&TextContainer> {
        self.containers.iter().find_map(|container| match container {
            Container::Text(text) => Some(text),
            Container::List(_) => None,
        })
    }

    pub fn list(&self) -> Option<&ListContainer> {
        self.containers.iter().find_map(|container| match container {
            Container::List(list) => Some(list),
            Container::Text(_) => None,
        })
    }
}
