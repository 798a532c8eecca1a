//! Physical container layout for the 576x288 display surface

use serde::Serialize;

use super::view_model::{Container, LayoutMode, ViewModel};

pub const SURFACE_WIDTH: u32 = 576;
pub const SURFACE_HEIGHT: u32 = 288;

const COLUMN_TEXT_X: u32 = 288;
const COLUMN_TEXT_WIDTH: u32 = 288;
const COLUMN_LIST_WIDTH: u32 = 280;
const SPLIT_TEXT_HEIGHT: u32 = 96;
const MIN_ITEM_WIDTH: u32 = 20;
const ITEM_WIDTH_INSET: u32 = 11;

pub const TEXT_CONTAINER_ID: u32 = 1;
pub const TEXT_CONTAINER_NAME: &str = "main-text";
pub const LIST_CONTAINER_ID: u32 = 2;
pub const LIST_CONTAINER_NAME: &str = "main-list";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContainerProperty {
    pub x_position: u32,
    pub y_position: u32,
    pub width: u32,
    pub height: u32,
    pub border_width: u32,
    /// Host field name, misspelling included.
    #[serde(rename = "borderRdaius")]
    pub border_radius: u32,
    pub padding_length: u32,
    #[serde(rename = "containerID")]
    pub container_id: u32,
    pub container_name: String,
    pub content: String,
    pub is_event_capture: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemContainer {
    pub item_count: usize,
    pub item_width: u32,
    pub is_item_select_border_en: u8,
    pub item_name: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListContainerProperty {
    pub x_position: u32,
    pub y_position: u32,
    pub width: u32,
    pub height: u32,
    #[serde(rename = "containerID")]
    pub container_id: u32,
    pub container_name: String,
    pub is_event_capture: u8,
    pub item_container: ListItemContainer,
}

/// Payload for surface creation and rebuilds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLayout {
    pub container_total_num: usize,
    #[serde(rename = "textObject", skip_serializing_if = "Vec::is_empty")]
    pub text_containers: Vec<TextContainerProperty>,
    #[serde(rename = "listObject", skip_serializing_if = "Vec::is_empty")]
    pub list_containers: Vec<ListContainerProperty>,
}

impl PageLayout {
    pub fn is_text_only(&self) -> bool {
        self.container_total_num == 1
            && self.text_containers.len() == 1
            && self.list_containers.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
struct Geometry {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

/// Translate a view model into container geometry.
///
/// With both a text and a list container the layout is either two columns (list
/// left, bordered text right) or a stacked split (text on top). A lone container
/// fills the surface. Only the first container asking for input gets it.
pub fn build_layout(view: &ViewModel) -> PageLayout {
    let has_text = view.text().is_some();
    let has_list = view.list().is_some();
    let two_column = view.layout_mode == Some(LayoutMode::TwoColumn) && has_text && has_list;
    let stacked = !two_column && has_text && has_list;

    let text_geometry = Geometry {
        x: if two_column { COLUMN_TEXT_X } else { 0 },
        y: 0,
        width: if two_column { COLUMN_TEXT_WIDTH } else { SURFACE_WIDTH },
        height: if stacked { SPLIT_TEXT_HEIGHT } else { SURFACE_HEIGHT },
    };
    let list_geometry = Geometry {
        x: 0,
        y: if stacked { SPLIT_TEXT_HEIGHT } else { 0 },
        width: if two_column { COLUMN_LIST_WIDTH } else { SURFACE_WIDTH },
        height: if stacked {
            SURFACE_HEIGHT - SPLIT_TEXT_HEIGHT
        } else {
            SURFACE_HEIGHT
        },
    };

    let mut capture_assigned = false;
    let mut claim_capture = |requested: bool| -> u8 {
        if requested && !capture_assigned {
            capture_assigned = true;
            1
        } else {
            0
        }
    };

    let mut text_containers = Vec::new();
    let mut list_containers = Vec::new();
    for container in &view.containers {
        match container {
            Container::Text(text) => {
                let border = u32::from(two_column);
                text_containers.push(TextContainerProperty {
                    x_position: text_geometry.x,
                    y_position: text_geometry.y,
                    width: text_geometry.width,
                    height: text_geometry.height,
                    border_width: border,
                    border_radius: border * 4,
                    padding_length: border * 6,
                    container_id: TEXT_CONTAINER_ID,
                    container_name: TEXT_CONTAINER_NAME.to_string(),
                    content: text.content.clone(),
                    is_event_capture: claim_capture(text.event_capture),
                });
            }
            Container::List(list) => {
                list_containers.push(ListContainerProperty {
                    x_position: list_geometry.x,
                    y_position: list_geometry.y,
                    width: list_geometry.width,
                    height: list_geometry.height,
                    container_id: LIST_CONTAINER_ID,
                    container_name: LIST_CONTAINER_NAME.to_string(),
                    is_event_capture: claim_capture(list.event_capture),
                    item_container: ListItemContainer {
                        item_count: list.items.len(),
                        item_width: list_geometry
                            .width
                            .saturating_sub(ITEM_WIDTH_INSET)
                            .max(MIN_ITEM_WIDTH),
                        is_item_select_border_en: 1,
                        item_name: list.items.clone(),
                    },
                });
            }
        }
    }

    PageLayout {
        container_total_num: text_containers.len() + list_containers.len(),
        text_containers,
        list_containers,
    }
}
