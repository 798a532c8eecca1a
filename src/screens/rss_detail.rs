//! Full text of one RSS item, paged, with optional auto-scroll

use std::sync::Arc;

use crate::input::{CanonicalInputEvent, InputKind};
use crate::navigation::{Command, Route, Screen};
use crate::render::ViewModel;
use crate::services::{DataService, DetailData, Direction};
use crate::utils::truncate_with_marker;

const TITLE: &str = "RSS-Detail";
const TEXT_ID: &str = "text-1";
const MAX_CONTENT_LEN: usize = 980;

pub struct RssDetailScreen {
    data: Arc<dyn DataService>,
    item_id: String,
    page_index: usize,
    auto_scroll: bool,
}

impl RssDetailScreen {
    pub fn new(item_id: &str, data: Arc<dyn DataService>) -> Self {
        Self {
            data,
            item_id: item_id.to_string(),
            page_index: 0,
            auto_scroll: false,
        }
    }

    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn auto_scroll(&self) -> bool {
        self.auto_scroll
    }

    fn toggle_auto_scroll(&mut self) -> Vec<Command> {
        if self.auto_scroll {
            self.auto_scroll = false;
            return vec![Command::StopTicker];
        }
        if self.data.detail(&self.item_id).pages.len() <= 1 {
            tracing::debug!(item = %self.item_id, "auto-scroll needs more than one page");
            return Vec::new();
        }
        self.auto_scroll = true;
        vec![Command::StartTicker]
    }

    fn move_to_adjacent(&mut self, direction: Direction) -> Vec<Command> {
        match self.data.adjacent_item_id(&self.item_id, direction) {
            Some(next) => {
                tracing::debug!(from = %self.item_id, to = %next, "adjacent item");
                self.item_id = next;
                self.page_index = 0;
                Vec::new()
            }
            None => {
                self.page_index = 0;
                vec![Command::Navigate(Route::Back)]
            }
        }
    }
}

/// Text block shown for `detail` at `page_index`.
pub fn detail_content(detail: &DetailData, page_index: usize, auto_scroll: bool) -> String {
    let page_count = detail.pages.len().max(1);
    let page_index = if page_index >= page_count { 0 } else { page_index };
    let active_page = detail
        .pages
        .get(page_index)
        .map(String::as_str)
        .unwrap_or(detail.description.as_str());

    let source_line = match &detail.pub_date_text {
        Some(date) => format!("Quelle: {} | {date}", detail.source),
        None => format!("Quelle: {}", detail.source),
    };

    let content = [
        detail.title.clone(),
        String::new(),
        active_page.to_string(),
        String::new(),
        source_line,
        format!("Seite: {}/{page_count}", page_index + 1),
        format!("AutoScroll: {}", if auto_scroll { "AN" } else { "AUS" }),
        "Click: AutoScroll".to_string(),
    ]
    .join("\n");

    truncate_with_marker(&content, MAX_CONTENT_LEN)
}

impl Screen for RssDetailScreen {
    fn name(&self) -> &'static str {
        "rss-detail"
    }

    fn on_enter(&mut self) -> Vec<Command> {
        tracing::info!(item = %self.item_id, "enter detail");
        Vec::new()
    }

    fn on_exit(&mut self) -> Vec<Command> {
        tracing::info!(item = %self.item_id, "exit detail");
        self.auto_scroll = false;
        vec![Command::StopTicker]
    }

    fn on_input(&mut self, event: &CanonicalInputEvent) -> Vec<Command> {
        match event.kind {
            InputKind::Click => self.toggle_auto_scroll(),
            InputKind::Up => self.move_to_adjacent(Direction::Up),
            InputKind::Down => self.move_to_adjacent(Direction::Down),
            InputKind::DoubleClick => vec![Command::Navigate(Route::Back)],
            InputKind::SelectionChange => Vec::new(),
        }
    }

    fn on_tick(&mut self) -> Vec<Command> {
        if !self.auto_scroll {
            return Vec::new();
        }
        let pages = self.data.detail(&self.item_id).pages.len();
        if pages <= 1 {
            self.auto_scroll = false;
            return vec![Command::StopTicker];
        }
        self.page_index = (self.page_index + 1) % pages;
        Vec::new()
    }

    fn view_model(&self) -> ViewModel {
        let detail = self.data.detail(&self.item_id);
        ViewModel::text_only(
            TITLE,
            TEXT_ID,
            detail_content(&detail, self.page_index, self.auto_scroll),
        )
    }
}
