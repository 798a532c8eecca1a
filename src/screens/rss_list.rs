//! Paginated RSS item list

use super::{LoadState, StatusTexts, with_status};
use crate::input::{CanonicalInputEvent, InputKind};
use crate::navigation::{Command, Completion, Route, Screen};
use crate::refresh::RefreshTicket;
use crate::render::{Container, ListContainer, TextContainer, ViewModel};
use crate::selection::{ControlKind, Page, SelectableRow, SkipPolicy, paginate, resolve, rows::labels};
use crate::services::{DataService, ListData};
use crate::utils::clamp_index;

const LIST_ID: &str = "list-1";
const PAGE_STATUS_ID: &str = "list-page-status";
const UNKNOWN_ERROR: &str = "Unbekannter RSS-Fehler";

const TEXTS: StatusTexts = StatusTexts {
    status_id: "__status__",
    loading: "RSS-Feeds werden geladen...",
    empty: "Keine RSS-Eintraege gefunden.",
};

pub struct RssListScreen {
    list_id: String,
    rows_per_page: usize,
    list: ListData,
    load: LoadState,
    page_index: usize,
    selected: usize,
}

impl RssListScreen {
    pub fn new(list_id: &str, data: &dyn DataService, rows_per_page: usize) -> Self {
        let list = data.list(list_id);
        Self {
            list_id: list_id.to_string(),
            rows_per_page,
            list,
            load: LoadState::default(),
            page_index: 0,
            selected: 0,
        }
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    fn visible(&self) -> ListData {
        with_status(&self.list, &self.load, &TEXTS)
    }

    fn page(&self, visible: &ListData) -> Page {
        paginate(&visible.rows, self.page_index, self.rows_per_page)
    }

    fn switch_page(&mut self, kind: ControlKind, page_count: usize) {
        self.page_index = match kind {
            ControlKind::NextPage => (self.page_index + 1).min(page_count.saturating_sub(1)),
            ControlKind::PreviousPage => self.page_index.saturating_sub(1),
        };
        self.selected = 0;
        tracing::debug!(page = self.page_index + 1, pages = page_count, "page switched");
    }
}

impl Screen for RssListScreen {
    fn name(&self) -> &'static str {
        "rss-list"
    }

    fn on_enter(&mut self) -> Vec<Command> {
        // hosts re-enter lists with the top row highlighted
        self.selected = 0;
        tracing::info!(list = %self.list_id, "enter list");
        let ticket = self.load.begin();
        vec![Command::Reload {
            list_id: self.list_id.clone(),
            ticket,
        }]
    }

    fn on_exit(&mut self) -> Vec<Command> {
        self.load.invalidate();
        tracing::info!(list = %self.list_id, "exit list");
        Vec::new()
    }

    fn on_input(&mut self, event: &CanonicalInputEvent) -> Vec<Command> {
        let visible = self.visible();
        let page = self.page(&visible);
        self.page_index = page.page_index();

        let outcome = resolve(&page.rows, self.selected, event, SkipPolicy::None);
        self.selected = outcome.next_index;

        match event.kind {
            InputKind::DoubleClick => return vec![Command::Navigate(Route::Back)],
            InputKind::Click if !outcome.suppressed => {}
            _ => return Vec::new(),
        }

        match page.rows.get(self.selected) {
            Some(row @ SelectableRow::Item { .. }) => {
                let Some(target) = row.target_id() else {
                    return Vec::new();
                };
                tracing::info!(
                    item = target,
                    row = self.selected,
                    page = self.page_index + 1,
                    "open detail"
                );
                vec![Command::Navigate(Route::Detail(target.to_string()))]
            }
            Some(SelectableRow::Control { kind, .. }) => {
                self.switch_page(*kind, page.page_count());
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn on_complete(&mut self, ticket: RefreshTicket, completion: Completion) -> Vec<Command> {
        let Completion::Reload(result) = completion else {
            return Vec::new();
        };
        if let Some(list) = self.load.finish(ticket, result, UNKNOWN_ERROR) {
            self.list = list;
        }

        let visible = self.visible();
        let page = self.page(&visible);
        self.page_index = page.page_index();
        self.selected = clamp_index(self.selected, page.rows.len());
        tracing::debug!(
            list = %self.list_id,
            rows = self.list.rows.len(),
            error = self.load.error.as_deref(),
            "list reload applied"
        );
        Vec::new()
    }

    fn view_model(&self) -> ViewModel {
        let visible = self.visible();
        let page = self.page(&visible);

        ViewModel {
            title: visible.title.clone(),
            layout_mode: None,
            containers: vec![
                Container::Text(TextContainer {
                    id: PAGE_STATUS_ID.to_string(),
                    content: page.status_label(),
                    event_capture: false,
                }),
                Container::List(ListContainer {
                    id: LIST_ID.to_string(),
                    title: visible.title,
                    items: labels(&page.rows),
                    selected_index: clamp_index(self.selected, page.rows.len()),
                    event_capture: true,
                }),
            ],
        }
    }
}
