//! The app's screens and the route table that builds them

pub mod dashboard;
pub mod rss_detail;
pub mod rss_list;
pub mod shopping;

use std::sync::Arc;

use crate::error::GlassError;
use crate::navigation::{Route, Screen};
use crate::refresh::{RefreshSequencer, RefreshTicket};
use crate::selection::SelectableRow;
use crate::services::{DataService, ListData, SHOPPING_LIST_ID};

pub use dashboard::DashboardScreen;
pub use rss_detail::RssDetailScreen;
pub use rss_list::RssListScreen;
pub use shopping::ShoppingScreen;

/// Builds screens for routes.
#[derive(Clone)]
pub struct ScreenFactory {
    data: Arc<dyn DataService>,
    rows_per_page: usize,
}

impl ScreenFactory {
    pub fn new(data: Arc<dyn DataService>, rows_per_page: usize) -> Self {
        Self {
            data,
            rows_per_page,
        }
    }

    pub fn dashboard(&self) -> Box<dyn Screen> {
        Box::new(DashboardScreen::new(self.data.clone()))
    }

    /// Screen for a forward route. `Route::Back` has no screen.
    pub fn build(&self, route: &Route) -> Option<Box<dyn Screen>> {
        match route {
            Route::List(list_id) if list_id == SHOPPING_LIST_ID => {
                Some(Box::new(ShoppingScreen::new(self.data.as_ref())))
            }
            Route::List(list_id) => Some(Box::new(RssListScreen::new(
                list_id,
                self.data.as_ref(),
                self.rows_per_page,
            ))),
            Route::Detail(item_id) => {
                Some(Box::new(RssDetailScreen::new(item_id, self.data.clone())))
            }
            Route::Back => None,
        }
    }
}

/// Loading and error state of a reloadable list.
#[derive(Debug, Default)]
pub(crate) struct LoadState {
    sequencer: RefreshSequencer,
    pub loading: bool,
    pub error: Option<String>,
}

impl LoadState {
    /// Start a reload; earlier tickets become stale.
    pub fn begin(&mut self) -> RefreshTicket {
        self.loading = true;
        self.error = None;
        self.sequencer.start()
    }

    /// Start a mutation whose result replaces the list; outstanding reloads become stale.
    pub fn begin_mutation(&mut self) -> RefreshTicket {
        self.sequencer.start()
    }

    pub fn invalidate(&mut self) {
        self.sequencer.invalidate();
    }

    /// Apply a finished reload or mutation. Returns the fresh list when it was accepted
    /// and succeeded.
    pub fn finish(
        &mut self,
        ticket: RefreshTicket,
        result: crate::error::Result<ListData>,
        fallback_error: &str,
    ) -> Option<ListData> {
        let result = self.sequencer.accept(ticket, result)?;
        self.loading = false;
        match result {
            Ok(list) => {
                self.error = None;
                Some(list)
            }
            Err(e) => {
                self.error = Some(error_text(&e, fallback_error));
                None
            }
        }
    }
}

fn error_text(error: &GlassError, fallback: &str) -> String {
    let message = error.user_message();
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

/// Status row texts of one list screen.
pub(crate) struct StatusTexts {
    pub status_id: &'static str,
    pub loading: &'static str,
    pub empty: &'static str,
}

/// The list as shown: title suffix while data is stale, a single status row when
/// there is nothing to show.
pub(crate) fn with_status(list: &ListData, load: &LoadState, texts: &StatusTexts) -> ListData {
    if !list.rows.is_empty() {
        let suffix = if load.loading {
            " (laedt...)"
        } else if load.error.is_some() {
            " (letzter Stand)"
        } else {
            ""
        };
        return ListData {
            id: list.id.clone(),
            title: format!("{}{suffix}", list.title),
            rows: list.rows.clone(),
        };
    }

    let message = match (&load.error, load.loading) {
        (_, true) => texts.loading.to_string(),
        (Some(error), false) => format!("Fehler: {error}"),
        (None, false) => texts.empty.to_string(),
    };
    ListData {
        id: list.id.clone(),
        title: list.title.clone(),
        rows: vec![SelectableRow::status(texts.status_id, message)],
    }
}
