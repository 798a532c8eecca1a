//! Fixed-capacity pages over an ordered row list
//!
//! Each page holds at most `max_rows` rows. Pages after the first reserve one slot for
//! a "previous" control, and a page reserves one slot for a "next" control while the
//! remaining rows do not fit. Page starts are recomputed on every call, so the
//! requested page is clamped against the current row count.

use super::rows::{ControlKind, SelectableRow};

pub const MAX_ROWS_PER_PAGE: usize = 20;

pub const PREVIOUS_PAGE_ID: &str = "__rss-prev-page__";
pub const NEXT_PAGE_ID: &str = "__rss-next-page__";
pub const PREVIOUS_PAGE_LABEL: &str = "[Zurueck]";
pub const NEXT_PAGE_LABEL: &str = "[Naechste Seite]";

/// Page index and the row offsets each page starts at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    pub page_index: usize,
    pub page_starts: Vec<usize>,
}

impl PaginationState {
    pub fn page_count(&self) -> usize {
        self.page_starts.len().max(1)
    }
}

/// One visible page: controls plus the content rows it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub state: PaginationState,
    pub rows: Vec<SelectableRow>,
    /// Offset of the first content row in the source list.
    content_start: usize,
    has_previous: bool,
}

impl Page {
    pub fn page_index(&self) -> usize {
        self.state.page_index
    }

    pub fn page_count(&self) -> usize {
        self.state.page_count()
    }

    /// Map a page-local row index to the source row offset. Controls map to `None`.
    pub fn source_index(&self, local: usize) -> Option<usize> {
        match self.rows.get(local)? {
            SelectableRow::Control { .. } => None,
            _ => Some(self.content_start + local - usize::from(self.has_previous)),
        }
    }

    /// `page/pages` as shown above the list.
    pub fn status_label(&self) -> String {
        format!("{}/{}", self.page_index() + 1, self.page_count())
    }
}

/// Offsets at which each page starts, for `total` content rows.
pub fn page_starts(total: usize, max_rows: usize) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut cursor = 0;
    let mut page = 0;

    while cursor < total {
        starts.push(cursor);
        cursor += content_slots(page, total - cursor, max_rows);
        page += 1;
    }

    if starts.is_empty() {
        starts.push(0);
    }
    starts
}

fn content_slots(page: usize, remaining: usize, max_rows: usize) -> usize {
    let reserve_back = usize::from(page > 0);
    let without_next = max_rows.saturating_sub(reserve_back);
    let reserve_next = usize::from(remaining > without_next);
    without_next.saturating_sub(reserve_next).max(1)
}

/// Cut `rows` into the page closest to `requested`.
///
/// A list made of a single status row is shown as is: one page, no controls.
pub fn paginate(rows: &[SelectableRow], requested: usize, max_rows: usize) -> Page {
    if rows.len() == 1 && rows[0].is_status() {
        return Page {
            state: PaginationState {
                page_index: 0,
                page_starts: vec![0],
            },
            rows: rows.to_vec(),
            content_start: 0,
            has_previous: false,
        };
    }

    let starts = page_starts(rows.len(), max_rows);
    let page_index = requested.min(starts.len() - 1);
    let start = starts[page_index];
    let end = starts.get(page_index + 1).copied().unwrap_or(rows.len());
    let has_previous = page_index > 0;
    let has_next = page_index + 1 < starts.len();

    let mut page_rows = Vec::with_capacity(end - start + 2);
    if has_previous {
        page_rows.push(SelectableRow::Control {
            id: PREVIOUS_PAGE_ID.to_string(),
            label: PREVIOUS_PAGE_LABEL.to_string(),
            kind: ControlKind::PreviousPage,
        });
    }
    page_rows.extend_from_slice(&rows[start..end]);
    if has_next {
        page_rows.push(SelectableRow::Control {
            id: NEXT_PAGE_ID.to_string(),
            label: NEXT_PAGE_LABEL.to_string(),
            kind: ControlKind::NextPage,
        });
    }

    Page {
        state: PaginationState {
            page_index,
            page_starts: starts,
        },
        rows: page_rows,
        content_start: start,
        has_previous,
    }
}
