//! Root screen: entry points into the lists, with a short description beside them

use std::sync::Arc;

use crate::input::{CanonicalInputEvent, InputKind};
use crate::navigation::{Command, Route, Screen};
use crate::render::{Container, LayoutMode, ListContainer, TextContainer, ViewModel};
use crate::selection::{SelectableRow, SkipPolicy, resolve, rows::labels};
use crate::services::{DashboardData, DataService, RSS_LIST_ID};
use crate::utils::{clamp_index, truncate_with_marker};

const LIST_ID: &str = "dashboard-list";
const INFO_ID: &str = "dashboard-info";
const INFO_MAX_LEN: usize = 240;
const NO_ENTRIES: &str = "Keine Menuepunkte verfuegbar.";
const NO_DESCRIPTION: &str = "Keine Kurzbeschreibung verfuegbar.";

pub struct DashboardScreen {
    data: Arc<dyn DataService>,
    selected: usize,
}

impl DashboardScreen {
    pub fn new(data: Arc<dyn DataService>) -> Self {
        Self { data, selected: 0 }
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    fn rows(dashboard: &DashboardData) -> Vec<SelectableRow> {
        dashboard
            .items
            .iter()
            .map(|item| {
                SelectableRow::item_with_target(&item.id, &item.label, Some(item.list_id.clone()))
            })
            .collect()
    }
}

/// Label, description and hint for the highlighted entry.
fn info_text(dashboard: &DashboardData, selected: usize) -> String {
    if dashboard.items.is_empty() {
        return NO_ENTRIES.to_string();
    }
    let item = &dashboard.items[clamp_index(selected, dashboard.items.len())];
    let description = item
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(NO_DESCRIPTION);
    let content = [item.label.as_str(), "", description, "", "Click: Oeffnen"].join("\n");
    truncate_with_marker(&content, INFO_MAX_LEN)
}

impl Screen for DashboardScreen {
    fn name(&self) -> &'static str {
        "dashboard"
    }

    fn on_enter(&mut self) -> Vec<Command> {
        self.selected = 0;
        tracing::info!("enter dashboard");
        Vec::new()
    }

    fn on_exit(&mut self) -> Vec<Command> {
        tracing::info!("exit dashboard");
        Vec::new()
    }

    fn on_input(&mut self, event: &CanonicalInputEvent) -> Vec<Command> {
        let dashboard = self.data.dashboard();
        let rows = Self::rows(&dashboard);
        let previous = self.selected;
        let outcome = resolve(&rows, previous, event, SkipPolicy::None);
        self.selected = outcome.next_index;

        tracing::debug!(
            event = %event.kind,
            previous,
            next = self.selected,
            item = rows.get(self.selected).map(SelectableRow::id),
            "dashboard input"
        );

        if event.kind != InputKind::Click || outcome.suppressed {
            return Vec::new();
        }

        let target = outcome
            .target_id
            .or_else(|| (!rows.is_empty()).then(|| RSS_LIST_ID.to_string()));
        match target {
            Some(list_id) => {
                tracing::info!(list = %list_id, "dashboard click");
                vec![Command::Navigate(Route::List(list_id))]
            }
            None => Vec::new(),
        }
    }

    fn view_model(&self) -> ViewModel {
        let dashboard = self.data.dashboard();
        let selected = clamp_index(self.selected, dashboard.items.len());
        let items = labels(&Self::rows(&dashboard));

        ViewModel {
            title: dashboard.title.clone(),
            layout_mode: Some(LayoutMode::TwoColumn),
            containers: vec![
                Container::List(ListContainer {
                    id: LIST_ID.to_string(),
                    title: dashboard.title.clone(),
                    items,
                    selected_index: selected,
                    event_capture: true,
                }),
                Container::Text(TextContainer {
                    id: INFO_ID.to_string(),
                    content: info_text(&dashboard, selected),
                    event_capture: false,
                }),
            ],
        }
    }
}
