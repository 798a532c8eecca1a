//! Shopping list with check-off

use super::{LoadState, StatusTexts, with_status};
use crate::input::{CanonicalInputEvent, InputKind};
use crate::navigation::{Command, Completion, Route, Screen};
use crate::refresh::RefreshTicket;
use crate::render::{Container, ListContainer, ViewModel};
use crate::selection::{SelectableRow, SkipPolicy, nearest_interactive, resolve, rows::labels};
use crate::services::{DataService, ListData, SHOPPING_LIST_ID};
use crate::utils::clamp_index;

const LIST_ID: &str = "list-1";
const LOAD_ERROR: &str = "Unbekannter Shopping-Fehler";
const TOGGLE_ERROR: &str = "Shopping-Eintrag konnte nicht aktualisiert werden.";

const TEXTS: StatusTexts = StatusTexts {
    status_id: "__shopping-status__",
    loading: "Shopping-Liste wird geladen...",
    empty: "Keine Shopping-Eintraege vorhanden.",
};

pub struct ShoppingScreen {
    list: ListData,
    load: LoadState,
    selected: usize,
    /// Item of the toggle in flight, followed after the list reorders.
    toggling: Option<String>,
}

impl ShoppingScreen {
    pub fn new(data: &dyn DataService) -> Self {
        let list = data.list(SHOPPING_LIST_ID);
        Self {
            list,
            load: LoadState::default(),
            selected: 0,
            toggling: None,
        }
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    fn visible(&self) -> ListData {
        with_status(&self.list, &self.load, &TEXTS)
    }

    fn apply_toggle(&mut self, ticket: RefreshTicket, result: crate::error::Result<ListData>) {
        let toggled = self.toggling.take();
        let previous = self.selected;
        let Some(list) = self.load.finish(ticket, result, TOGGLE_ERROR) else {
            self.selected = nearest_interactive(&self.visible().rows, previous);
            return;
        };
        self.list = list;

        let rows = &self.list.rows;
        self.selected = toggled
            .as_deref()
            .and_then(|id| rows.iter().position(|row| row.id() == id))
            .unwrap_or_else(|| nearest_interactive(rows, previous));
        tracing::debug!(
            item = toggled.as_deref(),
            selected = self.selected,
            rows = ?labels(rows),
            "shopping toggle applied"
        );
    }
}

impl Screen for ShoppingScreen {
    fn name(&self) -> &'static str {
        "shopping-list"
    }

    fn on_enter(&mut self) -> Vec<Command> {
        tracing::info!(list = SHOPPING_LIST_ID, "enter list");
        let ticket = self.load.begin();
        vec![Command::Reload {
            list_id: SHOPPING_LIST_ID.to_string(),
            ticket,
        }]
    }

    fn on_exit(&mut self) -> Vec<Command> {
        self.load.invalidate();
        self.toggling = None;
        tracing::info!(list = SHOPPING_LIST_ID, "exit list");
        Vec::new()
    }

    fn on_input(&mut self, event: &CanonicalInputEvent) -> Vec<Command> {
        if event.kind == InputKind::DoubleClick {
            return vec![Command::Navigate(Route::Back)];
        }

        let visible = self.visible();
        let previous = self.selected;
        let outcome = resolve(&visible.rows, previous, event, SkipPolicy::NonInteractive);
        self.selected = outcome.next_index;

        if let Some(row) = visible.rows.get(self.selected) {
            tracing::debug!(
                event = %event.kind,
                index = self.selected,
                id = row.id(),
                label = row.label(),
                "shopping hover"
            );
        }

        if event.kind != InputKind::Click || outcome.suppressed {
            return Vec::new();
        }

        match visible.rows.get(self.selected) {
            Some(SelectableRow::Item { id, label, .. }) => {
                tracing::debug!(item = %id, label = %label, "shopping toggle requested");
                let ticket = self.load.begin_mutation();
                self.toggling = Some(id.clone());
                vec![Command::Toggle {
                    item_id: id.clone(),
                    ticket,
                }]
            }
            _ => Vec::new(),
        }
    }

    fn on_complete(&mut self, ticket: RefreshTicket, completion: Completion) -> Vec<Command> {
        match completion {
            Completion::Reload(result) => {
                if let Some(list) = self.load.finish(ticket, result, LOAD_ERROR) {
                    self.list = list;
                }
                let rows = self.visible().rows;
                self.selected = clamp_index(self.selected, rows.len());
            }
            Completion::Toggle(result) => self.apply_toggle(ticket, result),
        }
        Vec::new()
    }

    fn view_model(&self) -> ViewModel {
        let visible = self.visible();
        let selected = clamp_index(self.selected, visible.rows.len());
        ViewModel {
            title: visible.title.clone(),
            layout_mode: None,
            containers: vec![Container::List(ListContainer {
                id: LIST_ID.to_string(),
                title: visible.title,
                items: labels(&visible.rows),
                selected_index: selected,
                event_capture: true,
            })],
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::GlassError;
    use crate::input::RawBridgeEvent;
    use crate::services::data::{SHOPPING_DIVIDER_LABEL, default_dashboard};
    use crate::services::{DashboardData, DetailData, Direction, SHOPPING_DIVIDER_ID};

    struct NoData;

    #[async_trait::async_trait]
    impl DataService for NoData {
        fn dashboard(&self) -> DashboardData {
            default_dashboard()
        }

        async fn refresh_list(&self, list_id: &str) -> crate::error::Result<ListData> {
            Ok(self.list(list_id))
        }

        fn list(&self, list_id: &str) -> ListData {
            ListData::empty(list_id, "Shopping List")
        }

        async fn toggle_shopping_item(&self, _item_id: &str) -> crate::error::Result<ListData> {
            Ok(self.list(SHOPPING_LIST_ID))
        }

        fn detail(&self, _item_id: &str) -> DetailData {
            unreachable!("shopping never reads details")
        }

        fn adjacent_item_id(&self, _item_id: &str, _direction: Direction) -> Option<String> {
            None
        }
    }

    fn shopping(rows: Vec<SelectableRow>) -> ListData {
        ListData {
            id: SHOPPING_LIST_ID.to_string(),
            title: "Shopping List".to_string(),
            rows,
        }
    }

    fn open_and_done() -> ListData {
        shopping(vec![
            SelectableRow::item("bread", "[ ] bread"),
            SelectableRow::divider(SHOPPING_DIVIDER_ID, SHOPPING_DIVIDER_LABEL),
            SelectableRow::item("a", "[x] a"),
        ])
    }

    fn loaded(list: ListData) -> ShoppingScreen {
        let mut screen = ShoppingScreen::new(&NoData);
        let ticket = match screen.on_enter().as_slice() {
            [Command::Reload { ticket, .. }] => *ticket,
            other => panic!("expected one reload, got {other:?}"),
        };
        screen.on_complete(ticket, Completion::Reload(Ok(list)));
        screen
    }

    fn toggle_ticket(commands: &[Command]) -> RefreshTicket {
        match commands {
            [Command::Toggle { ticket, .. }] => *ticket,
            other => panic!("expected one toggle, got {other:?}"),
        }
    }

    #[test]
    fn test_payload_on_divider_lands_on_open_item() {
        let mut screen = loaded(open_and_done());
        screen.on_input(&CanonicalInputEvent::new(
            InputKind::SelectionChange,
            RawBridgeEvent::default().list(json!({"currentSelectItemIndex": 1})),
        ));
        assert_eq!(screen.selected_index(), 0);
    }

    #[test]
    fn test_down_onto_divider_stays_on_open_item() {
        let mut screen = loaded(open_and_done());
        screen.on_input(&CanonicalInputEvent::bare(InputKind::Down));
        assert_eq!(screen.selected_index(), 0);
    }

    #[test]
    fn test_click_by_title_toggles_item() {
        let mut screen = loaded(open_and_done());
        let commands = screen.on_input(&CanonicalInputEvent::new(
            InputKind::Click,
            RawBridgeEvent::default().list(json!({"currentSelectItemName": "A"})),
        ));
        assert_eq!(screen.selected_index(), 2);
        match commands.as_slice() {
            [Command::Toggle { item_id, .. }] => assert_eq!(item_id, "a"),
            other => panic!("expected one toggle, got {other:?}"),
        }
    }

    #[test]
    fn test_selection_follows_toggled_item() {
        let mut screen = loaded(open_and_done());
        let ticket = toggle_ticket(&screen.on_input(&CanonicalInputEvent::bare(InputKind::Click)));

        let reordered = shopping(vec![
            SelectableRow::divider(SHOPPING_DIVIDER_ID, SHOPPING_DIVIDER_LABEL),
            SelectableRow::item("a", "[x] a"),
            SelectableRow::item("bread", "[x] bread"),
        ]);
        screen.on_complete(ticket, Completion::Toggle(Ok(reordered)));

        assert_eq!(screen.selected_index(), 2);
        assert_eq!(screen.view_model().list().unwrap().items[2], "[x] bread");
    }

    #[test]
    fn test_failed_toggle_keeps_list_and_reports() {
        let mut screen = loaded(open_and_done());
        let ticket = toggle_ticket(&screen.on_input(&CanonicalInputEvent::bare(InputKind::Click)));
        screen.on_complete(
            ticket,
            Completion::Toggle(Err(GlassError::StorageWrite(
                "Shopping-Konfiguration konnte nicht gespeichert werden.".to_string(),
            ))),
        );

        let view = screen.view_model();
        assert_eq!(view.title, "Shopping List (letzter Stand)");
        assert_eq!(view.list().unwrap().items[0], "[ ] bread");
        assert_eq!(screen.selected_index(), 0);
    }

    #[test]
    fn test_toggle_supersedes_outstanding_reload() {
        let mut screen = loaded(open_and_done());
        let reload = match screen.on_enter().as_slice() {
            [Command::Reload { ticket, .. }] => *ticket,
            other => panic!("expected one reload, got {other:?}"),
        };
        let toggle = toggle_ticket(&screen.on_input(&CanonicalInputEvent::bare(InputKind::Click)));

        let toggled = shopping(vec![SelectableRow::item("bread", "[x] bread")]);
        screen.on_complete(toggle, Completion::Toggle(Ok(toggled)));
        screen.on_complete(reload, Completion::Reload(Ok(open_and_done())));

        let view = screen.view_model();
        assert_eq!(view.title, "Shopping List");
        assert_eq!(view.list().unwrap().items, vec!["[x] bread"]);
    }

    #[test]
    fn test_empty_list_shows_status_and_ignores_click() {
        let mut screen = loaded(shopping(Vec::new()));
        let view = screen.view_model();
        assert_eq!(
            view.list().unwrap().items,
            vec!["Keine Shopping-Eintraege vorhanden."]
        );
        assert!(screen.on_input(&CanonicalInputEvent::bare(InputKind::Click)).is_empty());
    }

    #[test]
    fn test_double_click_goes_back() {
        let mut screen = loaded(open_and_done());
        let commands = screen.on_input(&CanonicalInputEvent::bare(InputKind::DoubleClick));
        assert_eq!(commands, vec![Command::Navigate(Route::Back)]);
    }
}
