//! The event loop: raw input in, screen commands out, one render per batch
//!
//! Everything a screen wants done is a [`Command`]. Reloads and toggles run as
//! spawned tasks and come back as completions tagged with the screen that asked
//! and the ticket it issued, so a screen only ever sees results it can still
//! judge as fresh or stale.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior};

use crate::bridge::HostBridge;
use crate::config::Config;
use crate::input::{CanonicalInputEvent, EventNormalizer, RawBridgeEvent};
use crate::navigation::{Command, Completion, Issued, Route, ScreenId, ScreenStack};
use crate::refresh::RefreshTicket;
use crate::render::{RenderPipeline, RenderReport};
use crate::screens::ScreenFactory;
use crate::services::DataService;

/// Result of a spawned reload or toggle, addressed to the screen that issued it.
#[derive(Debug)]
pub struct CompletionMessage {
    pub screen: ScreenId,
    pub ticket: RefreshTicket,
    pub completion: Completion,
}

/// Periodic tick owned by one screen.
struct Ticker {
    screen: ScreenId,
    interval: Interval,
}

enum Wakeup {
    Input(Option<RawBridgeEvent>),
    Completion(CompletionMessage),
    Tick,
}

pub struct App {
    data: Arc<dyn DataService>,
    factory: ScreenFactory,
    stack: ScreenStack,
    pipeline: RenderPipeline,
    normalizer: EventNormalizer,
    completions_tx: mpsc::UnboundedSender<CompletionMessage>,
    completions_rx: mpsc::UnboundedReceiver<CompletionMessage>,
    in_flight: usize,
    ticker: Option<Ticker>,
    autoscroll_interval: Duration,
    dirty: bool,
    last_render: Option<RenderReport>,
}

impl App {
    pub fn new(bridge: Arc<dyn HostBridge>, data: Arc<dyn DataService>, config: &Config) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            factory: ScreenFactory::new(data.clone(), config.rows_per_page),
            data,
            stack: ScreenStack::new(),
            pipeline: RenderPipeline::new(bridge),
            normalizer: EventNormalizer::default(),
            completions_tx,
            completions_rx,
            in_flight: 0,
            ticker: None,
            autoscroll_interval: config.autoscroll_interval(),
            dirty: false,
            last_render: None,
        }
    }

    /// Name of the screen on top of the stack.
    pub fn current_screen(&self) -> Option<&'static str> {
        self.stack.current().map(|screen| screen.name())
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn pipeline(&self) -> &RenderPipeline {
        &self.pipeline
    }

    pub fn last_render(&self) -> Option<RenderReport> {
        self.last_render
    }

    /// Reloads and toggles not yet delivered.
    pub fn pending_tasks(&self) -> usize {
        self.in_flight
    }

    pub fn ticker_active(&self) -> bool {
        self.ticker.is_some()
    }

    /// Enter the dashboard and draw the first frame.
    pub async fn start(&mut self) {
        let issued = self.stack.push(self.factory.dashboard());
        self.execute(issued);
        self.dirty = true;
        self.flush().await;
    }

    /// Run until the input stream closes.
    pub async fn run(mut self, mut input: mpsc::Receiver<RawBridgeEvent>) {
        self.start().await;

        loop {
            let wakeup = tokio::select! {
                raw = input.recv() => Wakeup::Input(raw),
                Some(message) = self.completions_rx.recv() => Wakeup::Completion(message),
                _ = next_tick(&mut self.ticker) => Wakeup::Tick,
            };

            match wakeup {
                Wakeup::Input(Some(raw)) => self.apply_raw(raw),
                Wakeup::Input(None) => break,
                Wakeup::Completion(message) => self.apply_completion(message),
                Wakeup::Tick => self.apply_tick(),
            }
            self.flush().await;
        }

        tracing::info!(depth = self.stack.len(), "input closed, stopping");
    }

    /// Normalize and dispatch one raw event, then render.
    pub async fn handle_raw(&mut self, raw: RawBridgeEvent) {
        self.apply_raw(raw);
        self.flush().await;
    }

    /// Dispatch one canonical event, then render.
    pub async fn handle_input(&mut self, event: CanonicalInputEvent) {
        self.apply_input(event);
        self.flush().await;
    }

    /// Deliver one timer tick, then render.
    pub async fn handle_tick(&mut self) {
        self.apply_tick();
        self.flush().await;
    }

    /// Wait for every spawned reload and toggle and deliver it.
    pub async fn settle(&mut self) {
        while self.in_flight > 0 {
            let Some(message) = self.completions_rx.recv().await else {
                break;
            };
            self.apply_completion(message);
            self.flush().await;
        }
    }

    fn apply_raw(&mut self, raw: RawBridgeEvent) {
        match self.normalizer.normalize(raw) {
            Some(event) => self.apply_input(event),
            None => tracing::trace!("raw event dropped"),
        }
    }

    fn apply_input(&mut self, event: CanonicalInputEvent) {
        let Some((id, screen)) = self.stack.current_mut() else {
            tracing::warn!(event = %event.kind, "no active screen, input dropped");
            return;
        };
        tracing::debug!(event = %event.kind, screen = screen.name(), "input");
        let commands = screen.on_input(&event);
        self.dirty = true;
        self.execute(commands.into_iter().map(|command| (id, command)).collect());
    }

    fn apply_completion(&mut self, message: CompletionMessage) {
        self.in_flight = self.in_flight.saturating_sub(1);
        let CompletionMessage {
            screen: id,
            ticket,
            completion,
        } = message;

        let Some(screen) = self.stack.get_mut(id) else {
            tracing::debug!(ticket = ticket.sequence(), "completion for a closed screen");
            return;
        };
        let commands = screen.on_complete(ticket, completion);
        if self.stack.current_id() == Some(id) {
            self.dirty = true;
        }
        self.execute(commands.into_iter().map(|command| (id, command)).collect());
    }

    fn apply_tick(&mut self) {
        let Some(owner) = self.ticker.as_ref().map(|ticker| ticker.screen) else {
            return;
        };
        if self.stack.current_id() != Some(owner) {
            tracing::debug!("tick for a covered screen ignored");
            return;
        }
        let Some((id, screen)) = self.stack.current_mut() else {
            return;
        };
        let commands = screen.on_tick();
        self.dirty = true;
        self.execute(commands.into_iter().map(|command| (id, command)).collect());
    }

    fn execute(&mut self, issued: Vec<Issued>) {
        let mut queue: VecDeque<Issued> = issued.into();
        while let Some((id, command)) = queue.pop_front() {
            match command {
                Command::Navigate(Route::Back) => {
                    queue.extend(self.stack.pop());
                    self.dirty = true;
                }
                Command::Navigate(route) => match self.factory.build(&route) {
                    Some(screen) => {
                        tracing::info!(route = ?route, "navigate");
                        queue.extend(self.stack.push(screen));
                        self.dirty = true;
                    }
                    None => tracing::warn!(route = ?route, "no screen for route"),
                },
                Command::Reload { list_id, ticket } => self.spawn_reload(id, list_id, ticket),
                Command::Toggle { item_id, ticket } => self.spawn_toggle(id, item_id, ticket),
                Command::StartTicker => {
                    let period = self.autoscroll_interval;
                    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
                    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                    self.ticker = Some(Ticker {
                        screen: id,
                        interval,
                    });
                    tracing::debug!(period_ms = period.as_millis() as u64, "ticker started");
                }
                Command::StopTicker => {
                    if self.ticker.as_ref().is_some_and(|ticker| ticker.screen == id) {
                        self.ticker = None;
                        tracing::debug!("ticker stopped");
                    }
                }
            }
        }
    }

    fn spawn_reload(&mut self, screen: ScreenId, list_id: String, ticket: RefreshTicket) {
        let data = self.data.clone();
        let tx = self.completions_tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let result = data.refresh_list(&list_id).await;
            if let Err(e) = &result {
                tracing::warn!(list = %list_id, error = %e, "reload failed");
            }
            let _ = tx.send(CompletionMessage {
                screen,
                ticket,
                completion: Completion::Reload(result),
            });
        });
    }

    fn spawn_toggle(&mut self, screen: ScreenId, item_id: String, ticket: RefreshTicket) {
        let data = self.data.clone();
        let tx = self.completions_tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let result = data.toggle_shopping_item(&item_id).await;
            if let Err(e) = &result {
                tracing::warn!(item = %item_id, error = %e, "toggle failed");
            }
            let _ = tx.send(CompletionMessage {
                screen,
                ticket,
                completion: Completion::Toggle(result),
            });
        });
    }

    /// Deliver completions that are already waiting, then render once if anything changed.
    async fn flush(&mut self) {
        while let Ok(message) = self.completions_rx.try_recv() {
            self.apply_completion(message);
        }
        if !self.dirty {
            return;
        }
        self.dirty = false;

        let Some(screen) = self.stack.current() else {
            return;
        };
        let view = screen.view_model();
        let report = self.pipeline.render(&view).await;
        if !report.ok {
            tracing::warn!(screen = screen.name(), path = ?report.path, "render failed");
        }
        self.last_render = Some(report);
    }
}

async fn next_tick(ticker: &mut Option<Ticker>) {
    match ticker {
        Some(ticker) => {
            ticker.interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;
    use serde_json::json;

    use super::*;
    use crate::error::Result;
    use crate::input::InputKind;
    use crate::render::PageLayout;
    use crate::selection::SelectableRow;
    use crate::services::data::default_dashboard;
    use crate::services::{DashboardData, DetailData, Direction, ListData, SHOPPING_LIST_ID};

    #[derive(Default)]
    struct Calls(Mutex<Vec<&'static str>>);

    #[async_trait::async_trait]
    impl HostBridge for Calls {
        async fn create_surface(&self, _layout: &PageLayout) -> Result<bool> {
            self.0.lock().push("create");
            Ok(true)
        }

        async fn rebuild_surface(&self, _layout: &PageLayout) -> Result<bool> {
            self.0.lock().push("rebuild");
            Ok(true)
        }

        async fn update_text(&self, _update: &crate::bridge::TextUpdate) -> Result<bool> {
            self.0.lock().push("text");
            Ok(true)
        }

        async fn get_storage(&self, _key: &str) -> Result<String> {
            Ok(String::new())
        }

        async fn set_storage(&self, _key: &str, _value: &str) -> Result<bool> {
            Ok(true)
        }
    }

    struct TwoItems;

    #[async_trait::async_trait]
    impl DataService for TwoItems {
        fn dashboard(&self) -> DashboardData {
            default_dashboard()
        }

        async fn refresh_list(&self, list_id: &str) -> Result<ListData> {
            Ok(self.list(list_id))
        }

        fn list(&self, list_id: &str) -> ListData {
            ListData {
                id: list_id.to_string(),
                title: "RSS-Feeds".to_string(),
                rows: vec![
                    SelectableRow::item("a", "Eintrag A"),
                    SelectableRow::item("b", "Eintrag B"),
                ],
            }
        }

        async fn toggle_shopping_item(&self, _item_id: &str) -> Result<ListData> {
            Ok(self.list(SHOPPING_LIST_ID))
        }

        fn detail(&self, item_id: &str) -> DetailData {
            DetailData {
                id: item_id.to_string(),
                title: format!("Titel {item_id}"),
                description: "Text".to_string(),
                pages: vec!["Eins".to_string(), "Zwei".to_string()],
                source: "Quelle".to_string(),
                link: None,
                pub_date_text: None,
            }
        }

        fn adjacent_item_id(&self, _item_id: &str, _direction: Direction) -> Option<String> {
            None
        }
    }

    fn app() -> (App, Arc<Calls>) {
        let calls = Arc::new(Calls::default());
        let app = App::new(calls.clone(), Arc::new(TwoItems), &Config::default());
        (app, calls)
    }

    fn click() -> CanonicalInputEvent {
        CanonicalInputEvent::bare(InputKind::Click)
    }

    #[tokio::test]
    async fn test_start_renders_dashboard_once() {
        let (mut app, calls) = app();
        app.start().await;
        assert_eq!(app.current_screen(), Some("dashboard"));
        assert_eq!(*calls.0.lock(), vec!["create"]);
    }

    #[tokio::test]
    async fn test_navigate_to_detail_and_back() {
        let (mut app, _calls) = app();
        app.start().await;

        app.handle_input(click()).await;
        assert_eq!(app.current_screen(), Some("rss-list"));
        app.settle().await;
        assert_eq!(app.pending_tasks(), 0);

        app.handle_input(click()).await;
        assert_eq!(app.current_screen(), Some("rss-detail"));
        assert_eq!(app.depth(), 3);

        app.handle_input(CanonicalInputEvent::bare(InputKind::DoubleClick)).await;
        app.handle_input(CanonicalInputEvent::bare(InputKind::DoubleClick)).await;
        assert_eq!(app.current_screen(), Some("dashboard"));

        // the root screen stays
        app.handle_input(CanonicalInputEvent::bare(InputKind::DoubleClick)).await;
        assert_eq!(app.depth(), 1);
    }

    #[tokio::test]
    async fn test_unmapped_raw_event_is_dropped_without_render() {
        let (mut app, calls) = app();
        app.start().await;
        app.handle_raw(RawBridgeEvent::from_json(json!({"sysEvent": {"eventType": 99}})))
            .await;
        assert_eq!(calls.0.lock().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_detail_ticker_lifecycle() {
        let (mut app, _calls) = app();
        app.start().await;
        app.handle_input(click()).await;
        app.settle().await;
        app.handle_input(click()).await;
        assert_eq!(app.current_screen(), Some("rss-detail"));

        app.handle_input(click()).await;
        assert!(app.ticker_active());
        app.handle_tick().await;

        app.handle_input(CanonicalInputEvent::bare(InputKind::DoubleClick)).await;
        assert!(!app.ticker_active());
    }
}
