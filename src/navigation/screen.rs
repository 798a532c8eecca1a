//! The screen contract

use crate::error::Result;
use crate::input::CanonicalInputEvent;
use crate::refresh::RefreshTicket;
use crate::render::ViewModel;
use crate::services::ListData;

/// Navigation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    List(String),
    Detail(String),
    Back,
}

/// Work a screen asks the app to carry out on its behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Navigate(Route),
    /// Reload a list; the result comes back through `on_complete` with `ticket`.
    Reload { list_id: String, ticket: RefreshTicket },
    /// Flip a shopping item; the result comes back through `on_complete`.
    Toggle { item_id: String, ticket: RefreshTicket },
    StartTicker,
    StopTicker,
}

/// Result of an async command, delivered to the screen that issued it.
#[derive(Debug)]
pub enum Completion {
    Reload(Result<ListData>),
    Toggle(Result<ListData>),
}

/// A screen on the navigation stack.
///
/// Screens own their state and never call the host or do I/O themselves. Every
/// hook may return commands; the app renders the current screen after each hook.
pub trait Screen: Send {
    fn name(&self) -> &'static str;

    fn on_enter(&mut self) -> Vec<Command>;

    fn on_exit(&mut self) -> Vec<Command> {
        Vec::new()
    }

    fn on_input(&mut self, event: &CanonicalInputEvent) -> Vec<Command>;

    fn on_tick(&mut self) -> Vec<Command> {
        Vec::new()
    }

    fn on_complete(&mut self, _ticket: RefreshTicket, _completion: Completion) -> Vec<Command> {
        Vec::new()
    }

    fn view_model(&self) -> ViewModel;
}
