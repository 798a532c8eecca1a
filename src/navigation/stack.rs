//! Screen stack with enter/exit hooks

use super::screen::{Command, Screen};

/// Identity of one screen instance, stable for its lifetime on the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenId(u64);

/// A command together with the screen that issued it.
pub type Issued = (ScreenId, Command);

struct Entry {
    id: ScreenId,
    screen: Box<dyn Screen>,
}

#[derive(Default)]
pub struct ScreenStack {
    entries: Vec<Entry>,
    next_id: u64,
}

impl ScreenStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exit the current screen, then enter `screen` on top of it.
    pub fn push(&mut self, screen: Box<dyn Screen>) -> Vec<Issued> {
        let mut issued = Vec::new();
        if let Some(top) = self.entries.last_mut() {
            let covered = top.id;
            issued.extend(top.screen.on_exit().into_iter().map(|command| (covered, command)));
        }

        let id = ScreenId(self.next_id);
        self.next_id += 1;
        tracing::debug!(screen = screen.name(), depth = self.entries.len() + 1, "push");
        let mut entry = Entry { id, screen };
        issued.extend(entry.screen.on_enter().into_iter().map(|command| (id, command)));
        self.entries.push(entry);
        issued
    }

    /// Exit and drop the top screen, then re-enter the one below.
    ///
    /// The root screen is never popped; popping it is a no-op.
    pub fn pop(&mut self) -> Vec<Issued> {
        if self.entries.len() <= 1 {
            tracing::debug!("pop ignored at root screen");
            return Vec::new();
        }

        let mut issued = Vec::new();
        if let Some(mut top) = self.entries.pop() {
            let popped = top.id;
            issued.extend(top.screen.on_exit().into_iter().map(|command| (popped, command)));
            tracing::debug!(screen = top.screen.name(), depth = self.entries.len(), "pop");
        }
        if let Some(uncovered) = self.entries.last_mut() {
            let id = uncovered.id;
            issued.extend(uncovered.screen.on_enter().into_iter().map(|command| (id, command)));
        }
        issued
    }

    pub fn current(&self) -> Option<&dyn Screen> {
        self.entries.last().map(|entry| entry.screen.as_ref())
    }

    pub fn current_mut(&mut self) -> Option<(ScreenId, &mut (dyn Screen + 'static))> {
        self.entries
            .last_mut()
            .map(|entry| (entry.id, entry.screen.as_mut()))
    }

    pub fn current_id(&self) -> Option<ScreenId> {
        self.entries.last().map(|entry| entry.id)
    }

    /// A screen anywhere on the stack, covered or not.
    pub fn get_mut(&mut self, id: ScreenId) -> Option<&mut (dyn Screen + 'static)> {
        self.entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .map(|entry| entry.screen.as_mut())
    }
}
