//! Ordering guard for asynchronous list reloads
//!
//! Every reload captures a ticket when it starts. Its completion may only touch screen
//! state while that ticket is still the newest one; starting another reload or leaving
//! the screen invalidates all earlier tickets.

use std::fmt;

/// Captured sequence number of one reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn sequence(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RefreshTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Per-screen-instance reload sequencer.
#[derive(Debug, Default)]
pub struct RefreshSequencer {
    current: u64,
}

impl RefreshSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a reload. Any ticket handed out earlier becomes stale.
    pub fn start(&mut self) -> RefreshTicket {
        self.current += 1;
        RefreshTicket(self.current)
    }

    /// Invalidate every outstanding ticket (screen exit).
    pub fn invalidate(&mut self) {
        self.current += 1;
    }

    pub fn is_current(&self, ticket: RefreshTicket) -> bool {
        ticket.0 == self.current
    }

    /// Pass `outcome` through only when `ticket` is still current.
    pub fn accept<T>(&self, ticket: RefreshTicket, outcome: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(outcome)
        } else {
            tracing::debug!(
                ticket = ticket.0,
                current = self.current,
                "discarding stale reload"
            );
            None
        }
    }
}
