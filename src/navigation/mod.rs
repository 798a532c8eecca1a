//! Screens, the commands they issue, and the stack that holds them

pub mod screen;
pub mod stack;

pub use screen::{Command, Completion, Route, Screen};
pub use stack::{Issued, ScreenId, ScreenStack};
