//! Row lists, selection resolution and pagination shared by list screens

pub mod pagination;
pub mod resolver;
pub mod rows;

pub use pagination::{MAX_ROWS_PER_PAGE, Page, PaginationState, paginate};
pub use resolver::{SelectionOutcome, SkipPolicy, nearest_interactive, resolve};
pub use rows::{ControlKind, SelectableRow};
