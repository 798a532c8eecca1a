pub mod layout;
pub mod pipeline;
pub mod view_model;

pub use layout::{PageLayout, build_layout};
pub use pipeline::{RenderPath, RenderPipeline, RenderReport, RenderState};
pub use view_model::{Container, LayoutMode, ListContainer, TextContainer, ViewModel};
