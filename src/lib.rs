#[macro_use]
mod macros;

pub mod app;
pub mod bridge;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod navigation;
pub mod paths;
pub mod refresh;
pub mod render;
pub mod screens;
pub mod selection;
pub mod services;
pub mod utils;

pub use app::App;
pub use bridge::{HostBridge, SimulatorBridge, TextUpdate};
pub use config::Config;
pub use error::{GlassError, Result};
pub use input::{CanonicalInputEvent, EventNormalizer, InputKind, RawBridgeEvent};
pub use refresh::{RefreshSequencer, RefreshTicket};
pub use render::{RenderPipeline, RenderReport, ViewModel};
pub use selection::{SelectableRow, SelectionOutcome, SkipPolicy, paginate, resolve};
pub use services::{AppDataService, DataService, ListData};
