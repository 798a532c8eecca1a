mod config;
mod normalize;
mod run;

pub use config::{cmd_config_set, cmd_config_show};
pub use normalize::{cmd_normalize, describe_event};
pub use run::{RunOptions, cmd_run};

use serde_json::Value;

use crate::error::Result;

/// Output of a command in both renderings; `--json` picks one.
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn render(&self, json: bool) -> Result<String> {
        match (&self.text, json) {
            (Some(text), false) => Ok(text.clone()),
            _ => Ok(serde_json::to_string_pretty(&self.json)?),
        }
    }

    pub fn print(self, json: bool) -> Result<()> {
        println!("{}", self.render(json)?);
        Ok(())
    }
}
