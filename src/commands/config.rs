//! Configuration commands.
//!
//! - `config show`: Display the effective configuration
//! - `config set`: Change one value and save

use std::path::PathBuf;

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::config::Config;
use crate::error::{GlassError, Result};
use crate::paths::config_path;

const KEYS: [&str; 5] = [
    "log_filter",
    "rows_per_page",
    "autoscroll_interval_ms",
    "feed_timeout_secs",
    "storage_file",
];

/// Show current configuration
pub fn cmd_config_show(json: bool) -> Result<()> {
    let config = Config::load()?;
    show_output(&config).print(json)
}

fn show_output(config: &Config) -> CommandOutput {
    let json_output = json!({
        "log_filter": config.log_filter,
        "rows_per_page": config.rows_per_page,
        "autoscroll_interval_ms": config.autoscroll_interval_ms,
        "feed_timeout_secs": config.feed_timeout_secs,
        "storage_file": config.storage_path().to_string_lossy(),
        "config_file": config_path().to_string_lossy(),
    });

    let mut text = String::new();
    text.push_str(&format!("{}\n\n", "Configuration:".cyan().bold()));

    match &config.log_filter {
        Some(filter) => text.push_str(&format!("{}: {filter}\n", "log_filter".cyan())),
        None => text.push_str(&format!(
            "{}: {}\n",
            "log_filter".cyan(),
            "not set (info)".dimmed()
        )),
    }
    text.push_str(&format!("{}: {}\n", "rows_per_page".cyan(), config.rows_per_page));
    text.push_str(&format!(
        "{}: {}\n",
        "autoscroll_interval_ms".cyan(),
        config.autoscroll_interval_ms
    ));
    text.push_str(&format!(
        "{}: {}\n",
        "feed_timeout_secs".cyan(),
        config.feed_timeout_secs
    ));
    text.push_str(&format!(
        "{}: {}\n",
        "storage_file".cyan(),
        config.storage_path().display()
    ));

    text.push('\n');
    text.push_str(&format!(
        "{}",
        format!("Config file: {}", config_path().display()).dimmed()
    ));

    CommandOutput::new(json_output).with_text(text)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?;
    apply(&mut config, key, value)?;
    config.save()?;

    println!("Set {} = {}", key.cyan(), value);
    Ok(())
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "log_filter" => {
            config.log_filter = (!value.trim().is_empty()).then(|| value.trim().to_string());
        }
        "rows_per_page" => config.rows_per_page = parse_number(key, value)?,
        "autoscroll_interval_ms" => config.autoscroll_interval_ms = parse_number(key, value)?,
        "feed_timeout_secs" => config.feed_timeout_secs = parse_number(key, value)?,
        "storage_file" => {
            config.storage_file = (!value.trim().is_empty()).then(|| PathBuf::from(value.trim()));
        }
        _ => {
            return Err(GlassError::Config(format!(
                "unknown config key '{key}'. Valid keys: {}",
                KEYS.join(", ")
            )));
        }
    }
    config.validate()
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| GlassError::Config(format!("{key} expects a number, got '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_apply_numbers_and_paths() {
        let mut config = Config::default();
        apply(&mut config, "rows_per_page", " 12 ").unwrap();
        apply(&mut config, "storage_file", "/tmp/s.json").unwrap();
        apply(&mut config, "log_filter", "glassdeck=debug").unwrap();
        assert_eq!(config.rows_per_page, 12);
        assert_eq!(config.storage_file, Some(PathBuf::from("/tmp/s.json")));
        assert_eq!(config.log_filter.as_deref(), Some("glassdeck=debug"));

        apply(&mut config, "log_filter", "").unwrap();
        assert!(config.log_filter.is_none());
    }

    #[test]
    fn test_apply_rejects_bad_input() {
        let mut config = Config::default();
        assert!(matches!(
            apply(&mut config, "rows-per-page", "3"),
            Err(GlassError::Config(_))
        ));
        assert!(apply(&mut config, "feed_timeout_secs", "soon").is_err());
        assert!(apply(&mut config, "rows_per_page", "1").is_err());
    }

    #[test]
    #[serial]
    fn test_show_output_json() {
        let dir = TempDir::new().unwrap();
        // SAFETY: We use #[serial] to ensure single-threaded access
        unsafe { std::env::set_var("GLASSDECK_ROOT", dir.path()) };

        let rendered = show_output(&Config::default()).render(true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["rows_per_page"], 20);
        assert_eq!(value["autoscroll_interval_ms"], 2500);
        assert!(value["log_filter"].is_null());
        assert!(value["storage_file"].as_str().unwrap().ends_with("storage.json"));

        unsafe { std::env::remove_var("GLASSDECK_ROOT") };
    }

    #[test]
    #[serial]
    fn test_config_set_persists() {
        let dir = TempDir::new().unwrap();
        // SAFETY: We use #[serial] to ensure single-threaded access
        unsafe { std::env::set_var("GLASSDECK_ROOT", dir.path()) };

        cmd_config_set("autoscroll_interval_ms", "4000").unwrap();
        assert_eq!(Config::load().unwrap().autoscroll_interval_ms, 4000);

        unsafe { std::env::remove_var("GLASSDECK_ROOT") };
    }
}
