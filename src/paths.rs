use std::path::PathBuf;

pub const ROOT_ENV: &str = "GLASSDECK_ROOT";
pub const DEFAULT_ROOT: &str = ".glassdeck";

/// Returns the runtime's state directory.
///
/// Resolution order:
/// 1. `GLASSDECK_ROOT` environment variable (if set)
/// 2. `.glassdeck` in the current directory
pub fn glassdeck_root() -> PathBuf {
    if let Ok(root) = std::env::var(ROOT_ENV) {
        PathBuf::from(root)
    } else {
        PathBuf::from(DEFAULT_ROOT)
    }
}

/// Returns the path to the configuration file.
pub fn config_path() -> PathBuf {
    glassdeck_root().join("config.yaml")
}
