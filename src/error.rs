use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GlassError {
    #[error("bridge call '{0}' failed: {1}")]
    Bridge(&'static str, String),

    #[error("storage read failed: {0}")]
    StorageRead(String),

    /// A rejected write is a hard failure for the mutating operation.
    #[error("{0}")]
    StorageWrite(String),

    #[error("{0}")]
    Feed(String),

    #[error("failed to {operation} {}: {source}", path.display())]
    FileIo {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, GlassError>;

impl GlassError {
    /// Message shown to the user inside a status row or list title.
    pub fn user_message(&self) -> String {
        match self {
            GlassError::Feed(message) | GlassError::StorageWrite(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_unwraps_plain_variants() {
        let err = GlassError::Feed("RSS-Feeds konnten nicht geladen werden.".to_string());
        assert_eq!(err.user_message(), "RSS-Feeds konnten nicht geladen werden.");
    }

    #[test]
    fn test_user_message_formats_structured_variants() {
        let err = GlassError::Config("rows_per_page must be at least 2, got 1".to_string());
        assert_eq!(
            err.user_message(),
            "configuration error: rows_per_page must be at least 2, got 1"
        );
    }
}
