//! Settings file error type wrapping IO and JSON errors.

use std::path::PathBuf;

use panelhub_domain::error::PanelHubError;

/// Errors originating from the settings file.
#[derive(Debug, thiserror::Error)]
pub enum SettingsFileError {
    /// Reading or writing the file failed.
    #[error("cannot access settings file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file does not hold a valid settings document.
    #[error("invalid settings file {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl From<SettingsFileError> for PanelHubError {
    fn from(err: SettingsFileError) -> Self {
        Self::Storage(Box::new(err))
    }
}
