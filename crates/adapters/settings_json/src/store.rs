//! JSON file implementation of [`SettingsStore`].

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use panelhub_app::ports::SettingsStore;
use panelhub_domain::error::PanelHubError;
use panelhub_domain::settings::UserSettings;

use crate::error::SettingsFileError;

/// File-backed settings store.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SettingsFileError {
        SettingsFileError::Io {
            path: self.path.clone(),
            source,
        }
    }

    async fn read(&self) -> Result<UserSettings, SettingsFileError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no settings file yet, starting empty");
                return Ok(UserSettings::default());
            }
            Err(err) => return Err(self.io_error(err)),
        };
        serde_json::from_slice(&bytes).map_err(|source| SettingsFileError::Json {
            path: self.path.clone(),
            source,
        })
    }

    async fn write(&self, settings: &UserSettings) -> Result<(), SettingsFileError> {
        let json = serde_json::to_vec_pretty(settings).map_err(|source| SettingsFileError::Json {
            path: self.path.clone(),
            source,
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| self.io_error(err))?;
        }
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, json)
            .await
            .map_err(|err| self.io_error(err))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|err| self.io_error(err))?;
        tracing::debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

impl SettingsStore for JsonSettingsStore {
    async fn load(&self) -> Result<UserSettings, PanelHubError> {
        Ok(self.read().await?)
    }

    async fn save(&self, settings: &UserSettings) -> Result<(), PanelHubError> {
        Ok(self.write(settings).await?)
    }
}
