//! Settings store port: persistence for the user settings document.

use std::future::Future;

use panelhub_domain::error::PanelHubError;
use panelhub_domain::settings::UserSettings;

/// Loads and saves the whole [`UserSettings`] document.
pub trait SettingsStore {
    /// Load the stored settings, or defaults when nothing was stored yet.
    fn load(&self) -> impl Future<Output = Result<UserSettings, PanelHubError>> + Send;

    /// Replace the stored settings.
    fn save(
        &self,
        settings: &UserSettings,
    ) -> impl Future<Output = Result<(), PanelHubError>> + Send;
}
