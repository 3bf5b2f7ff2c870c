//! Settings service: the shared handle on the user settings document.
//!
//! Every consumer (the schedule timer, the HTTP API) reads and edits settings
//! through one [`SettingsService`] instance instead of a global. Mutations are
//! applied to a draft, persisted, and only then made visible; a failed
//! validation or a failed save leaves the in-memory settings untouched.

use std::sync::Arc;

use panelhub_domain::device::{Device, OperationMode};
use panelhub_domain::error::{NotFoundError, PanelHubError};
use panelhub_domain::schedule::Schedule;
use panelhub_domain::settings::{Location, SunTimes, UserSettings};
use tokio::sync::RwLock;

use crate::ports::SettingsStore;

/// Application service for reading and editing user settings.
pub struct SettingsService<S> {
    store: Arc<S>,
    settings: Arc<RwLock<UserSettings>>,
}

impl<S> Clone for SettingsService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<S: SettingsStore + Send + Sync> SettingsService<S> {
    /// Load settings from `store` and wrap them in a shared handle.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the store cannot be read.
    pub async fn load(store: S) -> Result<Self, PanelHubError> {
        let settings = store.load().await?;
        tracing::info!(devices = settings.devices.len(), "settings loaded");
        Ok(Self::with_settings(store, settings))
    }

    /// Wrap already loaded settings.
    pub fn with_settings(store: S, settings: UserSettings) -> Self {
        Self {
            store: Arc::new(store),
            settings: Arc::new(RwLock::new(settings)),
        }
    }

    /// A copy of the whole document.
    pub async fn snapshot(&self) -> UserSettings {
        self.settings.read().await.clone()
    }

    pub async fn devices(&self) -> Vec<Device> {
        self.settings.read().await.devices.clone()
    }

    pub async fn device_addresses(&self) -> Vec<String> {
        self.settings
            .read()
            .await
            .devices
            .iter()
            .map(|device| device.address.clone())
            .collect()
    }

    /// Look up a device by address.
    ///
    /// # Errors
    ///
    /// Returns [`PanelHubError::NotFound`] when no device has `address`.
    pub async fn device(&self, address: &str) -> Result<Device, PanelHubError> {
        self.settings
            .read()
            .await
            .device(address)
            .cloned()
            .ok_or_else(|| {
                NotFoundError {
                    entity: "Device",
                    id: address.to_string(),
                }
                .into()
            })
    }

    pub async fn active_device(&self) -> Option<Device> {
        self.settings.read().await.active_device().cloned()
    }

    /// Register a new device.
    ///
    /// # Errors
    ///
    /// Returns [`PanelHubError::Validation`] if the device is invalid or
    /// already registered, or a storage error from the store.
    #[tracing::instrument(skip(self, device), fields(address = %device.address))]
    pub async fn add_device(&self, device: Device) -> Result<Device, PanelHubError> {
        let address = device.address.clone();
        self.mutate(|settings| {
            settings.add_device(device)?;
            Ok(settings.device_mut(&address)?.clone())
        })
        .await
    }

    /// Select the device edited by default.
    ///
    /// # Errors
    ///
    /// Returns [`PanelHubError::NotFound`] for an unknown address, or a
    /// storage error from the store.
    #[tracing::instrument(skip(self))]
    pub async fn select_device(&self, address: &str) -> Result<(), PanelHubError> {
        self.mutate(|settings| settings.select_device(address))
            .await
    }

    /// Add a schedule to a device; it becomes the active schedule.
    ///
    /// # Errors
    ///
    /// Returns [`PanelHubError::NotFound`] for an unknown device,
    /// [`PanelHubError::Validation`] for an invalid or duplicate schedule,
    /// or a storage error from the store.
    #[tracing::instrument(skip(self, schedule), fields(schedule = %schedule.name))]
    pub async fn add_schedule(
        &self,
        address: &str,
        mut schedule: Schedule,
    ) -> Result<(), PanelHubError> {
        self.mutate(|settings| {
            settings.sync_sun_triggers(&mut schedule);
            settings.device_mut(address)?.add_schedule(schedule)
        })
        .await
    }

    /// Replace the schedule called `name` on a device.
    ///
    /// # Errors
    ///
    /// Returns [`PanelHubError::NotFound`] for an unknown device or schedule,
    /// [`PanelHubError::Validation`] for an invalid replacement, or a
    /// storage error from the store.
    #[tracing::instrument(skip(self, schedule))]
    pub async fn update_schedule(
        &self,
        address: &str,
        name: &str,
        mut schedule: Schedule,
    ) -> Result<(), PanelHubError> {
        self.mutate(|settings| {
            settings.sync_sun_triggers(&mut schedule);
            settings
                .device_mut(address)?
                .update_schedule(name, schedule)
        })
        .await
    }

    /// Make the schedule called `name` the active one.
    ///
    /// # Errors
    ///
    /// Returns [`PanelHubError::NotFound`] for an unknown device or schedule,
    /// or a storage error from the store.
    #[tracing::instrument(skip(self))]
    pub async fn activate_schedule(&self, address: &str, name: &str) -> Result<(), PanelHubError> {
        self.mutate(|settings| settings.device_mut(address)?.activate_schedule(name))
            .await
    }

    /// Remove the schedule called `name` and return it.
    ///
    /// # Errors
    ///
    /// Returns [`PanelHubError::NotFound`] for an unknown device or schedule,
    /// or a storage error from the store.
    #[tracing::instrument(skip(self))]
    pub async fn delete_schedule(
        &self,
        address: &str,
        name: &str,
    ) -> Result<Schedule, PanelHubError> {
        self.mutate(|settings| settings.device_mut(address)?.delete_schedule(name))
            .await
    }

    /// Switch a device between schedule control and manual control.
    ///
    /// # Errors
    ///
    /// Returns [`PanelHubError::NotFound`] for an unknown device, or a
    /// storage error from the store.
    #[tracing::instrument(skip(self))]
    pub async fn set_operation_mode(
        &self,
        address: &str,
        mode: OperationMode,
    ) -> Result<(), PanelHubError> {
        self.mutate(|settings| {
            settings.device_mut(address)?.operation_mode = mode;
            Ok(())
        })
        .await
    }

    /// Put every device back under schedule control.
    ///
    /// # Errors
    ///
    /// Returns a storage error from the store.
    #[tracing::instrument(skip(self))]
    pub async fn reset_operation_modes(&self) -> Result<(), PanelHubError> {
        self.mutate(|settings| {
            settings.reset_operation_modes();
            Ok(())
        })
        .await
    }

    /// Store new sun times and move every sun-bound trigger onto them.
    ///
    /// A rewrite can land a sun trigger on the same minute as another trigger
    /// of its program. The rewrite is kept and a warning is logged; the
    /// resolver then picks one of the two.
    ///
    /// # Errors
    ///
    /// Returns [`PanelHubError::Validation`] for invalid times, or a storage
    /// error from the store.
    #[tracing::instrument(skip(self))]
    pub async fn update_sunrise_sunset(&self, sun_times: SunTimes) -> Result<usize, PanelHubError> {
        let rewritten = self
            .mutate(|settings| {
                let rewritten = settings.update_sunrise_sunset(sun_times)?;
                for device in &settings.devices {
                    for schedule in &device.schedules {
                        if schedule.programs.iter().any(|p| p.has_time_collision()) {
                            tracing::warn!(
                                address = %device.address,
                                schedule = %schedule.name,
                                "sun time rewrite made two triggers share a time"
                            );
                        }
                    }
                }
                Ok(rewritten)
            })
            .await?;
        tracing::info!(rewritten, "sun-bound triggers updated");
        Ok(rewritten)
    }

    /// Store the location sun times are computed for.
    ///
    /// # Errors
    ///
    /// Returns [`PanelHubError::Validation`] for coordinates off the globe,
    /// or a storage error from the store.
    #[tracing::instrument(skip(self))]
    pub async fn set_location(&self, location: Location) -> Result<(), PanelHubError> {
        location.validate()?;
        self.mutate(|settings| {
            settings.location = Some(location);
            Ok(())
        })
        .await
    }

    async fn mutate<T>(
        &self,
        change: impl FnOnce(&mut UserSettings) -> Result<T, PanelHubError>,
    ) -> Result<T, PanelHubError> {
        let mut current = self.settings.write().await;
        let mut draft = current.clone();
        let value = change(&mut draft)?;
        self.store.save(&draft).await?;
        *current = draft;
        Ok(value)
    }
}
