//! User settings: every known device plus location and sun times.
//!
//! This is the aggregate persisted by the settings store. Sunrise and sunset
//! times are computed elsewhere (from the stored location) and pushed in via
//! [`UserSettings::update_sunrise_sunset`], which rewrites every sun-bound
//! trigger so the resolver never works against stale times.

use serde::{Deserialize, Serialize};

use crate::device::{Device, OperationMode};
use crate::error::{NotFoundError, PanelHubError, ValidationError};
use crate::schedule::{Schedule, Trigger, TriggerType};
use crate::time::is_valid_time;

/// Sunrise and sunset as local times of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SunTimes {
    pub sunrise_hour: u8,
    pub sunrise_minute: u8,
    pub sunset_hour: u8,
    pub sunset_minute: u8,
}

impl SunTimes {
    /// Check both times are valid times of day.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTime`] for the first invalid time.
    pub fn validate(&self) -> Result<(), PanelHubError> {
        for (hours, minutes) in [
            (self.sunrise_hour, self.sunrise_minute),
            (self.sunset_hour, self.sunset_minute),
        ] {
            if !is_valid_time(hours, minutes) {
                return Err(ValidationError::InvalidTime { hours, minutes }.into());
            }
        }
        Ok(())
    }

    /// Move `trigger` to the matching sun time. Returns whether the trigger
    /// is sun-bound; fixed-time triggers are left untouched.
    pub fn apply(&self, trigger: &mut Trigger) -> bool {
        let (hours, minutes) = match trigger.trigger_type {
            TriggerType::Sunrise => (self.sunrise_hour, self.sunrise_minute),
            TriggerType::Sunset => (self.sunset_hour, self.sunset_minute),
            TriggerType::Time => return false,
        };
        trigger.hours = hours;
        trigger.minutes = minutes;
        true
    }
}

/// Where sun times are computed for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Check the coordinates are on the globe.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidLocation`] when latitude is outside
    /// `-90..=90` or longitude outside `-180..=180`.
    pub fn validate(&self) -> Result<(), PanelHubError> {
        let valid = (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude);
        if valid {
            Ok(())
        } else {
            Err(ValidationError::InvalidLocation {
                latitude: self.latitude,
                longitude: self.longitude,
            }
            .into())
        }
    }
}

/// Persisted root of all user configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default)]
    pub devices: Vec<Device>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub sun_times: Option<SunTimes>,
}

impl UserSettings {
    #[must_use]
    pub fn device(&self, address: &str) -> Option<&Device> {
        self.devices.iter().find(|device| device.address == address)
    }

    /// Mutable lookup by address.
    ///
    /// # Errors
    ///
    /// Returns [`PanelHubError::NotFound`] if no device has `address`.
    pub fn device_mut(&mut self, address: &str) -> Result<&mut Device, PanelHubError> {
        self.devices
            .iter_mut()
            .find(|device| device.address == address)
            .ok_or_else(|| {
                NotFoundError {
                    entity: "Device",
                    id: address.to_string(),
                }
                .into()
            })
    }

    /// The device currently selected for editing, if any.
    #[must_use]
    pub fn active_device(&self) -> Option<&Device> {
        self.devices.iter().find(|device| device.active_in_gui)
    }

    /// Make `address` the only device selected for editing.
    ///
    /// # Errors
    ///
    /// Returns [`PanelHubError::NotFound`] if no device has `address`.
    pub fn select_device(&mut self, address: &str) -> Result<(), PanelHubError> {
        self.device_mut(address)?;
        for device in &mut self.devices {
            device.active_in_gui = device.address == address;
        }
        Ok(())
    }

    /// Register a new device. The first device added becomes selected.
    ///
    /// # Errors
    ///
    /// Returns [`PanelHubError::Validation`] if the device is invalid or its
    /// address is already registered.
    pub fn add_device(&mut self, mut device: Device) -> Result<(), PanelHubError> {
        device.ensure_active_schedule();
        device.validate()?;
        if self.device(&device.address).is_some() {
            return Err(ValidationError::DuplicateDevice(device.address).into());
        }
        if self.active_device().is_none() {
            device.active_in_gui = true;
        } else if device.active_in_gui {
            for existing in &mut self.devices {
                existing.active_in_gui = false;
            }
        }
        self.devices.push(device);
        Ok(())
    }

    /// Store new sun times and move every sunrise/sunset trigger to them.
    ///
    /// Fixed-time triggers are left untouched. Returns the number of
    /// triggers rewritten.
    ///
    /// # Errors
    ///
    /// Returns [`PanelHubError::Validation`] if either time is invalid; the
    /// settings are unchanged in that case.
    pub fn update_sunrise_sunset(&mut self, sun_times: SunTimes) -> Result<usize, PanelHubError> {
        sun_times.validate()?;
        self.sun_times = Some(sun_times);

        let rewritten = self
            .devices
            .iter_mut()
            .flat_map(|device| device.schedules.iter_mut())
            .flat_map(|schedule| schedule.triggers_mut())
            .map(|trigger| sun_times.apply(trigger))
            .filter(|&sun_bound| sun_bound)
            .count();
        Ok(rewritten)
    }

    /// Align the sun-bound triggers of `schedule` with the stored sun times.
    /// Does nothing until sun times are known.
    pub fn sync_sun_triggers(&self, schedule: &mut Schedule) {
        if let Some(sun_times) = self.sun_times {
            for trigger in schedule.triggers_mut() {
                sun_times.apply(trigger);
            }
        }
    }

    /// Put every device back under schedule control.
    pub fn reset_operation_modes(&mut self) {
        for device in &mut self.devices {
            device.operation_mode = OperationMode::Schedule;
        }
    }
}
