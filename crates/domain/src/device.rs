//! Device: a networked light panel and the schedules that drive it.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{NotFoundError, PanelHubError, ValidationError};
use crate::schedule::{Schedule, Trigger};

/// Who is in control of a device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationMode {
    /// The schedule timer picks the effect.
    #[default]
    Schedule,
    /// The user picked an effect by hand; the timer leaves the device alone.
    Manual,
}

impl std::fmt::Display for OperationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Schedule => f.write_str("schedule"),
            Self::Manual => f.write_str("manual"),
        }
    }
}

/// A light panel reachable at `address`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Network address, unique across all devices.
    pub address: String,
    pub name: String,
    /// Whether the device is the one currently selected for editing.
    #[serde(default)]
    pub active_in_gui: bool,
    #[serde(default)]
    pub operation_mode: OperationMode,
    /// Sorted by name; at most one is active.
    #[serde(default)]
    pub schedules: Vec<Schedule>,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`PanelHubError::Validation`] when:
    /// - `address` is empty ([`ValidationError::EmptyAddress`])
    /// - `name` is empty ([`ValidationError::EmptyName`])
    /// - any schedule is invalid, or two schedules share a name
    /// - more than one schedule is active
    ///   ([`ValidationError::MultipleActiveSchedules`])
    pub fn validate(&self) -> Result<(), PanelHubError> {
        if self.address.trim().is_empty() {
            return Err(ValidationError::EmptyAddress.into());
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        for (index, schedule) in self.schedules.iter().enumerate() {
            schedule.validate()?;
            if self.schedules[..index]
                .iter()
                .any(|other| other.name == schedule.name)
            {
                return Err(ValidationError::DuplicateScheduleName(schedule.name.clone()).into());
            }
        }
        let active = self.schedules.iter().filter(|schedule| schedule.active).count();
        if active > 1 {
            return Err(ValidationError::MultipleActiveSchedules(active).into());
        }
        Ok(())
    }

    /// Mark the first schedule active when schedules exist but none is.
    pub fn ensure_active_schedule(&mut self) {
        if self.active_schedule().is_none()
            && let Some(first) = self.schedules.first_mut()
        {
            first.active = true;
        }
    }

    /// The schedule currently marked active.
    #[must_use]
    pub fn active_schedule(&self) -> Option<&Schedule> {
        self.schedules.iter().find(|schedule| schedule.active)
    }

    /// The trigger of the active schedule in effect at `now`.
    #[must_use]
    pub fn active_trigger(&self, now: NaiveDateTime) -> Option<&Trigger> {
        self.active_schedule()
            .and_then(|schedule| schedule.active_trigger(now))
    }

    #[must_use]
    pub fn schedule(&self, name: &str) -> Option<&Schedule> {
        self.schedules.iter().find(|schedule| schedule.name == name)
    }

    /// Add a schedule and make it the active one.
    ///
    /// # Errors
    ///
    /// Returns [`PanelHubError::Validation`] if the schedule is invalid or
    /// its name is already used on this device.
    pub fn add_schedule(&mut self, mut schedule: Schedule) -> Result<(), PanelHubError> {
        schedule.validate()?;
        if self.schedule(&schedule.name).is_some() {
            return Err(ValidationError::DuplicateScheduleName(schedule.name).into());
        }

        for existing in &mut self.schedules {
            existing.active = false;
        }
        schedule.active = true;
        self.schedules.push(schedule);
        self.sort_schedules();
        Ok(())
    }

    /// Replace the schedule called `name`, keeping its active flag.
    ///
    /// The replacement may carry a new name as long as it is not taken.
    ///
    /// # Errors
    ///
    /// Returns [`PanelHubError::NotFound`] if no schedule is called `name`,
    /// or [`PanelHubError::Validation`] if the replacement is invalid or
    /// renames onto an existing schedule.
    pub fn update_schedule(
        &mut self,
        name: &str,
        mut schedule: Schedule,
    ) -> Result<(), PanelHubError> {
        schedule.validate()?;
        if schedule.name != name && self.schedule(&schedule.name).is_some() {
            return Err(ValidationError::DuplicateScheduleName(schedule.name).into());
        }

        let existing = self.schedule_mut(name)?;
        schedule.active = existing.active;
        *existing = schedule;
        self.sort_schedules();
        Ok(())
    }

    /// Mark the schedule called `name` as the only active one.
    ///
    /// # Errors
    ///
    /// Returns [`PanelHubError::NotFound`] if no schedule is called `name`.
    pub fn activate_schedule(&mut self, name: &str) -> Result<(), PanelHubError> {
        self.schedule_mut(name)?;
        for schedule in &mut self.schedules {
            schedule.active = schedule.name == name;
        }
        Ok(())
    }

    /// Remove the schedule called `name` and return it.
    ///
    /// Removing the active schedule hands the active flag to the first
    /// remaining one.
    ///
    /// # Errors
    ///
    /// Returns [`PanelHubError::NotFound`] if no schedule is called `name`.
    pub fn delete_schedule(&mut self, name: &str) -> Result<Schedule, PanelHubError> {
        let index = self
            .schedules
            .iter()
            .position(|schedule| schedule.name == name)
            .ok_or_else(|| schedule_not_found(name))?;
        let removed = self.schedules.remove(index);
        self.ensure_active_schedule();
        Ok(removed)
    }

    fn schedule_mut(&mut self, name: &str) -> Result<&mut Schedule, PanelHubError> {
        self.schedules
            .iter_mut()
            .find(|schedule| schedule.name == name)
            .ok_or_else(|| schedule_not_found(name))
    }

    fn sort_schedules(&mut self) {
        self.schedules.sort_by(|a, b| a.name.cmp(&b.name));
    }
}

fn schedule_not_found(name: &str) -> PanelHubError {
    NotFoundError {
        entity: "Schedule",
        id: name.to_string(),
    }
    .into()
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    address: Option<String>,
    name: Option<String>,
    active_in_gui: bool,
    operation_mode: OperationMode,
    schedules: Vec<Schedule>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn active_in_gui(mut self, active: bool) -> Self {
        self.active_in_gui = active;
        self
    }

    #[must_use]
    pub fn operation_mode(mut self, mode: OperationMode) -> Self {
        self.operation_mode = mode;
        self
    }

    #[must_use]
    pub fn schedule(mut self, schedule: Schedule) -> Self {
        self.schedules.push(schedule);
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// # Errors
    ///
    /// Returns [`PanelHubError::Validation`] if required fields are missing,
    /// a schedule is invalid or several schedules are marked active. With
    /// no schedule marked active, the first one by name becomes active.
    pub fn build(self) -> Result<Device, PanelHubError> {
        let mut device = Device {
            address: self.address.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            active_in_gui: self.active_in_gui,
            operation_mode: self.operation_mode,
            schedules: self.schedules,
        };
        device.sort_schedules();
        device.ensure_active_schedule();
        device.validate()?;
        Ok(device)
    }
}
