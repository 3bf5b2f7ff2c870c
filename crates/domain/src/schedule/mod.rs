//! Schedule: a named set of programs deciding which effect runs when.
//!
//! A device owns several schedules; exactly one of them is marked active.
//! Each schedule holds one [`Program`] per day of the week (or a single
//! program repeated every day), and each program is a list of [`Trigger`]s.

mod program;
pub mod resolver;
mod trigger;

pub use program::Program;
pub use trigger::{MAX_BRIGHTNESS, Trigger, TriggerType};

use chrono::{Datelike, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{PanelHubError, ValidationError};

/// A named, activatable collection of programs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub programs: Vec<Program>,
}

impl Schedule {
    /// Create a builder for constructing a [`Schedule`].
    #[must_use]
    pub fn builder() -> ScheduleBuilder {
        ScheduleBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`PanelHubError::Validation`] when:
    /// - `name` is empty ([`ValidationError::EmptyName`])
    /// - any program is invalid (see [`Program::validate`])
    pub fn validate(&self) -> Result<(), PanelHubError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        for program in &self.programs {
            program.validate()?;
        }
        Ok(())
    }

    /// The program that applies on `weekday`.
    ///
    /// Programs are indexed from Monday, wrapping around the number of
    /// programs: one program applies every day, seven programs give one per
    /// weekday.
    #[must_use]
    pub fn program_for(&self, weekday: Weekday) -> Option<&Program> {
        if self.programs.is_empty() {
            return None;
        }
        let index = weekday.num_days_from_monday() as usize % self.programs.len();
        self.programs.get(index)
    }

    /// The trigger in effect at `now`.
    #[must_use]
    pub fn active_trigger(&self, now: NaiveDateTime) -> Option<&Trigger> {
        self.program_for(now.weekday())
            .and_then(|program| program.active_trigger(now.time()))
    }

    /// Every trigger of every program, mutably.
    pub fn triggers_mut(&mut self) -> impl Iterator<Item = &mut Trigger> {
        self.programs
            .iter_mut()
            .flat_map(|program| program.triggers.iter_mut())
    }
}

/// Step-by-step builder for [`Schedule`].
#[derive(Debug, Default)]
pub struct ScheduleBuilder {
    name: Option<String>,
    active: bool,
    programs: Vec<Program>,
}

impl ScheduleBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    #[must_use]
    pub fn program(mut self, program: Program) -> Self {
        self.programs.push(program);
        self
    }

    /// Consume the builder, validate, and return a [`Schedule`].
    ///
    /// # Errors
    ///
    /// Returns [`PanelHubError::Validation`] if the name is missing or a
    /// program is invalid.
    pub fn build(self) -> Result<Schedule, PanelHubError> {
        let schedule = Schedule {
            name: self.name.unwrap_or_default(),
            active: self.active,
            programs: self.programs,
        };
        schedule.validate()?;
        Ok(schedule)
    }
}
