//! Program: the triggers that make up one day of a schedule.

use std::collections::HashSet;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::{Trigger, resolver};
use crate::error::{PanelHubError, ValidationError};

/// An ordered list of triggers covering one day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub triggers: Vec<Trigger>,
}

impl Program {
    #[must_use]
    pub fn new(triggers: Vec<Trigger>) -> Self {
        Self { triggers }
    }

    /// Check every trigger and reject two triggers firing at the same minute.
    ///
    /// # Errors
    ///
    /// Returns the first trigger validation failure, or
    /// [`ValidationError::DuplicateTriggerTime`] on a time collision.
    pub fn validate(&self) -> Result<(), PanelHubError> {
        let mut seen = HashSet::with_capacity(self.triggers.len());
        for trigger in &self.triggers {
            trigger.validate()?;
            if !seen.insert(trigger.minute_of_day()) {
                return Err(ValidationError::DuplicateTriggerTime {
                    hours: trigger.hours,
                    minutes: trigger.minutes,
                }
                .into());
            }
        }
        Ok(())
    }

    /// Append a trigger, keeping the program valid.
    ///
    /// # Errors
    ///
    /// Returns [`PanelHubError::Validation`] if the trigger is invalid or its
    /// time is already taken by another trigger.
    pub fn add_trigger(&mut self, trigger: Trigger) -> Result<(), PanelHubError> {
        trigger.validate()?;
        if self
            .triggers
            .iter()
            .any(|existing| existing.minute_of_day() == trigger.minute_of_day())
        {
            return Err(ValidationError::DuplicateTriggerTime {
                hours: trigger.hours,
                minutes: trigger.minutes,
            }
            .into());
        }
        self.triggers.push(trigger);
        Ok(())
    }

    /// The trigger in effect at `now`.
    #[must_use]
    pub fn active_trigger(&self, now: NaiveTime) -> Option<&Trigger> {
        resolver::resolve(now, &self.triggers)
    }

    /// Whether two triggers share a time, e.g. after a sun-time rewrite.
    #[must_use]
    pub fn has_time_collision(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.triggers.len());
        self.triggers
            .iter()
            .any(|trigger| !seen.insert(trigger.minute_of_day()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::TriggerType;

    #[test]
    fn should_accept_program_with_distinct_times() {
        let program = Program::new(vec![
            Trigger::at(8, 0, "Morning", 80),
            Trigger::at(8, 1, "Later", 80),
        ]);
        assert!(program.validate().is_ok());
    }

    #[test]
    fn should_reject_duplicate_trigger_times() {
        let program = Program::new(vec![
            Trigger::at(8, 0, "Morning", 80),
            Trigger::new(TriggerType::Sunrise, 8, 0, "Dawn", 30),
        ]);
        assert!(matches!(
            program.validate(),
            Err(PanelHubError::Validation(
                ValidationError::DuplicateTriggerTime {
                    hours: 8,
                    minutes: 0
                }
            ))
        ));
    }

    #[test]
    fn should_propagate_trigger_validation_error() {
        let program = Program::new(vec![Trigger::at(8, 0, "", 80)]);
        assert!(matches!(
            program.validate(),
            Err(PanelHubError::Validation(ValidationError::EmptyEffect))
        ));
    }

    #[test]
    fn should_add_trigger_with_free_time() {
        let mut program = Program::default();
        program.add_trigger(Trigger::at(7, 0, "Wake", 60)).unwrap();
        program.add_trigger(Trigger::at(22, 0, "Sleep", 5)).unwrap();
        assert_eq!(program.triggers.len(), 2);
    }

    #[test]
    fn should_refuse_to_add_trigger_with_taken_time() {
        let mut program = Program::new(vec![Trigger::at(7, 0, "Wake", 60)]);
        let result = program.add_trigger(Trigger::at(7, 0, "Other", 10));
        assert!(matches!(
            result,
            Err(PanelHubError::Validation(
                ValidationError::DuplicateTriggerTime { .. }
            ))
        ));
        assert_eq!(program.triggers.len(), 1);
    }

    #[test]
    fn should_resolve_active_trigger() {
        let program = Program::new(vec![
            Trigger::at(8, 0, "EffectA", 80),
            Trigger::at(18, 0, "EffectB", 40),
        ]);
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        assert_eq!(program.active_trigger(noon).unwrap().effect, "EffectA");
    }

    #[test]
    fn should_detect_time_collision() {
        let mut program = Program::new(vec![
            Trigger::at(6, 30, "Fixed", 80),
            Trigger::new(TriggerType::Sunrise, 7, 0, "Dawn", 30),
        ]);
        assert!(!program.has_time_collision());
        program.triggers[1].hours = 6;
        program.triggers[1].minutes = 30;
        assert!(program.has_time_collision());
    }
}
