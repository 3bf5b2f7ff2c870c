//! Trigger: a point in the day from which an effect should be shown.

use serde::{Deserialize, Serialize};

use crate::error::{PanelHubError, ValidationError};
use crate::time::is_valid_time;

/// Highest accepted brightness value.
pub const MAX_BRIGHTNESS: u8 = 100;

/// What determines a trigger's time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    /// A fixed clock time chosen by the user.
    Time,
    /// Follows the stored sunrise time.
    Sunrise,
    /// Follows the stored sunset time.
    Sunset,
}

impl std::fmt::Display for TriggerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Time => f.write_str("time"),
            Self::Sunrise => f.write_str("sunrise"),
            Self::Sunset => f.write_str("sunset"),
        }
    }
}

/// Shows `effect` at `brightness` from `hours:minutes` until the next
/// trigger of the same program fires.
///
/// For [`TriggerType::Sunrise`] and [`TriggerType::Sunset`] the time fields
/// are rewritten whenever new sun times are computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub trigger_type: TriggerType,
    pub hours: u8,
    pub minutes: u8,
    pub effect: String,
    pub brightness: u8,
}

impl Trigger {
    #[must_use]
    pub fn new(
        trigger_type: TriggerType,
        hours: u8,
        minutes: u8,
        effect: impl Into<String>,
        brightness: u8,
    ) -> Self {
        Self {
            trigger_type,
            hours,
            minutes,
            effect: effect.into(),
            brightness,
        }
    }

    /// Shorthand for a fixed clock-time trigger.
    #[must_use]
    pub fn at(hours: u8, minutes: u8, effect: impl Into<String>, brightness: u8) -> Self {
        Self::new(TriggerType::Time, hours, minutes, effect, brightness)
    }

    /// Minutes since midnight at which this trigger fires.
    #[must_use]
    pub fn minute_of_day(&self) -> u16 {
        u16::from(self.hours) * 60 + u16::from(self.minutes)
    }

    /// Whether the time of this trigger follows the sun.
    #[must_use]
    pub fn is_sun_bound(&self) -> bool {
        matches!(self.trigger_type, TriggerType::Sunrise | TriggerType::Sunset)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`PanelHubError::Validation`] when:
    /// - the time is not a valid time of day ([`ValidationError::InvalidTime`])
    /// - `effect` is empty ([`ValidationError::EmptyEffect`])
    /// - `brightness` exceeds [`MAX_BRIGHTNESS`] ([`ValidationError::BrightnessOutOfRange`])
    pub fn validate(&self) -> Result<(), PanelHubError> {
        if !is_valid_time(self.hours, self.minutes) {
            return Err(ValidationError::InvalidTime {
                hours: self.hours,
                minutes: self.minutes,
            }
            .into());
        }
        if self.effect.is_empty() {
            return Err(ValidationError::EmptyEffect.into());
        }
        if self.brightness > MAX_BRIGHTNESS {
            return Err(ValidationError::BrightnessOutOfRange(self.brightness).into());
        }
        Ok(())
    }
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02} {} -> {} ({}%)",
            self.hours, self.minutes, self.trigger_type, self.effect, self.brightness
        )
    }
}
