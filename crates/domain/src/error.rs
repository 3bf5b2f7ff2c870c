//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`PanelHubError`] via `From`, so port boundaries carry a single type.

use std::error::Error as StdError;

/// Boxed error used for adapter failures that cross a port boundary.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Top-level error for every fallible domain and application operation.
#[derive(Debug, thiserror::Error)]
pub enum PanelHubError {
    /// A domain invariant was violated by the input.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The requested item does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// An effect name matches neither a custom effect nor a device effect.
    #[error("unknown effect")]
    UnknownEffect(#[from] UnknownEffectError),

    /// A call to a light-panel device failed (unreachable, rejected, …).
    #[error("device error")]
    Device(#[source] BoxError),

    /// Loading or persisting settings failed.
    #[error("storage error")]
    Storage(#[source] BoxError),
}

/// Violations of domain invariants.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("device address must not be empty")]
    EmptyAddress,

    #[error("trigger effect name must not be empty")]
    EmptyEffect,

    #[error("{hours:02}:{minutes:02} is not a valid time of day")]
    InvalidTime { hours: u8, minutes: u8 },

    #[error("brightness {0} is out of range 0..=100")]
    BrightnessOutOfRange(u8),

    /// Two triggers of one program fire at the same minute.
    #[error("another trigger already fires at {hours:02}:{minutes:02}")]
    DuplicateTriggerTime { hours: u8, minutes: u8 },

    #[error("a schedule named '{0}' already exists")]
    DuplicateScheduleName(String),

    /// A device may follow only one schedule at a time.
    #[error("{0} schedules are marked active, at most one may be")]
    MultipleActiveSchedules(usize),

    #[error("a device with address '{0}' already exists")]
    DuplicateDevice(String),

    #[error("({latitude}, {longitude}) is not a valid location")]
    InvalidLocation { latitude: f64, longitude: f64 },
}

/// A lookup by identifier found nothing.
#[derive(Debug, thiserror::Error)]
#[error("{entity} '{id}' not found")]
pub struct NotFoundError {
    /// Kind of item that was looked up (`"Device"`, `"Schedule"`, …).
    pub entity: &'static str,
    /// Identifier used for the lookup.
    pub id: String,
}

/// An effect name that neither the effect registry nor the device knows.
#[derive(Debug, thiserror::Error)]
#[error("effect '{effect}' is not known to device '{address}'")]
pub struct UnknownEffectError {
    pub address: String,
    pub effect: String,
}
