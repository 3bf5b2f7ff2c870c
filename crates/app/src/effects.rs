//! Custom effects: software-driven effects the device does not store.
//!
//! Every device gets its own instance of each custom effect. The set is
//! closed, so effects are modelled as an enum rather than trait objects.

pub mod ambilight;
pub mod registry;
pub mod turn_off;

pub use ambilight::AmbilightEffect;
pub use registry::{DeviceEffects, EffectRegistry};
pub use turn_off::TurnOffEffect;

use panelhub_domain::effect::{AMBILIGHT_EFFECT, TURN_OFF_EFFECT};
use panelhub_domain::error::PanelHubError;

use crate::ports::DeviceClient;

/// One custom effect bound to one device.
pub enum CustomEffect<C> {
    Ambilight(AmbilightEffect<C>),
    TurnOff(TurnOffEffect<C>),
}

impl<C: DeviceClient + Send + Sync + 'static> CustomEffect<C> {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ambilight(_) => AMBILIGHT_EFFECT,
            Self::TurnOff(_) => TURN_OFF_EFFECT,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        match self {
            Self::Ambilight(effect) => effect.is_active(),
            Self::TurnOff(effect) => effect.is_active(),
        }
    }

    /// Start the effect at `brightness`.
    ///
    /// # Errors
    ///
    /// Returns the device error when the panel rejects the initial call.
    pub async fn activate(&self, brightness: u8) -> Result<(), PanelHubError> {
        match self {
            Self::Ambilight(effect) => effect.activate(brightness).await,
            Self::TurnOff(effect) => effect.activate().await,
        }
    }

    /// Stop the effect. Returns once no further device call from this
    /// effect can happen.
    pub async fn deactivate(&self) {
        match self {
            Self::Ambilight(effect) => effect.deactivate().await,
            Self::TurnOff(effect) => effect.deactivate(),
        }
    }
}
