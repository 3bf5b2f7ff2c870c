//! Orchestrator: switches a device from one effect to another.
//!
//! At most one custom effect runs on a device at a time, and no custom
//! effect keeps running once a device effect has been selected. Transitions
//! on one device are serialized through its transition lock, so a timer
//! pass and a manual request cannot interleave their calls.

use std::sync::Arc;

use panelhub_domain::effect::has_custom_prefix;
use panelhub_domain::error::{PanelHubError, UnknownEffectError, ValidationError};
use panelhub_domain::schedule::MAX_BRIGHTNESS;

use crate::effects::DeviceEffects;
use crate::ports::DeviceClient;

/// Effect switching for one device.
pub struct Orchestrator<C> {
    client: Arc<C>,
    effects: Arc<DeviceEffects<C>>,
}

impl<C: DeviceClient + Send + Sync + 'static> Orchestrator<C> {
    pub fn new(client: Arc<C>, effects: Arc<DeviceEffects<C>>) -> Self {
        Self { client, effects }
    }

    /// Make `effect` the one running on the device.
    ///
    /// Custom effects are started after every other custom effect has been
    /// stopped; re-activating the running custom effect makes no device
    /// call. Any other name is sent to the device after all custom effects
    /// have been stopped.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::BrightnessOutOfRange`] above
    /// [`MAX_BRIGHTNESS`] without touching the device,
    /// [`PanelHubError::UnknownEffect`] for a name neither the
    /// registry nor the device knows, or the device error from the call
    /// that failed. Effects stopped before the failure stay stopped.
    #[tracing::instrument(skip(self), fields(address = %self.effects.address()))]
    pub async fn activate_effect(&self, effect: &str, brightness: u8) -> Result<(), PanelHubError> {
        if brightness > MAX_BRIGHTNESS {
            return Err(ValidationError::BrightnessOutOfRange(brightness).into());
        }
        let _transition = self.effects.lock_transition().await;

        if self.effects.is_custom_effect(effect) {
            if self.effects.has_active_effects(Some(effect)) {
                self.effects.deactivate_others(effect).await;
            }
            let custom = self.effects.get(effect)?;
            if custom.is_active() {
                tracing::debug!("custom effect already running");
                return Ok(());
            }
            custom.activate(brightness).await?;
            tracing::info!("custom effect activated");
        } else if has_custom_prefix(effect) {
            return Err(UnknownEffectError {
                address: self.effects.address().to_string(),
                effect: effect.to_string(),
            }
            .into());
        } else {
            if self.effects.has_active_effects(None) {
                self.effects.deactivate_all().await;
            }
            self.client.set_effect(effect, brightness).await?;
            tracing::info!("device effect selected");
        }
        Ok(())
    }

    /// Stop every custom effect and switch the device off.
    ///
    /// # Errors
    ///
    /// Returns the device error from switching off.
    #[tracing::instrument(skip(self), fields(address = %self.effects.address()))]
    pub async fn turn_off(&self) -> Result<(), PanelHubError> {
        let _transition = self.effects.lock_transition().await;
        if self.effects.has_active_effects(None) {
            self.effects.deactivate_all().await;
        }
        self.client.set_state_with_check(false).await
    }

    #[must_use]
    pub fn active_custom_effect(&self) -> Option<&'static str> {
        self.effects.active_effect()
    }
}
