//! Effect registry: the custom effects of every device.
//!
//! [`DeviceEffects`] holds one instance of each custom effect for a single
//! device plus the lock that serializes effect transitions on it.
//! [`EffectRegistry`] creates those sets lazily, keyed by device address.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use panelhub_domain::effect::Effect;
use panelhub_domain::error::{NotFoundError, PanelHubError};
use tokio::sync::MutexGuard;

use super::{AmbilightEffect, CustomEffect, TurnOffEffect};
use crate::orchestrator::Orchestrator;
use crate::ports::{ClientFactory, ColorSampler, DeviceClient};

/// The custom effects of one device.
pub struct DeviceEffects<C> {
    address: String,
    effects: BTreeMap<&'static str, CustomEffect<C>>,
    transition: tokio::sync::Mutex<()>,
}

impl<C: DeviceClient + Send + Sync + 'static> DeviceEffects<C> {
    pub fn new(
        address: impl Into<String>,
        client: &Arc<C>,
        sampler: Arc<dyn ColorSampler>,
        ambilight_refresh: Duration,
    ) -> Self {
        let effects = [
            CustomEffect::Ambilight(AmbilightEffect::new(
                Arc::clone(client),
                sampler,
                ambilight_refresh,
            )),
            CustomEffect::TurnOff(TurnOffEffect::new(Arc::clone(client))),
        ]
        .into_iter()
        .map(|effect| (effect.name(), effect))
        .collect();

        Self {
            address: address.into(),
            effects,
            transition: tokio::sync::Mutex::new(()),
        }
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    #[must_use]
    pub fn is_custom_effect(&self, name: &str) -> bool {
        self.effects.contains_key(name)
    }

    /// Look up a custom effect by name.
    ///
    /// # Errors
    ///
    /// Returns [`PanelHubError::NotFound`] when `name` is not a custom effect.
    pub fn get(&self, name: &str) -> Result<&CustomEffect<C>, PanelHubError> {
        self.effects.get(name).ok_or_else(|| {
            NotFoundError {
                entity: "Custom effect",
                id: name.to_string(),
            }
            .into()
        })
    }

    /// Whether any custom effect other than `excluding` is active.
    #[must_use]
    pub fn has_active_effects(&self, excluding: Option<&str>) -> bool {
        self.effects
            .values()
            .any(|effect| effect.is_active() && Some(effect.name()) != excluding)
    }

    /// Name of the active custom effect, if one is running.
    #[must_use]
    pub fn active_effect(&self) -> Option<&'static str> {
        self.effects
            .values()
            .find(|effect| effect.is_active())
            .map(CustomEffect::name)
    }

    /// Stop every active custom effect.
    pub async fn deactivate_all(&self) {
        for effect in self.effects.values().filter(|effect| effect.is_active()) {
            effect.deactivate().await;
            tracing::debug!(address = %self.address, effect = effect.name(), "custom effect deactivated");
        }
    }

    /// Stop every active custom effect except `keep`.
    pub async fn deactivate_others(&self, keep: &str) {
        for effect in self
            .effects
            .values()
            .filter(|effect| effect.is_active() && effect.name() != keep)
        {
            effect.deactivate().await;
            tracing::debug!(address = %self.address, effect = effect.name(), "custom effect deactivated");
        }
    }

    /// Custom effect names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<Effect> {
        self.effects.keys().map(|name| Effect::new(*name)).collect()
    }

    /// Wait for exclusive right to change effects on this device.
    pub async fn lock_transition(&self) -> MutexGuard<'_, ()> {
        self.transition.lock().await
    }
}

/// Lazily built custom effects for every device address.
pub struct EffectRegistry<F: ClientFactory> {
    factory: F,
    sampler: Arc<dyn ColorSampler>,
    ambilight_refresh: Duration,
    devices: Mutex<HashMap<String, Arc<DeviceEffects<F::Client>>>>,
}

impl<F: ClientFactory> EffectRegistry<F> {
    pub fn new(factory: F, sampler: Arc<dyn ColorSampler>, ambilight_refresh: Duration) -> Self {
        Self {
            factory,
            sampler,
            ambilight_refresh,
            devices: Mutex::new(HashMap::new()),
        }
    }

    pub fn client_for(&self, address: &str) -> Arc<F::Client> {
        self.factory.client_for(address)
    }

    /// The custom effects of `address`, created on first use.
    pub fn effects_for(&self, address: &str) -> Arc<DeviceEffects<F::Client>> {
        let mut devices = self.devices.lock().unwrap_or_else(PoisonError::into_inner);
        let effects = devices.entry(address.to_string()).or_insert_with(|| {
            tracing::debug!(%address, "creating custom effects for device");
            Arc::new(DeviceEffects::new(
                address,
                &self.factory.client_for(address),
                Arc::clone(&self.sampler),
                self.ambilight_refresh,
            ))
        });
        Arc::clone(effects)
    }

    /// The orchestrator driving effects on `address`.
    pub fn orchestrator(&self, address: &str) -> Orchestrator<F::Client> {
        Orchestrator::new(self.client_for(address), self.effects_for(address))
    }
}
