//! # panelhub-adapter-virtual
//!
//! Simulated light panels for testing and demonstration.
//!
//! ## Provided pieces
//!
//! | Type | Port | Behaviour |
//! |------|------|-----------|
//! | [`VirtualPanel`] | `DeviceClient` | Tracks on/off, effect, brightness and colour; records every call |
//! | [`VirtualClientFactory`] | `ClientFactory` | One shared panel per address |
//! | [`HueCycleSampler`] | `ColorSampler` | Walks around the colour wheel |
//!
//! ## Dependency rule
//!
//! Depends on `panelhub-app` (port traits) and `panelhub-domain` only.

mod error;
mod panel;
mod sampler;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use panelhub_app::ports::ClientFactory;

pub use error::VirtualDeviceError;
pub use panel::{PanelCall, PanelState, VirtualPanel};
pub use sampler::HueCycleSampler;

/// Effects a simulated panel knows when none are configured.
pub const DEFAULT_EFFECTS: &[&str] = &[
    "Color Burst",
    "Flames",
    "Forest",
    "Inner Peace",
    "Northern Lights",
    "Rainbow",
    "Romantic",
    "Snowfall",
];

/// Creates simulated panels on demand. Clones share the same panels.
#[derive(Clone)]
pub struct VirtualClientFactory {
    effects: Arc<[String]>,
    panels: Arc<Mutex<HashMap<String, Arc<VirtualPanel>>>>,
}

impl Default for VirtualClientFactory {
    fn default() -> Self {
        Self::new(DEFAULT_EFFECTS.iter().map(ToString::to_string))
    }
}

impl VirtualClientFactory {
    /// Panels created by this factory know exactly `effects`.
    pub fn new(effects: impl IntoIterator<Item = String>) -> Self {
        Self {
            effects: effects.into_iter().collect(),
            panels: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// The panel for `address`, if a client was ever handed out for it.
    #[must_use]
    pub fn panel(&self, address: &str) -> Option<Arc<VirtualPanel>> {
        self.panels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(address)
            .cloned()
    }
}

impl ClientFactory for VirtualClientFactory {
    type Client = VirtualPanel;

    fn client_for(&self, address: &str) -> Arc<VirtualPanel> {
        let mut panels = self.panels.lock().unwrap_or_else(PoisonError::into_inner);
        let panel = panels.entry(address.to_string()).or_insert_with(|| {
            tracing::debug!(%address, "creating virtual panel");
            Arc::new(VirtualPanel::new(address, self.effects.to_vec()))
        });
        Arc::clone(panel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_hand_out_same_panel_for_same_address() {
        let factory = VirtualClientFactory::default();
        let first = factory.client_for("10.0.0.1");
        let second = factory.client_for("10.0.0.1");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn should_share_panels_between_clones() {
        let factory = VirtualClientFactory::default();
        let clone = factory.clone();
        let panel = clone.client_for("10.0.0.1");
        assert!(Arc::ptr_eq(&factory.panel("10.0.0.1").unwrap(), &panel));
    }

    #[test]
    fn should_not_know_panels_never_requested() {
        let factory = VirtualClientFactory::default();
        assert!(factory.panel("10.0.0.9").is_none());
    }

    #[test]
    fn should_give_panels_configured_effects() {
        let factory = VirtualClientFactory::new(["Aurora".to_string()]);
        let panel = factory.client_for("10.0.0.1");
        assert_eq!(panel.native_effects(), ["Aurora".to_string()]);
    }
}
