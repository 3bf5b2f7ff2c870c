//! Device client port: calls issued to a single light panel.
//!
//! The wire protocol lives in adapters. From the application's point of view
//! every call is idempotent: sending the same effect or state twice leaves
//! the panel as sending it once.

use std::future::Future;
use std::sync::Arc;

use panelhub_domain::effect::Rgb;
use panelhub_domain::error::PanelHubError;

/// Operations on one light panel.
pub trait DeviceClient {
    /// Select an effect stored on the panel and set its brightness.
    ///
    /// Fails with [`PanelHubError::UnknownEffect`] when the panel has no
    /// effect called `effect`.
    fn set_effect(
        &self,
        effect: &str,
        brightness: u8,
    ) -> impl Future<Output = Result<(), PanelHubError>> + Send;

    /// Switch the panel on or off, skipping the call when the panel is
    /// already known to be in the requested state.
    fn set_state_with_check(
        &self,
        on: bool,
    ) -> impl Future<Output = Result<(), PanelHubError>> + Send;

    /// Set the overall brightness (0–100).
    fn set_brightness(
        &self,
        brightness: u8,
    ) -> impl Future<Output = Result<(), PanelHubError>> + Send;

    /// Show a single solid colour.
    fn set_color(&self, color: Rgb) -> impl Future<Output = Result<(), PanelHubError>> + Send;
}

impl<T: DeviceClient + Send + Sync> DeviceClient for Arc<T> {
    fn set_effect(
        &self,
        effect: &str,
        brightness: u8,
    ) -> impl Future<Output = Result<(), PanelHubError>> + Send {
        (**self).set_effect(effect, brightness)
    }

    fn set_state_with_check(
        &self,
        on: bool,
    ) -> impl Future<Output = Result<(), PanelHubError>> + Send {
        (**self).set_state_with_check(on)
    }

    fn set_brightness(
        &self,
        brightness: u8,
    ) -> impl Future<Output = Result<(), PanelHubError>> + Send {
        (**self).set_brightness(brightness)
    }

    fn set_color(&self, color: Rgb) -> impl Future<Output = Result<(), PanelHubError>> + Send {
        (**self).set_color(color)
    }
}

/// Hands out the client for a device address.
///
/// Implementations return the same shared client for repeated calls with
/// one address, so state checks see every call made to that panel.
pub trait ClientFactory {
    type Client: DeviceClient + Send + Sync + 'static;

    fn client_for(&self, address: &str) -> Arc<Self::Client>;
}
