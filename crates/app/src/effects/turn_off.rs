//! Turn-off effect: switches the panel off and stays active until replaced.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use panelhub_domain::error::PanelHubError;

use crate::ports::DeviceClient;

pub struct TurnOffEffect<C> {
    client: Arc<C>,
    active: AtomicBool,
}

impl<C: DeviceClient + Send + Sync> TurnOffEffect<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            active: AtomicBool::new(false),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Switch the panel off.
    ///
    /// # Errors
    ///
    /// Returns the device error; the effect stays inactive in that case.
    pub async fn activate(&self) -> Result<(), PanelHubError> {
        self.client.set_state_with_check(false).await?;
        self.active.store(true, Ordering::Release);
        Ok(())
    }

    /// Nothing runs in the background, so this only clears the flag. The
    /// next effect turns the panel back on.
    pub fn deactivate(&self) {
        self.active.store(false, Ordering::Release);
    }
}
