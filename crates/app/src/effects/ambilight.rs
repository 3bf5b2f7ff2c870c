//! Ambilight effect: mirrors sampled ambient colours onto the panel.
//!
//! Activation sets the brightness and spawns a capture loop that pushes a
//! new colour every refresh period. Deactivation aborts the loop and waits
//! for the task to finish, so no colour is pushed after it returns.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use panelhub_domain::effect::Rgb;
use panelhub_domain::error::PanelHubError;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::ports::{ColorSampler, DeviceClient};

pub struct AmbilightEffect<C> {
    client: Arc<C>,
    sampler: Arc<dyn ColorSampler>,
    refresh: Duration,
    capture: Mutex<Option<JoinHandle<()>>>,
}

impl<C: DeviceClient + Send + Sync + 'static> AmbilightEffect<C> {
    pub fn new(client: Arc<C>, sampler: Arc<dyn ColorSampler>, refresh: Duration) -> Self {
        Self {
            client,
            sampler,
            refresh,
            capture: Mutex::new(None),
        }
    }

    pub fn is_active(&self) -> bool {
        self.lock_capture().is_some()
    }

    /// Set `brightness` and start the capture loop. Does nothing when the
    /// loop is already running.
    ///
    /// # Errors
    ///
    /// Returns the device error from setting the brightness; no loop is
    /// started in that case.
    pub async fn activate(&self, brightness: u8) -> Result<(), PanelHubError> {
        if self.is_active() {
            return Ok(());
        }
        self.client.set_brightness(brightness).await?;

        let handle = tokio::spawn(capture_loop(
            Arc::clone(&self.client),
            Arc::clone(&self.sampler),
            self.refresh,
        ));
        if let Some(previous) = self.lock_capture().replace(handle) {
            previous.abort();
        }
        Ok(())
    }

    /// Stop the capture loop and wait for it to wind down.
    pub async fn deactivate(&self) {
        let handle = self.lock_capture().take();
        if let Some(handle) = handle {
            handle.abort();
            if let Err(err) = handle.await
                && !err.is_cancelled()
            {
                tracing::warn!(%err, "ambilight capture loop ended abnormally");
            }
        }
    }

    fn lock_capture(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.capture.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C> Drop for AmbilightEffect<C> {
    fn drop(&mut self) {
        let capture = self.capture.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = capture.take() {
            handle.abort();
        }
    }
}

async fn capture_loop<C: DeviceClient>(
    client: Arc<C>,
    sampler: Arc<dyn ColorSampler>,
    refresh: Duration,
) {
    let mut ticker = tokio::time::interval(refresh);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last: Option<Rgb> = None;

    loop {
        ticker.tick().await;
        let Some(color) = sampler.sample() else {
            continue;
        };
        if last == Some(color) {
            continue;
        }
        match client.set_color(color).await {
            Ok(()) => last = Some(color),
            Err(err) => tracing::warn!(%err, %color, "failed to push ambient colour"),
        }
    }
}
