//! Virtual panel: an in-memory light panel.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use panelhub_app::ports::DeviceClient;
use panelhub_domain::effect::Rgb;
use panelhub_domain::error::{PanelHubError, UnknownEffectError};

use crate::VirtualDeviceError;

const HISTORY_LIMIT: usize = 256;

/// A call that reached the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelCall {
    Effect { name: String, brightness: u8 },
    State(bool),
    Brightness(u8),
    Color(Rgb),
}

/// What the panel currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelState {
    pub on: bool,
    pub effect: Option<String>,
    pub brightness: u8,
    pub color: Option<Rgb>,
}

#[derive(Default)]
struct Inner {
    state: PanelState,
    history: VecDeque<PanelCall>,
}

/// A simulated panel. Starts switched off with no effect selected.
pub struct VirtualPanel {
    address: String,
    effects: Vec<String>,
    inner: Mutex<Inner>,
    reachable: AtomicBool,
}

impl VirtualPanel {
    pub fn new(address: impl Into<String>, effects: Vec<String>) -> Self {
        Self {
            address: address.into(),
            effects,
            inner: Mutex::new(Inner::default()),
            reachable: AtomicBool::new(true),
        }
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    #[must_use]
    pub fn native_effects(&self) -> &[String] {
        &self.effects
    }

    #[must_use]
    pub fn state(&self) -> PanelState {
        self.lock().state.clone()
    }

    /// Calls received so far, oldest first. Only the most recent calls are
    /// kept.
    #[must_use]
    pub fn history(&self) -> Vec<PanelCall> {
        self.lock().history.iter().cloned().collect()
    }

    /// Simulate the panel dropping off the network.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::Release);
    }

    fn apply(&self, call: PanelCall) -> Result<(), PanelHubError> {
        if !self.reachable.load(Ordering::Acquire) {
            return Err(VirtualDeviceError::Unreachable(self.address.clone()).into());
        }
        if let PanelCall::Effect { name, .. } = &call
            && !self.effects.contains(name)
        {
            return Err(UnknownEffectError {
                address: self.address.clone(),
                effect: name.clone(),
            }
            .into());
        }

        let mut inner = self.lock();
        match &call {
            PanelCall::Effect { name, brightness } => {
                inner.state.on = true;
                inner.state.effect = Some(name.clone());
                inner.state.brightness = *brightness;
            }
            PanelCall::State(on) => {
                if inner.state.on == *on {
                    return Ok(());
                }
                inner.state.on = *on;
            }
            PanelCall::Brightness(brightness) => {
                inner.state.on = true;
                inner.state.brightness = *brightness;
            }
            PanelCall::Color(color) => {
                inner.state.effect = None;
                inner.state.color = Some(*color);
            }
        }
        tracing::trace!(address = %self.address, ?call, "virtual panel call");
        if inner.history.len() == HISTORY_LIMIT {
            inner.history.pop_front();
        }
        inner.history.push_back(call);
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DeviceClient for VirtualPanel {
    fn set_effect(
        &self,
        effect: &str,
        brightness: u8,
    ) -> impl Future<Output = Result<(), PanelHubError>> + Send {
        let result = self.apply(PanelCall::Effect {
            name: effect.to_string(),
            brightness,
        });
        async { result }
    }

    fn set_state_with_check(
        &self,
        on: bool,
    ) -> impl Future<Output = Result<(), PanelHubError>> + Send {
        let result = self.apply(PanelCall::State(on));
        async { result }
    }

    fn set_brightness(
        &self,
        brightness: u8,
    ) -> impl Future<Output = Result<(), PanelHubError>> + Send {
        let result = self.apply(PanelCall::Brightness(brightness));
        async { result }
    }

    fn set_color(&self, color: Rgb) -> impl Future<Output = Result<(), PanelHubError>> + Send {
        let result = self.apply(PanelCall::Color(color));
        async { result }
    }
}
