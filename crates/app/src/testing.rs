//! In-memory fakes shared by the unit tests of this crate.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDateTime;
use panelhub_domain::effect::Rgb;
use panelhub_domain::error::{PanelHubError, UnknownEffectError};
use panelhub_domain::settings::UserSettings;

use crate::ports::{ClientFactory, Clock, ColorSampler, DeviceClient, SettingsStore};

#[derive(Default)]
pub struct InMemorySettingsStore {
    stored: Mutex<Option<UserSettings>>,
    fail: AtomicBool,
}

impl InMemorySettingsStore {
    pub fn with(settings: UserSettings) -> Self {
        Self {
            stored: Mutex::new(Some(settings)),
            fail: AtomicBool::new(false),
        }
    }

    pub fn saved(&self) -> Option<UserSettings> {
        self.stored.lock().unwrap().clone()
    }

    pub fn fail_saves(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

impl SettingsStore for InMemorySettingsStore {
    fn load(&self) -> impl Future<Output = Result<UserSettings, PanelHubError>> + Send {
        let settings = self.stored.lock().unwrap().clone().unwrap_or_default();
        async { Ok(settings) }
    }

    fn save(
        &self,
        settings: &UserSettings,
    ) -> impl Future<Output = Result<(), PanelHubError>> + Send {
        let result = if self.fail.load(Ordering::SeqCst) {
            Err(PanelHubError::Storage(Box::new(std::io::Error::other(
                "disk full",
            ))))
        } else {
            *self.stored.lock().unwrap() = Some(settings.clone());
            Ok(())
        };
        async { result }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Effect(String, u8),
    State(bool),
    Brightness(u8),
    Color(Rgb),
}

/// Records calls and tracks on/off state like a real panel.
pub struct SpyClient {
    address: String,
    effects: Vec<String>,
    calls: Mutex<Vec<Call>>,
    on: AtomicBool,
    fail: AtomicBool,
}

impl SpyClient {
    pub fn new(address: &str, effects: &[&str]) -> Self {
        Self {
            address: address.to_string(),
            effects: effects.iter().map(ToString::to_string).collect(),
            calls: Mutex::new(Vec::new()),
            on: AtomicBool::new(true),
            fail: AtomicBool::new(false),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn is_on(&self) -> bool {
        self.on.load(Ordering::SeqCst)
    }

    pub fn set_on(&self, on: bool) {
        self.on.store(on, Ordering::SeqCst);
    }

    pub fn fail_calls(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn record(&self, call: Call) -> Result<(), PanelHubError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PanelHubError::Device(Box::new(std::io::Error::other(
                "panel unreachable",
            ))));
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

impl DeviceClient for SpyClient {
    fn set_effect(
        &self,
        effect: &str,
        brightness: u8,
    ) -> impl Future<Output = Result<(), PanelHubError>> + Send {
        let result = if self.effects.iter().any(|known| known == effect) {
            self.record(Call::Effect(effect.to_string(), brightness))
                .map(|()| self.set_on(true))
        } else {
            Err(UnknownEffectError {
                address: self.address.clone(),
                effect: effect.to_string(),
            }
            .into())
        };
        async { result }
    }

    fn set_state_with_check(
        &self,
        on: bool,
    ) -> impl Future<Output = Result<(), PanelHubError>> + Send {
        let result = if self.is_on() == on {
            Ok(())
        } else {
            self.record(Call::State(on)).map(|()| self.set_on(on))
        };
        async { result }
    }

    fn set_brightness(
        &self,
        brightness: u8,
    ) -> impl Future<Output = Result<(), PanelHubError>> + Send {
        let result = self
            .record(Call::Brightness(brightness))
            .map(|()| self.set_on(true));
        async { result }
    }

    fn set_color(&self, color: Rgb) -> impl Future<Output = Result<(), PanelHubError>> + Send {
        let result = self.record(Call::Color(color));
        async { result }
    }
}

/// Hands out one [`SpyClient`] per address, all knowing the same effects.
pub struct SpyFactory {
    effects: Vec<&'static str>,
    clients: Mutex<HashMap<String, Arc<SpyClient>>>,
}

impl SpyFactory {
    pub fn new(effects: &[&'static str]) -> Self {
        Self {
            effects: effects.to_vec(),
            clients: Mutex::new(HashMap::new()),
        }
    }
}

impl ClientFactory for SpyFactory {
    type Client = SpyClient;

    fn client_for(&self, address: &str) -> Arc<SpyClient> {
        let mut clients = self.clients.lock().unwrap();
        Arc::clone(
            clients
                .entry(address.to_string())
                .or_insert_with(|| Arc::new(SpyClient::new(address, &self.effects))),
        )
    }
}

impl ClientFactory for Arc<SpyFactory> {
    type Client = SpyClient;

    fn client_for(&self, address: &str) -> Arc<SpyClient> {
        (**self).client_for(address)
    }
}

pub struct FixedSampler(pub Rgb);

impl ColorSampler for FixedSampler {
    fn sample(&self) -> Option<Rgb> {
        Some(self.0)
    }
}

pub struct FixedClock(Mutex<NaiveDateTime>);

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self(Mutex::new(now))
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.0.lock().unwrap() = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.0.lock().unwrap()
    }
}

impl Clock for Arc<FixedClock> {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

pub const REFRESH: Duration = Duration::from_millis(5);

/// Poll `check` until it holds or a second has passed.
pub async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    check()
}
