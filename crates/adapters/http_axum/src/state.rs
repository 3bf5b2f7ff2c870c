//! Shared application state for axum handlers.

use std::sync::Arc;

use panelhub_app::effects::EffectRegistry;
use panelhub_app::ports::ClientFactory;
use panelhub_app::schedule_timer::ScheduleTimer;
use panelhub_app::services::settings_service::SettingsService;

/// Application state shared across all axum handlers.
///
/// Generic over the settings store, the device client factory and the clock
/// to avoid dynamic dispatch. `Clone` is implemented manually so the
/// underlying types themselves do not need to be `Clone`; only the `Arc`
/// wrappers are cloned.
pub struct AppState<S, F: ClientFactory, K> {
    /// Settings handle shared with the schedule timer.
    pub settings: SettingsService<S>,
    /// Custom effects of every device.
    pub registry: Arc<EffectRegistry<F>>,
    pub timer: Arc<ScheduleTimer<S, F, K>>,
}

impl<S, F: ClientFactory, K> Clone for AppState<S, F, K> {
    fn clone(&self) -> Self {
        Self {
            settings: self.settings.clone(),
            registry: Arc::clone(&self.registry),
            timer: Arc::clone(&self.timer),
        }
    }
}

impl<S, F: ClientFactory, K> AppState<S, F, K> {
    pub fn new(
        settings: SettingsService<S>,
        registry: Arc<EffectRegistry<F>>,
        timer: Arc<ScheduleTimer<S, F, K>>,
    ) -> Self {
        Self {
            settings,
            registry,
            timer,
        }
    }
}
