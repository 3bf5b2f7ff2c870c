//! Schedule timer: periodic and on-demand schedule evaluation.
//!
//! A running timer owns one interval task. Every tick, and every call to
//! [`ScheduleTimer::fire_now`], dispatches one evaluation pass per device.
//! Passes are spawned tasks the timer never awaits; a failing pass is logged
//! and the next tick tries again.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use panelhub_domain::device::OperationMode;
use panelhub_domain::error::PanelHubError;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::effects::EffectRegistry;
use crate::ports::{ClientFactory, Clock, SettingsStore};
use crate::services::settings_service::SettingsService;

/// Default time between two evaluation rounds.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// What one evaluation pass did to a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// The device is under manual control.
    Skipped,
    Activated { effect: String, brightness: u8 },
    TurnedOff,
}

/// Everything one evaluation pass needs.
pub struct SchedulePass<S, F: ClientFactory, K> {
    settings: SettingsService<S>,
    registry: Arc<EffectRegistry<F>>,
    clock: Arc<K>,
}

impl<S, F: ClientFactory, K> Clone for SchedulePass<S, F, K> {
    fn clone(&self) -> Self {
        Self {
            settings: self.settings.clone(),
            registry: Arc::clone(&self.registry),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S, F, K> SchedulePass<S, F, K>
where
    S: SettingsStore + Send + Sync + 'static,
    F: ClientFactory + Send + Sync + 'static,
    K: Clock + 'static,
{
    /// Resolve the active trigger of `address` and apply it.
    ///
    /// # Errors
    ///
    /// Returns [`PanelHubError::NotFound`] if the device is gone, or the
    /// error of the device call that failed.
    #[tracing::instrument(skip(self))]
    pub async fn evaluate_device(&self, address: &str) -> Result<PassOutcome, PanelHubError> {
        let device = self.settings.device(address).await?;
        if device.operation_mode == OperationMode::Manual {
            tracing::debug!("device under manual control");
            return Ok(PassOutcome::Skipped);
        }

        let orchestrator = self.registry.orchestrator(address);
        match device.active_trigger(self.clock.now()) {
            Some(trigger) => {
                orchestrator
                    .activate_effect(&trigger.effect, trigger.brightness)
                    .await?;
                Ok(PassOutcome::Activated {
                    effect: trigger.effect.clone(),
                    brightness: trigger.brightness,
                })
            }
            None => {
                orchestrator.turn_off().await?;
                Ok(PassOutcome::TurnedOff)
            }
        }
    }

    /// Evaluate every device in turn and collect the outcomes.
    pub async fn evaluate_all(&self) -> Vec<(String, Result<PassOutcome, PanelHubError>)> {
        let mut outcomes = Vec::new();
        for address in self.settings.device_addresses().await {
            let outcome = self.evaluate_device(&address).await;
            outcomes.push((address, outcome));
        }
        outcomes
    }

    fn dispatch(&self) {
        let pass = self.clone();
        tokio::spawn(async move {
            for address in pass.settings.device_addresses().await {
                let pass = pass.clone();
                tokio::spawn(async move {
                    match pass.evaluate_device(&address).await {
                        Ok(outcome) => tracing::debug!(%address, ?outcome, "evaluation pass done"),
                        Err(error) => {
                            tracing::warn!(%address, ?error, "evaluation pass failed");
                        }
                    }
                });
            }
        });
    }
}

/// Periodic driver of [`SchedulePass`].
pub struct ScheduleTimer<S, F: ClientFactory, K> {
    pass: SchedulePass<S, F, K>,
    interval: Duration,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl<S, F, K> ScheduleTimer<S, F, K>
where
    S: SettingsStore + Send + Sync + 'static,
    F: ClientFactory + Send + Sync + 'static,
    K: Clock + 'static,
{
    pub fn new(
        settings: SettingsService<S>,
        registry: Arc<EffectRegistry<F>>,
        clock: K,
        interval: Duration,
    ) -> Self {
        Self {
            pass: SchedulePass {
                settings,
                registry,
                clock: Arc::new(clock),
            },
            interval,
            ticker: Mutex::new(None),
        }
    }

    /// Start ticking. The first tick fires right away.
    ///
    /// A timer that is already running keeps its interval and fires once.
    pub fn start(&self) {
        let mut ticker = self.lock_ticker();
        if ticker.as_ref().is_some_and(|handle| !handle.is_finished()) {
            drop(ticker);
            tracing::debug!("schedule timer already running");
            self.fire_now();
            return;
        }

        let pass = self.pass.clone();
        let period = self.interval;
        *ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                pass.dispatch();
            }
        }));
        tracing::info!(interval_secs = period.as_secs(), "schedule timer started");
    }

    /// Stop ticking. Passes already dispatched run to completion.
    pub fn stop(&self) {
        if let Some(handle) = self.lock_ticker().take() {
            handle.abort();
            tracing::info!("schedule timer stopped");
        }
    }

    /// Dispatch one evaluation pass for every device now.
    pub fn fire_now(&self) {
        self.pass.dispatch();
    }

    pub fn is_running(&self) -> bool {
        self.lock_ticker()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The pass the timer dispatches, for awaiting a single evaluation.
    pub fn pass(&self) -> &SchedulePass<S, F, K> {
        &self.pass
    }

    fn lock_ticker(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.ticker.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S, F: ClientFactory, K> Drop for ScheduleTimer<S, F, K> {
    fn drop(&mut self) {
        let ticker = self.ticker.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = ticker.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ClientFactory as _;
    use crate::testing::{
        Call, FixedClock, FixedSampler, InMemorySettingsStore, REFRESH, SpyClient, SpyFactory,
        eventually,
    };
    use chrono::{NaiveDate, NaiveDateTime};
    use panelhub_domain::device::Device;
    use panelhub_domain::effect::{AMBILIGHT_EFFECT, Rgb};
    use panelhub_domain::schedule::{Program, Schedule, Trigger};
    use panelhub_domain::settings::UserSettings;

    const ADDRESS: &str = "10.0.0.1";

    type TestTimer = ScheduleTimer<InMemorySettingsStore, Arc<SpyFactory>, Arc<FixedClock>>;

    // 2024-06-03 is a Monday.
    fn at(hours: u32, minutes: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(hours, minutes, 0)
            .unwrap()
    }

    fn schedule(triggers: Vec<Trigger>) -> Schedule {
        Schedule::builder()
            .name("Daily")
            .program(Program::new(triggers))
            .build()
            .unwrap()
    }

    struct Fixture {
        settings: SettingsService<InMemorySettingsStore>,
        clock: Arc<FixedClock>,
        client: Arc<SpyClient>,
        timer: TestTimer,
    }

    impl Fixture {
        fn new(triggers: Vec<Trigger>, interval: Duration) -> Self {
            let mut user = UserSettings::default();
            user.add_device(
                Device::builder()
                    .address(ADDRESS)
                    .name("Hallway")
                    .schedule(schedule(triggers))
                    .build()
                    .unwrap(),
            )
            .unwrap();
            let settings =
                SettingsService::with_settings(InMemorySettingsStore::default(), user);

            let factory = Arc::new(SpyFactory::new(&["EffectA", "EffectB", "Rainbow"]));
            let client = factory.client_for(ADDRESS);
            let registry = Arc::new(EffectRegistry::new(
                factory,
                Arc::new(FixedSampler(Rgb::new(4, 5, 6))),
                REFRESH,
            ));
            let clock = Arc::new(FixedClock::new(at(12, 0)));
            let timer = ScheduleTimer::new(
                settings.clone(),
                registry,
                Arc::clone(&clock),
                interval,
            );
            Self {
                settings,
                clock,
                client,
                timer,
            }
        }

        async fn evaluate(&self) -> Result<PassOutcome, PanelHubError> {
            self.timer.pass().evaluate_device(ADDRESS).await
        }
    }

    fn scenario_triggers() -> Vec<Trigger> {
        vec![
            Trigger::at(8, 0, "EffectA", 80),
            Trigger::at(18, 0, "EffectB", 40),
        ]
    }

    #[tokio::test]
    async fn should_activate_trigger_in_effect_at_current_time() {
        let fixture = Fixture::new(scenario_triggers(), DEFAULT_INTERVAL);

        for (time, effect) in [(at(12, 0), "EffectA"), (at(20, 0), "EffectB"), (at(2, 0), "EffectB")] {
            fixture.clock.set(time);
            let outcome = fixture.evaluate().await.unwrap();
            assert_eq!(
                outcome,
                PassOutcome::Activated {
                    effect: effect.to_string(),
                    brightness: if effect == "EffectA" { 80 } else { 40 },
                }
            );
        }
        assert_eq!(
            fixture.client.calls(),
            vec![
                Call::Effect("EffectA".into(), 80),
                Call::Effect("EffectB".into(), 40),
                Call::Effect("EffectB".into(), 40),
            ]
        );
    }

    #[tokio::test]
    async fn should_turn_off_when_no_trigger() {
        let fixture = Fixture::new(Vec::new(), DEFAULT_INTERVAL);

        let outcome = fixture.evaluate().await.unwrap();
        assert_eq!(outcome, PassOutcome::TurnedOff);
        assert_eq!(fixture.client.calls(), vec![Call::State(false)]);
    }

    #[tokio::test]
    async fn should_skip_state_call_when_already_off() {
        let fixture = Fixture::new(Vec::new(), DEFAULT_INTERVAL);
        fixture.client.set_on(false);

        fixture.evaluate().await.unwrap();
        assert!(fixture.client.calls().is_empty());
    }

    #[tokio::test]
    async fn should_not_touch_device_in_manual_mode() {
        let fixture = Fixture::new(scenario_triggers(), DEFAULT_INTERVAL);
        fixture
            .settings
            .set_operation_mode(ADDRESS, OperationMode::Manual)
            .await
            .unwrap();

        let outcome = fixture.evaluate().await.unwrap();
        assert_eq!(outcome, PassOutcome::Skipped);
        assert!(fixture.client.calls().is_empty());
    }

    #[tokio::test]
    async fn should_stop_ambilight_before_scheduled_device_effect() {
        let fixture = Fixture::new(
            vec![
                Trigger::at(8, 0, AMBILIGHT_EFFECT, 60),
                Trigger::at(18, 0, "Rainbow", 70),
            ],
            DEFAULT_INTERVAL,
        );
        fixture.evaluate().await.unwrap();
        assert!(eventually(|| fixture.client.calls().len() >= 2).await);

        fixture.clock.set(at(19, 0));
        fixture.evaluate().await.unwrap();
        let last = fixture.client.calls().last().cloned();
        assert_eq!(last, Some(Call::Effect("Rainbow".into(), 70)));

        fixture.client.clear();
        tokio::time::sleep(REFRESH * 5).await;
        assert!(fixture.client.calls().is_empty());
    }

    #[tokio::test]
    async fn should_report_unknown_device() {
        let fixture = Fixture::new(scenario_triggers(), DEFAULT_INTERVAL);
        let result = fixture.timer.pass().evaluate_device("10.9.9.9").await;
        assert!(matches!(result, Err(PanelHubError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_evaluate_every_device() {
        let fixture = Fixture::new(scenario_triggers(), DEFAULT_INTERVAL);
        let outcomes = fixture.timer.pass().evaluate_all().await;
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].0, ADDRESS);
        assert!(outcomes[0].1.is_ok());
    }

    #[tokio::test]
    async fn should_fire_immediately_on_start() {
        let fixture = Fixture::new(scenario_triggers(), DEFAULT_INTERVAL);

        fixture.timer.start();
        assert!(fixture.timer.is_running());
        assert!(eventually(|| !fixture.client.calls().is_empty()).await);
        assert_eq!(
            fixture.client.calls()[0],
            Call::Effect("EffectA".into(), 80)
        );

        fixture.timer.stop();
        assert!(!fixture.timer.is_running());
    }

    #[tokio::test]
    async fn should_fire_again_on_every_tick() {
        let fixture = Fixture::new(scenario_triggers(), Duration::from_millis(10));

        fixture.timer.start();
        assert!(eventually(|| fixture.client.calls().len() >= 3).await);
        fixture.timer.stop();
    }

    #[tokio::test]
    async fn should_keep_ticking_after_failed_pass() {
        let fixture = Fixture::new(scenario_triggers(), Duration::from_millis(10));
        fixture.client.fail_calls(true);

        fixture.timer.start();
        tokio::time::sleep(Duration::from_millis(30)).await;
        fixture.client.fail_calls(false);

        assert!(eventually(|| !fixture.client.calls().is_empty()).await);
        assert!(fixture.timer.is_running());
        fixture.timer.stop();
    }

    #[tokio::test]
    async fn should_fire_once_when_started_twice() {
        let fixture = Fixture::new(scenario_triggers(), DEFAULT_INTERVAL);

        fixture.timer.start();
        assert!(eventually(|| fixture.client.calls().len() == 1).await);
        fixture.timer.start();
        assert!(eventually(|| fixture.client.calls().len() == 2).await);
        assert!(fixture.timer.is_running());
        fixture.timer.stop();
    }

    #[tokio::test]
    async fn should_fire_now_while_stopped() {
        let fixture = Fixture::new(scenario_triggers(), DEFAULT_INTERVAL);

        fixture.timer.fire_now();
        assert!(eventually(|| !fixture.client.calls().is_empty()).await);
        assert!(!fixture.timer.is_running());
    }
}
