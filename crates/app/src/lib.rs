//! # panelhub-app
//!
//! Application layer: use-cases, orchestration and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `SettingsStore`: load & save the user settings document
//!   - `DeviceClient` / `ClientFactory`: talk to a light panel
//!   - `ColorSampler`: source of ambient colours for the ambilight effect
//!   - `Clock`: local wall-clock time
//! - Define **driving/inbound** use-cases:
//!   - `SettingsService`: the process-wide settings handle (devices, schedules, sun times)
//!   - `ScheduleTimer`: periodic and on-demand schedule evaluation
//! - Keep the **custom effect registry** and the per-device **orchestrator**
//!   that guarantees at most one custom effect drives a device at a time
//!
//! ## Dependency rule
//! Depends on `panelhub-domain` only (plus `tokio` for tasks, locks and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod effects;
pub mod orchestrator;
pub mod ports;
pub mod schedule_timer;
pub mod services;

#[cfg(test)]
mod testing;
