//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod devices;
#[allow(clippy::missing_errors_doc)]
pub mod schedules;
#[allow(clippy::missing_errors_doc)]
pub mod settings;
pub mod timer;

use axum::Router;
use axum::routing::{get, post, put};

use panelhub_app::ports::{ClientFactory, Clock, SettingsStore};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<S, F, K>() -> Router<AppState<S, F, K>>
where
    S: SettingsStore + Send + Sync + 'static,
    F: ClientFactory + Send + Sync + 'static,
    K: Clock + 'static,
{
    Router::new()
        // Devices
        .route(
            "/devices",
            get(devices::list::<S, F, K>).post(devices::create::<S, F, K>),
        )
        .route("/devices/{address}", get(devices::get::<S, F, K>))
        .route(
            "/devices/{address}/operation-mode",
            put(devices::set_operation_mode::<S, F, K>),
        )
        .route(
            "/devices/{address}/effect",
            put(devices::activate_effect::<S, F, K>),
        )
        .route(
            "/devices/{address}/custom-effects",
            get(devices::custom_effects::<S, F, K>),
        )
        // Schedules
        .route(
            "/devices/{address}/schedules",
            post(schedules::create::<S, F, K>),
        )
        .route(
            "/devices/{address}/schedules/{name}",
            put(schedules::update::<S, F, K>).delete(schedules::delete::<S, F, K>),
        )
        .route(
            "/devices/{address}/schedules/{name}/activate",
            post(schedules::activate::<S, F, K>),
        )
        // Settings
        .route("/sun-times", put(settings::set_sun_times::<S, F, K>))
        .route("/location", put(settings::set_location::<S, F, K>))
        // Timer
        .route("/timer", get(timer::status::<S, F, K>))
        .route("/timer/start", post(timer::start::<S, F, K>))
        .route("/timer/stop", post(timer::stop::<S, F, K>))
        .route("/timer/fire", post(timer::fire::<S, F, K>))
}
