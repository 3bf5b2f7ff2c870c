//! JSON REST handlers for location and sun times.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use panelhub_app::ports::{ClientFactory, Clock, SettingsStore};
use panelhub_domain::settings::{Location, SunTimes};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct SunTimesUpdated {
    /// Sunrise and sunset triggers moved onto the new times.
    pub rewritten: usize,
}

pub enum SunTimesResponse {
    Ok(Json<SunTimesUpdated>),
}

impl IntoResponse for SunTimesResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

pub enum LocationResponse {
    NoContent,
}

impl IntoResponse for LocationResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `PUT /api/sun-times`
pub async fn set_sun_times<S, F, K>(
    State(state): State<AppState<S, F, K>>,
    Json(sun_times): Json<SunTimes>,
) -> Result<SunTimesResponse, ApiError>
where
    S: SettingsStore + Send + Sync + 'static,
    F: ClientFactory + Send + Sync + 'static,
    K: Clock + 'static,
{
    let rewritten = state.settings.update_sunrise_sunset(sun_times).await?;
    state.timer.fire_now();
    Ok(SunTimesResponse::Ok(Json(SunTimesUpdated { rewritten })))
}

/// `PUT /api/location`
pub async fn set_location<S, F, K>(
    State(state): State<AppState<S, F, K>>,
    Json(location): Json<Location>,
) -> Result<LocationResponse, ApiError>
where
    S: SettingsStore + Send + Sync + 'static,
    F: ClientFactory + Send + Sync + 'static,
    K: Clock + 'static,
{
    state.settings.set_location(location).await?;
    state.timer.fire_now();
    Ok(LocationResponse::NoContent)
}
