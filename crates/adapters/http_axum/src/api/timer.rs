//! Schedule timer control.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use panelhub_app::ports::{ClientFactory, Clock, SettingsStore};

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimerStatus {
    pub running: bool,
    pub interval_secs: u64,
}

pub enum StatusResponse {
    Ok(Json<TimerStatus>),
}

impl IntoResponse for StatusResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

pub enum ControlResponse {
    Accepted,
}

impl IntoResponse for ControlResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Accepted => StatusCode::ACCEPTED.into_response(),
        }
    }
}

/// `GET /api/timer`
pub async fn status<S, F, K>(State(state): State<AppState<S, F, K>>) -> StatusResponse
where
    S: SettingsStore + Send + Sync + 'static,
    F: ClientFactory + Send + Sync + 'static,
    K: Clock + 'static,
{
    StatusResponse::Ok(Json(TimerStatus {
        running: state.timer.is_running(),
        interval_secs: state.timer.interval().as_secs(),
    }))
}

/// `POST /api/timer/start`
pub async fn start<S, F, K>(State(state): State<AppState<S, F, K>>) -> ControlResponse
where
    S: SettingsStore + Send + Sync + 'static,
    F: ClientFactory + Send + Sync + 'static,
    K: Clock + 'static,
{
    state.timer.start();
    ControlResponse::Accepted
}

/// `POST /api/timer/stop`
pub async fn stop<S, F, K>(State(state): State<AppState<S, F, K>>) -> ControlResponse
where
    S: SettingsStore + Send + Sync + 'static,
    F: ClientFactory + Send + Sync + 'static,
    K: Clock + 'static,
{
    state.timer.stop();
    ControlResponse::Accepted
}

/// `POST /api/timer/fire`
pub async fn fire<S, F, K>(State(state): State<AppState<S, F, K>>) -> ControlResponse
where
    S: SettingsStore + Send + Sync + 'static,
    F: ClientFactory + Send + Sync + 'static,
    K: Clock + 'static,
{
    state.timer.fire_now();
    ControlResponse::Accepted
}
