//! JSON REST handlers for the schedules of a device.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use panelhub_app::ports::{ClientFactory, Clock, SettingsStore};
use panelhub_domain::error::{NotFoundError, PanelHubError};
use panelhub_domain::schedule::Schedule;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Schedule>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the update and activate endpoints.
pub enum UpdateResponse {
    NoContent,
}

impl IntoResponse for UpdateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    Ok(Json<Schedule>),
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `POST /api/devices/{address}/schedules`
pub async fn create<S, F, K>(
    State(state): State<AppState<S, F, K>>,
    Path(address): Path<String>,
    Json(schedule): Json<Schedule>,
) -> Result<CreateResponse, ApiError>
where
    S: SettingsStore + Send + Sync + 'static,
    F: ClientFactory + Send + Sync + 'static,
    K: Clock + 'static,
{
    let name = schedule.name.clone();
    state.settings.add_schedule(&address, schedule).await?;
    state.timer.fire_now();

    let device = state.settings.device(&address).await?;
    let created = device.schedule(&name).cloned().ok_or_else(|| {
        PanelHubError::from(NotFoundError {
            entity: "Schedule",
            id: name,
        })
    })?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT /api/devices/{address}/schedules/{name}`
pub async fn update<S, F, K>(
    State(state): State<AppState<S, F, K>>,
    Path((address, name)): Path<(String, String)>,
    Json(schedule): Json<Schedule>,
) -> Result<UpdateResponse, ApiError>
where
    S: SettingsStore + Send + Sync + 'static,
    F: ClientFactory + Send + Sync + 'static,
    K: Clock + 'static,
{
    state
        .settings
        .update_schedule(&address, &name, schedule)
        .await?;
    state.timer.fire_now();
    Ok(UpdateResponse::NoContent)
}

/// `DELETE /api/devices/{address}/schedules/{name}`
pub async fn delete<S, F, K>(
    State(state): State<AppState<S, F, K>>,
    Path((address, name)): Path<(String, String)>,
) -> Result<DeleteResponse, ApiError>
where
    S: SettingsStore + Send + Sync + 'static,
    F: ClientFactory + Send + Sync + 'static,
    K: Clock + 'static,
{
    let removed = state.settings.delete_schedule(&address, &name).await?;
    state.timer.fire_now();
    Ok(DeleteResponse::Ok(Json(removed)))
}

/// `POST /api/devices/{address}/schedules/{name}/activate`
pub async fn activate<S, F, K>(
    State(state): State<AppState<S, F, K>>,
    Path((address, name)): Path<(String, String)>,
) -> Result<UpdateResponse, ApiError>
where
    S: SettingsStore + Send + Sync + 'static,
    F: ClientFactory + Send + Sync + 'static,
    K: Clock + 'static,
{
    state.settings.activate_schedule(&address, &name).await?;
    state.timer.fire_now();
    Ok(UpdateResponse::NoContent)
}
