//! JSON REST handlers for devices.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use panelhub_app::ports::{ClientFactory, Clock, SettingsStore};
use panelhub_domain::device::{Device, OperationMode};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for registering a device.
#[derive(Deserialize)]
pub struct CreateDeviceRequest {
    pub address: String,
    pub name: String,
}

#[derive(Deserialize)]
pub struct OperationModeRequest {
    pub mode: OperationMode,
}

/// Request body for selecting an effect by hand.
#[derive(Deserialize)]
pub struct ActivateEffectRequest {
    pub effect: String,
    pub brightness: u8,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomEffectView {
    pub name: String,
    pub active: bool,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Device>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<Device>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Device>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

pub enum CustomEffectsResponse {
    Ok(Json<Vec<CustomEffectView>>),
}

impl IntoResponse for CustomEffectsResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Response of endpoints that only change state.
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

/// `GET /api/devices`
pub async fn list<S, F, K>(State(state): State<AppState<S, F, K>>) -> ListResponse
where
    S: SettingsStore + Send + Sync + 'static,
    F: ClientFactory + Send + Sync + 'static,
    K: Clock + 'static,
{
    ListResponse::Ok(Json(state.settings.devices().await))
}

/// `GET /api/devices/{address}`
pub async fn get<S, F, K>(
    State(state): State<AppState<S, F, K>>,
    Path(address): Path<String>,
) -> Result<GetResponse, ApiError>
where
    S: SettingsStore + Send + Sync + 'static,
    F: ClientFactory + Send + Sync + 'static,
    K: Clock + 'static,
{
    let device = state.settings.device(&address).await?;
    Ok(GetResponse::Ok(Json(device)))
}

/// `POST /api/devices`
pub async fn create<S, F, K>(
    State(state): State<AppState<S, F, K>>,
    Json(req): Json<CreateDeviceRequest>,
) -> Result<CreateResponse, ApiError>
where
    S: SettingsStore + Send + Sync + 'static,
    F: ClientFactory + Send + Sync + 'static,
    K: Clock + 'static,
{
    let device = Device::builder()
        .address(req.address)
        .name(req.name)
        .build()?;
    let created = state.settings.add_device(device).await?;
    state.timer.fire_now();
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT /api/devices/{address}/operation-mode`
pub async fn set_operation_mode<S, F, K>(
    State(state): State<AppState<S, F, K>>,
    Path(address): Path<String>,
    Json(req): Json<OperationModeRequest>,
) -> Result<UpdateResponse, ApiError>
where
    S: SettingsStore + Send + Sync + 'static,
    F: ClientFactory + Send + Sync + 'static,
    K: Clock + 'static,
{
    state
        .settings
        .set_operation_mode(&address, req.mode)
        .await?;
    state.timer.fire_now();
    Ok(UpdateResponse::NoContent)
}

/// `PUT /api/devices/{address}/effect`
///
/// Hands the device over to manual control, then shows the requested effect.
/// A failed activation gives the device back its previous operation mode.
pub async fn activate_effect<S, F, K>(
    State(state): State<AppState<S, F, K>>,
    Path(address): Path<String>,
    Json(req): Json<ActivateEffectRequest>,
) -> Result<UpdateResponse, ApiError>
where
    S: SettingsStore + Send + Sync + 'static,
    F: ClientFactory + Send + Sync + 'static,
    K: Clock + 'static,
{
    let previous = state.settings.device(&address).await?.operation_mode;
    state
        .settings
        .set_operation_mode(&address, OperationMode::Manual)
        .await?;

    let activation = state
        .registry
        .orchestrator(&address)
        .activate_effect(&req.effect, req.brightness)
        .await;
    if let Err(err) = activation {
        if previous != OperationMode::Manual {
            if let Err(restore_err) = state.settings.set_operation_mode(&address, previous).await {
                tracing::warn!(%address, error = ?restore_err, "failed to restore operation mode");
            }
            state.timer.fire_now();
        }
        return Err(err.into());
    }
    Ok(UpdateResponse::NoContent)
}

/// `GET /api/devices/{address}/custom-effects`
pub async fn custom_effects<S, F, K>(
    State(state): State<AppState<S, F, K>>,
    Path(address): Path<String>,
) -> Result<CustomEffectsResponse, ApiError>
where
    S: SettingsStore + Send + Sync + 'static,
    F: ClientFactory + Send + Sync + 'static,
    K: Clock + 'static,
{
    state.settings.device(&address).await?;
    let effects = state.registry.effects_for(&address);
    let active = effects.active_effect();
    let views = effects
        .names()
        .into_iter()
        .map(|effect| CustomEffectView {
            active: active == Some(effect.name.as_str()),
            name: effect.name,
        })
        .collect();
    Ok(CustomEffectsResponse::Ok(Json(views)))
}
