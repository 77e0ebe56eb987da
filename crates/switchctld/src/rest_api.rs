//! REST API handlers for switchctld
//!
//! Provides HTTP endpoints using the Axum web framework. Handlers are thin:
//! they extract parameters, call [`FleetService`] and map [`CoreError`]
//! onto HTTP status codes.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::error::Error as _;
use std::sync::Arc;
use tracing::{error, info, warn};

use switchctl_core::{ConfigReport, CoreError, FleetService, MacSighting, PortStatus, VlanChange};

/// Shared handler state
pub struct AppState {
    /// Fleet operations
    pub service: FleetService,
}

impl AppState {
    /// Create new handler state
    pub fn new(service: FleetService) -> Self {
        Self { service }
    }
}

/// Error response structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ApiErrorResponse {
    /// HTTP status code
    pub code: u16,
    /// Error message
    pub message: String,
    /// Optional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Handler error carrying its HTTP mapping
#[derive(Debug)]
pub struct ApiError(pub ApiErrorResponse);

impl ApiError {
    /// HTTP status of this error
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = err.http_status();
        if code >= 500 {
            error!(error = %err, "Request failed");
        } else {
            warn!(error = %err, "Request rejected");
        }

        Self(ApiErrorResponse {
            code,
            message: err.to_string(),
            details: err.source().map(|s| s.to_string()),
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.0)).into_response()
    }
}

/// Handler result type
pub type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

/// Query parameters for /get-config
#[derive(Debug, Default, Deserialize)]
pub struct GetConfigQuery {
    pub hostname: Option<String>,
}

/// Form fields for /change-vlan
#[derive(Debug, Default, Deserialize)]
pub struct ChangeVlanForm {
    pub host: Option<String>,
    pub interface: Option<String>,
    pub new_vlan: Option<String>,
    pub description: Option<String>,
}

/// Query parameters for /port-status
#[derive(Debug, Default, Deserialize)]
pub struct PortStatusQuery {
    pub host: Option<String>,
    pub interface: Option<String>,
}

/// Query parameters for /find-mac
#[derive(Debug, Default, Deserialize)]
pub struct FindMacQuery {
    pub mac: Option<String>,
}

/// Health check body
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthInfo {
    pub status: String,
    pub devices: usize,
}

/// Build the HTTP router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/get-config", get(get_config))
        .route("/change-vlan", post(change_vlan))
        .route("/port-status", get(port_status))
        .route("/find-mac", get(find_mac))
        .route("/health", get(health))
        .with_state(state)
}

/// GET /get-config?hostname=
pub async fn get_config(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GetConfigQuery>,
) -> ApiResult<ConfigReport> {
    let hostname = query.hostname.unwrap_or_default();
    let report = state.service.get_config(&hostname).await?;
    Ok(Json(report))
}

/// POST /change-vlan
pub async fn change_vlan(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ChangeVlanForm>,
) -> ApiResult<VlanChange> {
    let change = state
        .service
        .change_vlan(
            form.host.as_deref().unwrap_or_default(),
            form.interface.as_deref().unwrap_or_default(),
            form.new_vlan.as_deref().unwrap_or_default(),
            form.description.as_deref(),
        )
        .await?;

    info!(
        host = %change.host,
        interface = %change.interface,
        vlan = %change.vlan,
        "VLAN change applied"
    );
    Ok(Json(change))
}

/// GET /port-status?host=&interface=
pub async fn port_status(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PortStatusQuery>,
) -> ApiResult<PortStatus> {
    let status = state
        .service
        .get_port_status(
            query.host.as_deref().unwrap_or_default(),
            query.interface.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok(Json(status))
}

/// GET /find-mac?mac=
pub async fn find_mac(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FindMacQuery>,
) -> ApiResult<Vec<MacSighting>> {
    let sightings = state
        .service
        .find_mac(query.mac.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(sightings))
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthInfo> {
    Json(HealthInfo {
        status: "ok".to_string(),
        devices: state.service.device_count(),
    })
}
