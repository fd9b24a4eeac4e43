use crate::alerts::AlertStore;
use crate::config::{ApiConfig, GeocodingConfig};
use crate::devices::DeviceRegistry;
use crate::error::Error;
use crate::geocoding::{self, tiles, Geocoder};
use crate::incidents::{IncidentLogBook, IncidentQuery};
use crate::messaging::bus::EventBus;
use crate::messaging::event::EventType;
use crate::security::auth::AuthService;
use crate::security::{Claims, SecurityService};
use crate::simulation::health::HealthMonitor;
use crate::storage::models::alert_models::{AccidentAlert, SystemHealth};
use crate::storage::models::user_models::{
    AuthToken, LoginCredentials, SessionUser, UserRole,
};
use crate::storage::models::v2x_models::{
    DeviceConfig, IncidentLog, IncidentStatus, NetworkMetrics, Obu, Rsu,
};
use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use log::info;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use uuid::Uuid;

use super::websocket;

// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub alerts: Arc<AlertStore>,
    pub devices: Arc<DeviceRegistry>,
    pub incidents: Arc<IncidentLogBook>,
    pub health: Arc<HealthMonitor>,
    pub auth: Arc<AuthService>,
    pub security: Arc<SecurityService>,
    pub bus: EventBus,
    pub geocoder: Arc<dyn Geocoder>,
    pub geocoding: GeocodingConfig,
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub message: String,
    pub status: u16,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Authentication(_) => ApiError {
                message: err.to_string(),
                status: StatusCode::UNAUTHORIZED.as_u16(),
            },
            Error::Authorization(_) => ApiError {
                message: err.to_string(),
                status: StatusCode::FORBIDDEN.as_u16(),
            },
            Error::NotFound(_) => ApiError {
                message: err.to_string(),
                status: StatusCode::NOT_FOUND.as_u16(),
            },
            Error::AlreadyExists(_) => ApiError {
                message: err.to_string(),
                status: StatusCode::CONFLICT.as_u16(),
            },
            Error::Validation(_) | Error::Config(_) => ApiError {
                message: err.to_string(),
                status: StatusCode::BAD_REQUEST.as_u16(),
            },
            _ => ApiError {
                message: err.to_string(),
                status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            },
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(err) = err.downcast_ref::<Error>() {
            return err.clone().into();
        }

        ApiError {
            message: err.to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
        }
    }
}

/// Implement IntoResponse for ApiError
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(self);
        (status, body).into_response()
    }
}

/// Extract and validate the bearer token; 401 when absent or invalid
pub fn authenticate(state: &AppState, headers: &HeaderMap) -> ApiResult<Claims> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(ApiError {
            message: "Missing bearer token".to_string(),
            status: StatusCode::UNAUTHORIZED.as_u16(),
        })?;

    let data = state.security.validate_token(token)?;
    Ok(data.claims)
}

// Admin-only routes reject with 403 rather than redirecting
fn require_admin(state: &AppState, claims: &Claims) -> ApiResult<()> {
    if !state.security.has_role(claims, UserRole::Admin) {
        return Err(ApiError {
            message: "Admin role required".to_string(),
            status: StatusCode::FORBIDDEN.as_u16(),
        });
    }
    Ok(())
}

pub struct RestApi {
    config: ApiConfig,
    state: AppState,
}

impl RestApi {
    pub fn new(config: &ApiConfig, state: AppState) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            state,
        })
    }

    pub async fn run(&self) -> Result<()> {
        // Create a CORS layer that allows all origins and preflight requests
        use std::time::Duration;
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .allow_credentials(false)
            .max_age(Duration::from_secs(3600));

        // Build the API router with routes
        let app = Router::new()
            // Auth routes
            .route("/api/auth/login", post(login))
            .route("/api/auth/logout", post(logout))
            .route("/api/auth/me", get(current_user))
            // User management routes (admin)
            .route("/api/users", get(list_users).post(create_user))
            .route("/api/users/:id", delete(remove_user))
            // Alert routes
            .route("/api/overview", get(overview))
            .route("/api/alerts", get(list_alerts))
            .route("/api/alerts/selected", get(selected_alert).put(select_alert))
            .route("/api/alerts/:id", get(get_alert))
            .route("/api/alerts/:id/acknowledge", post(acknowledge_alert))
            .route("/api/alerts/:id/dispatch", post(dispatch_alert))
            .route("/api/alerts/:id/resolve", post(resolve_alert))
            // Device routes
            .route("/api/devices/rsus", get(list_rsus))
            .route("/api/devices/obus", get(list_obus))
            .route("/api/devices/configs", get(list_device_configs))
            .route(
                "/api/devices/configs/:id",
                get(get_device_config).put(update_device_config),
            )
            .route("/api/devices/configs/:id/reset", post(reset_device_config))
            // Incident log routes
            .route("/api/incidents", get(list_incidents))
            .route("/api/incidents/export", get(export_incidents))
            // Health routes
            .route("/api/health", get(system_health))
            .route("/api/health/metrics", get(network_metrics))
            // Geocoding and map routes
            .route("/api/geocode/reverse", get(reverse_geocode))
            .route("/api/map/tile-url", get(map_tile_url))
            // Live event stream
            .route("/api/ws/events", get(websocket::events_handler))
            .with_state(self.state.clone())
            // Serve the dashboard assets from the public directory
            .nest_service("/", ServeDir::new("public"))
            // Apply CORS middleware to all routes
            .layer(cors);

        // Build the server address
        let addr = self.config.address.clone() + ":" + &self.config.port.to_string();
        let addr: SocketAddr = addr.parse()?;

        info!("API server listening on {}", addr);

        let listener = TcpListener::bind(addr).await?;

        axum::Server::from_tcp(listener.into_std()?)?
            .serve(app.into_make_service())
            .await?;

        Ok(())
    }
}

// ---- Auth handlers ----

#[derive(Debug, Serialize)]
struct LoginResponse {
    user: SessionUser,
    token: AuthToken,
}

async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<LoginCredentials>,
) -> ApiResult<Json<LoginResponse>> {
    let (user, token) = state.auth.login(&credentials).await?;
    Ok(Json(LoginResponse { user, token }))
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<StatusCode> {
    authenticate(&state, &headers)?;
    state.auth.logout().await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn current_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<SessionUser>> {
    let claims = authenticate(&state, &headers)?;
    Ok(Json(claims.session_user()?))
}

// ---- User management handlers ----

#[derive(Debug, Deserialize)]
struct CreateUserRequest {
    email: String,
    password: String,
    role: UserRole,
}

async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<SessionUser>>> {
    let claims = authenticate(&state, &headers)?;
    require_admin(&state, &claims)?;

    let users = state.auth.list_users().await?;
    Ok(Json(users))
}

async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<SessionUser>)> {
    let claims = authenticate(&state, &headers)?;
    let caller = claims.session_user()?;

    let user = state
        .auth
        .add_user(&caller, &request.email, &request.password, request.role)
        .await?;

    let _ = state.bus.publish(
        EventType::UserCreated,
        Some(user.id.to_string()),
        serde_json::json!({ "email": user.email }),
    );

    Ok((StatusCode::CREATED, Json(SessionUser::from(&user))))
}

async fn remove_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let claims = authenticate(&state, &headers)?;
    let caller = claims.session_user()?;

    state.auth.remove_user(&caller, &id).await?;

    let _ = state
        .bus
        .publish(EventType::UserRemoved, Some(id.to_string()), ());

    Ok(StatusCode::NO_CONTENT)
}

// ---- Alert handlers ----

#[derive(Debug, Serialize)]
struct OverviewResponse {
    active_alerts: usize,
    dispatched_alerts: usize,
    vehicles_online: usize,
    rsus_online: usize,
    rsus_total: usize,
    average_rsu_uptime: f32,
    health: SystemHealth,
}

async fn overview(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<OverviewResponse>> {
    authenticate(&state, &headers)?;

    Ok(Json(OverviewResponse {
        active_alerts: state.alerts.active_count().await,
        dispatched_alerts: state.alerts.dispatched_count().await,
        vehicles_online: state.devices.active_obu_count().await,
        rsus_online: state.devices.online_rsu_count().await,
        rsus_total: state.devices.rsu_count().await,
        average_rsu_uptime: state.devices.average_rsu_uptime().await,
        health: state.health.health().await,
    }))
}

async fn list_alerts(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<AccidentAlert>>> {
    authenticate(&state, &headers)?;
    Ok(Json(state.alerts.triage_order().await))
}

async fn get_alert(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<AccidentAlert>> {
    authenticate(&state, &headers)?;

    let alert = state.alerts.get(&id).await.ok_or(ApiError {
        message: format!("Alert not found: {}", id),
        status: StatusCode::NOT_FOUND.as_u16(),
    })?;

    Ok(Json(alert))
}

#[derive(Debug, Deserialize)]
struct SelectRequest {
    alert_id: String,
}

async fn select_alert(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SelectRequest>,
) -> ApiResult<Json<Option<AccidentAlert>>> {
    authenticate(&state, &headers)?;
    Ok(Json(state.alerts.select(&request.alert_id).await))
}

async fn selected_alert(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Option<AccidentAlert>>> {
    authenticate(&state, &headers)?;
    Ok(Json(state.alerts.selected().await))
}

async fn acknowledge_alert(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<AccidentAlert>> {
    authenticate(&state, &headers)?;

    let alert = state.alerts.acknowledge(&id).await?;
    let _ = state.bus.publish(
        EventType::AlertAcknowledged,
        Some(alert.id.clone()),
        serde_json::json!({ "address": alert.address }),
    );

    Ok(Json(alert))
}

async fn dispatch_alert(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<AccidentAlert>> {
    authenticate(&state, &headers)?;

    let alert = state.alerts.dispatch(&id).await?;

    info!("Emergency response dispatched to {}", alert.address);
    let _ = state.bus.publish(
        EventType::AlertDispatched,
        Some(alert.id.clone()),
        serde_json::json!({
            "address": alert.address,
            "message": format!("Units dispatched to {}", alert.address),
        }),
    );

    Ok(Json(alert))
}

async fn resolve_alert(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<AccidentAlert>> {
    authenticate(&state, &headers)?;

    let alert = state.alerts.resolve(&id).await?;
    let _ = state.bus.publish(
        EventType::AlertResolved,
        Some(alert.id.clone()),
        serde_json::json!({ "address": alert.address }),
    );

    Ok(Json(alert))
}

// ---- Device handlers ----

async fn list_rsus(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Rsu>>> {
    authenticate(&state, &headers)?;
    Ok(Json(state.devices.rsus().await))
}

async fn list_obus(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Obu>>> {
    authenticate(&state, &headers)?;
    Ok(Json(state.devices.obus().await))
}

async fn list_device_configs(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<DeviceConfig>>> {
    authenticate(&state, &headers)?;
    Ok(Json(state.devices.configs().await))
}

async fn get_device_config(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<DeviceConfig>> {
    authenticate(&state, &headers)?;

    let config = state.devices.config(&id).await.ok_or(ApiError {
        message: format!("Device not found: {}", id),
        status: StatusCode::NOT_FOUND.as_u16(),
    })?;

    Ok(Json(config))
}

async fn update_device_config(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(mut config): Json<DeviceConfig>,
) -> ApiResult<Json<DeviceConfig>> {
    authenticate(&state, &headers)?;

    // the path segment names the device; the body cannot redirect it
    config.device_id = id;
    let updated = state.devices.update_config(config).await?;

    let _ = state.bus.publish(
        EventType::DeviceConfigUpdated,
        Some(updated.device_id.clone()),
        &updated,
    );

    Ok(Json(updated))
}

async fn reset_device_config(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<DeviceConfig>> {
    authenticate(&state, &headers)?;

    let restored = state.devices.reset_config(&id).await?;

    let _ = state.bus.publish(
        EventType::DeviceConfigUpdated,
        Some(restored.device_id.clone()),
        &restored,
    );

    Ok(Json(restored))
}

// ---- Incident log handlers ----

#[derive(Debug, Deserialize)]
struct IncidentQueryParams {
    search: Option<String>,
    status: Option<String>,
}

fn parse_incident_query(params: IncidentQueryParams) -> ApiResult<IncidentQuery> {
    let status = match params.status.as_deref() {
        None | Some("all") => None,
        Some(raw) => Some(IncidentStatus::parse(raw).ok_or(ApiError {
            message: format!("Unknown incident status: {}", raw),
            status: StatusCode::BAD_REQUEST.as_u16(),
        })?),
    };

    Ok(IncidentQuery {
        search: params.search,
        status,
    })
}

async fn list_incidents(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<IncidentQueryParams>,
) -> ApiResult<Json<Vec<IncidentLog>>> {
    authenticate(&state, &headers)?;

    let query = parse_incident_query(params)?;
    Ok(Json(state.incidents.query(&query).await))
}

async fn export_incidents(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<IncidentQueryParams>,
) -> ApiResult<Response> {
    authenticate(&state, &headers)?;

    let query = parse_incident_query(params)?;
    let logs = state.incidents.query(&query).await;
    let csv = IncidentLogBook::export_csv(&logs);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"incident-logs.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}

// ---- Health handlers ----

async fn system_health(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<SystemHealth>> {
    authenticate(&state, &headers)?;
    Ok(Json(state.health.health().await))
}

async fn network_metrics(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<NetworkMetrics>> {
    authenticate(&state, &headers)?;
    Ok(Json(state.health.metrics().await))
}

// ---- Geocoding and map handlers ----

#[derive(Debug, Deserialize)]
struct GeocodeQuery {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Serialize)]
struct AddressResponse {
    address: String,
}

async fn reverse_geocode(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<GeocodeQuery>,
) -> ApiResult<Json<AddressResponse>> {
    authenticate(&state, &headers)?;

    // degrades to formatted coordinates, never errors
    let address = geocoding::reverse_or_coords(&*state.geocoder, query.lat, query.lng).await;
    Ok(Json(AddressResponse { address }))
}

#[derive(Debug, Deserialize)]
struct TileQuery {
    lat: f64,
    lng: f64,
    zoom: Option<u8>,
}

#[derive(Debug, Serialize)]
struct TileUrlResponse {
    url: String,
}

async fn map_tile_url(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TileQuery>,
) -> ApiResult<Json<TileUrlResponse>> {
    authenticate(&state, &headers)?;

    let zoom = query.zoom.unwrap_or(state.geocoding.tile_zoom);
    let url = tiles::tile_url(&state.geocoding.tile_template, query.lat, query.lng, zoom);
    Ok(Json(TileUrlResponse { url }))
}
