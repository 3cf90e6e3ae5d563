use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::Method;
use axum::http::StatusCode;
use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::registry::RegistryError;
use crate::state::AppState;
use crate::voting::VotingError;

mod admin;
mod auth;
mod bills;
mod members;
mod results;

pub fn router(state: AppState) -> Router {
    // The scoreboard is served to browsers on other origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ACCEPT, AUTHORIZATION, CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    let auth_router = auth::router().with_state(state.clone());
    let admin_router = admin::router().with_state(state.clone());
    let members_router = members::router().with_state(state.clone());
    let bills_router = bills::router().with_state(state.clone());
    let results_router = results::router().with_state(state.clone());
    Router::new()
        .route("/health", get(health_live))
        .route("/health/ready", get(health_ready))
        .nest("/auth", auth_router)
        .nest("/admin", admin_router)
        .nest("/secretariat/members", members_router)
        .merge(bills_router)
        .merge(results_router)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_live(State(state): State<AppState>) -> Result<Json<HealthResponse>, HttpError> {
    let uptime = state.start_time.elapsed().as_secs();
    let response = HealthResponse {
        status: "live",
        uptime_seconds: uptime,
    };
    Ok(Json(response))
}

async fn health_ready(State(state): State<AppState>) -> Result<Json<ReadyResponse>, HttpError> {
    state
        .database
        .ping()
        .await
        .map_err(|err| HttpError::new(StatusCode::SERVICE_UNAVAILABLE, err.to_string()))?;

    let response = ReadyResponse {
        status: "ready",
        active_sessions: state.sessions.entry_count(),
    };
    Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_seconds: u64,
}

#[derive(Debug, Serialize)]
struct ReadyResponse {
    status: &'static str,
    active_sessions: u64,
}

#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    pub fn new(status: StatusCode, message: String) -> Self {
        assert!(status != StatusCode::OK, "Error status cannot be 200");
        assert!(!message.is_empty(), "Error message cannot be empty");
        Self { status, message }
    }

    pub fn forbidden(message: &str) -> Self {
        Self::new(StatusCode::FORBIDDEN, message.to_string())
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("HTTP error {}: {}", self.status, self.message);
        } else {
            info!("HTTP error {}: {}", self.status, self.message);
        }
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<VotingError> for HttpError {
    fn from(err: VotingError) -> Self {
        let status = match &err {
            VotingError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            VotingError::NotFound { .. } => StatusCode::NOT_FOUND,
            VotingError::InvalidTransition { .. } => StatusCode::CONFLICT,
            VotingError::VotingClosed { .. } => StatusCode::CONFLICT,
            VotingError::MemberAbsent => StatusCode::FORBIDDEN,
            VotingError::AlreadyVoted { .. } => StatusCode::CONFLICT,
            VotingError::Validation(_) => StatusCode::BAD_REQUEST,
        };
        Self::new(status, err.to_string())
    }
}

impl From<RegistryError> for HttpError {
    fn from(err: RegistryError) -> Self {
        let status = match &err {
            RegistryError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RegistryError::NotFound { .. } => StatusCode::NOT_FOUND,
            RegistryError::Validation(_) => StatusCode::BAD_REQUEST,
            RegistryError::Conflict(_) => StatusCode::CONFLICT,
            RegistryError::LimitReached { .. } => StatusCode::CONFLICT,
            RegistryError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            RegistryError::TokenExpired => StatusCode::GONE,
            RegistryError::AlreadyActive { .. } => StatusCode::CONFLICT,
            RegistryError::Hashing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}
