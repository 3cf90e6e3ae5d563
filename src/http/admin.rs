use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::models::members::{
    BoardSeatCreateRequest, BoardSeatView, SystemConfigRequest, SystemConfigView,
};
use crate::registry;
use crate::state::AppState;

use super::HttpError;
use super::auth::CurrentActor;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/config",
            get(get_config).post(create_config).put(update_config),
        )
        .route("/seats", get(get_seats).post(create_seat))
}

async fn get_config(
    State(state): State<AppState>,
    current: CurrentActor,
) -> Result<Json<SystemConfigView>, HttpError> {
    current.require_superuser()?;

    let view = match registry::load_config(&state.database).await? {
        Some(config) => SystemConfigView::from(config),
        None => SystemConfigView {
            member_limit: state.chamber.fallback_member_limit,
            persisted: false,
        },
    };
    Ok(Json(view))
}

async fn create_config(
    State(state): State<AppState>,
    current: CurrentActor,
    Json(request): Json<SystemConfigRequest>,
) -> Result<(StatusCode, Json<SystemConfigView>), HttpError> {
    current.require_superuser()?;

    // A second row is never created; the stored one comes back unchanged
    let config = registry::create_config(&state.database, request.member_limit).await?;
    Ok((StatusCode::CREATED, Json(config.into())))
}

async fn update_config(
    State(state): State<AppState>,
    current: CurrentActor,
    Json(request): Json<SystemConfigRequest>,
) -> Result<Json<SystemConfigView>, HttpError> {
    current.require_superuser()?;
    let config = registry::update_config(&state.database, request.member_limit).await?;
    Ok(Json(config.into()))
}

async fn get_seats(
    State(state): State<AppState>,
    current: CurrentActor,
) -> Result<Json<Vec<BoardSeatView>>, HttpError> {
    if !current.actor.is_superuser() && !current.actor.is_secretariat() {
        return Err(HttpError::forbidden(
            "Access denied. Seats are managed by the superuser and the Secretariat.",
        ));
    }
    let seats = registry::list_seats(&state.database).await?;
    Ok(Json(seats.into_iter().map(BoardSeatView::from).collect()))
}

async fn create_seat(
    State(state): State<AppState>,
    current: CurrentActor,
    Json(request): Json<BoardSeatCreateRequest>,
) -> Result<(StatusCode, Json<BoardSeatView>), HttpError> {
    current.require_superuser()?;
    let seat = registry::create_seat(&state.database, &request.name, request.vote_weight).await?;
    Ok((StatusCode::CREATED, Json(seat.into())))
}
