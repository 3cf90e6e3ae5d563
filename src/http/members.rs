use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Utc;

use crate::models::members::{
    MemberProfileFields, MemberRegistrationRequest, MemberRosterView, MemberView,
};
use crate::registry;
use crate::state::AppState;

use super::HttpError;
use super::auth::CurrentActor;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_roster).post(register_member))
        .route("/{user_id}", put(update_member).delete(remove_member))
        .route("/{user_id}/absence", post(toggle_absence))
}

async fn get_roster(
    State(state): State<AppState>,
    current: CurrentActor,
) -> Result<Json<MemberRosterView>, HttpError> {
    current.require_secretariat()?;

    let members = registry::list_members(&state.database, false)
        .await?
        .into_iter()
        .map(|(profile, seat)| MemberView::new(profile, seat.as_ref()))
        .collect();
    let member_limit =
        registry::member_limit(&state.database, state.chamber.fallback_member_limit).await?;
    Ok(Json(MemberRosterView {
        members,
        member_limit,
    }))
}

async fn register_member(
    State(state): State<AppState>,
    current: CurrentActor,
    Json(request): Json<MemberRegistrationRequest>,
) -> Result<(StatusCode, Json<MemberView>), HttpError> {
    current.require_secretariat()?;

    let profile = registry::register_member(
        &state.database,
        &request.username,
        &request.password,
        request.email.as_deref(),
        &request.profile,
        state.chamber.fallback_member_limit,
        Utc::now(),
    )
    .await?;
    let view = member_view(&state, profile).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn update_member(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    current: CurrentActor,
    Json(fields): Json<MemberProfileFields>,
) -> Result<Json<MemberView>, HttpError> {
    current.require_secretariat()?;
    let profile = registry::update_member(&state.database, user_id, &fields).await?;
    Ok(Json(member_view(&state, profile).await?))
}

async fn remove_member(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    current: CurrentActor,
) -> Result<StatusCode, HttpError> {
    current.require_secretariat()?;
    if user_id == current.actor.user_id() {
        return Err(HttpError::new(
            StatusCode::CONFLICT,
            "cannot remove your own account".to_string(),
        ));
    }
    registry::remove_member(&state.database, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_absence(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    current: CurrentActor,
) -> Result<Json<MemberView>, HttpError> {
    current.require_secretariat()?;
    let profile = registry::toggle_absence(&state.database, user_id).await?;
    Ok(Json(member_view(&state, profile).await?))
}

async fn member_view(
    state: &AppState,
    profile: crate::entities::member_profile::Model,
) -> Result<MemberView, HttpError> {
    let seat = registry::find_seat(&state.database, profile.board_seat_id).await?;
    Ok(MemberView::new(profile, seat.as_ref()))
}
