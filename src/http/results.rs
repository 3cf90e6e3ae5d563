use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;

use crate::models::voting::{LiveResultsView, ScoreboardView};
use crate::state::AppState;
use crate::voting::service;

use super::HttpError;

/// Unauthenticated; polled by the public scoreboard.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/results/{bill_id}", get(get_results))
        .route("/scoreboard", get(get_scoreboard))
}

async fn get_results(
    Path(bill_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<LiveResultsView>, HttpError> {
    let results = service::live_results(&state.database, bill_id, Utc::now()).await?;
    Ok(Json(results))
}

async fn get_scoreboard(State(state): State<AppState>) -> Result<Json<ScoreboardView>, HttpError> {
    let now = Utc::now();
    let bill = match service::scoreboard_bill(&state.database).await? {
        Some(bill) => Some(service::live_results(&state.database, bill.id, now).await?),
        None => None,
    };
    let total_members = service::count_active_members(&state.database).await?;
    Ok(Json(ScoreboardView {
        bill,
        total_members,
    }))
}
