use std::cmp::Reverse;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;

use crate::entities::bill::{BillKind, BillStatus, QuorumKind};
use crate::entities::vote::VoteChoice;
use crate::models::members::MemberView;
use crate::models::voting::{
    BillCreateRequest, BillView, MemberPanelView, PresidingPanelView, SecretariatPanelView,
    VoteSubmissionRequest, VoteView,
};
use crate::registry;
use crate::state::AppState;
use crate::voting::lifecycle::Transition;
use crate::voting::service::{self, NewBill};
use crate::voting::window;

use super::HttpError;
use super::auth::CurrentActor;

const RECENTLY_CLOSED_LIMIT: usize = 5;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/secretariat/bills", get(secretariat_panel).post(create_bill))
        .route("/bills/{bill_id}", get(get_bill))
        .route("/bills/{bill_id}/agenda", post(place_on_agenda))
        .route("/bills/{bill_id}/withdraw", post(withdraw_from_agenda))
        .route("/bills/{bill_id}/open", post(open_voting))
        .route("/bills/{bill_id}/close", post(close_voting))
        .route("/bills/{bill_id}/votes", post(submit_vote))
        .route("/presiding/panel", get(presiding_panel))
        .route("/member/panel", get(member_panel))
}

async fn secretariat_panel(
    State(state): State<AppState>,
    current: CurrentActor,
) -> Result<Json<SecretariatPanelView>, HttpError> {
    current.require_secretariat()?;

    let mut bills = service::bills_with_status(&state.database, &[BillStatus::Preparation]).await?;
    bills.sort_by_key(|bill| Reverse((bill.created_at, bill.id)));
    Ok(Json(SecretariatPanelView {
        bills_in_preparation: bills.into_iter().map(BillView::from).collect(),
        is_superuser: current.actor.is_superuser(),
    }))
}

async fn create_bill(
    State(state): State<AppState>,
    current: CurrentActor,
    Json(request): Json<BillCreateRequest>,
) -> Result<(StatusCode, Json<BillView>), HttpError> {
    current.require_secretariat()?;

    let new_bill = NewBill {
        title: request.title,
        author: request.author,
        kind: request.kind.unwrap_or(BillKind::Ordinary),
        description: request.description,
        quorum_kind: request.quorum_kind.unwrap_or(QuorumKind::SimpleMajority),
        time_limit_seconds: request
            .time_limit_seconds
            .unwrap_or(state.chamber.default_time_limit_seconds),
    };
    let bill = service::create_bill(&state.database, new_bill, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(bill.into())))
}

async fn get_bill(
    Path(bill_id): Path<i32>,
    State(state): State<AppState>,
    _current: CurrentActor,
) -> Result<Json<BillView>, HttpError> {
    let bill = service::find_bill(&state.database, bill_id).await?;
    let bill = service::expire_if_elapsed(&state.database, bill, Utc::now()).await?;
    Ok(Json(bill.into()))
}

async fn place_on_agenda(
    Path(bill_id): Path<i32>,
    State(state): State<AppState>,
    current: CurrentActor,
) -> Result<Json<BillView>, HttpError> {
    transition(&state, &current, bill_id, Transition::PlaceOnAgenda).await
}

async fn withdraw_from_agenda(
    Path(bill_id): Path<i32>,
    State(state): State<AppState>,
    current: CurrentActor,
) -> Result<Json<BillView>, HttpError> {
    transition(&state, &current, bill_id, Transition::WithdrawFromAgenda).await
}

async fn open_voting(
    Path(bill_id): Path<i32>,
    State(state): State<AppState>,
    current: CurrentActor,
) -> Result<Json<BillView>, HttpError> {
    transition(&state, &current, bill_id, Transition::OpenVoting).await
}

async fn close_voting(
    Path(bill_id): Path<i32>,
    State(state): State<AppState>,
    current: CurrentActor,
) -> Result<Json<BillView>, HttpError> {
    transition(&state, &current, bill_id, Transition::CloseVoting).await
}

async fn transition(
    state: &AppState,
    current: &CurrentActor,
    bill_id: i32,
    transition: Transition,
) -> Result<Json<BillView>, HttpError> {
    current.require_presiding_officer()?;
    let bill = service::apply_transition(&state.database, bill_id, transition, Utc::now()).await?;
    Ok(Json(bill.into()))
}

async fn submit_vote(
    Path(bill_id): Path<i32>,
    State(state): State<AppState>,
    current: CurrentActor,
    Json(request): Json<VoteSubmissionRequest>,
) -> Result<(StatusCode, Json<VoteView>), HttpError> {
    let profile = current.require_member()?;
    let choice = resolve_choice(&request.choice).ok_or_else(|| {
        HttpError::new(
            StatusCode::BAD_REQUEST,
            format!("unknown vote choice '{}'", request.choice),
        )
    })?;

    let vote = service::cast_vote(
        &state.database,
        bill_id,
        profile.user_id,
        choice,
        Utc::now(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(vote.into())))
}

fn resolve_choice(raw: &str) -> Option<VoteChoice> {
    match raw.trim().to_lowercase().as_str() {
        "yes" | "sim" | "for" => Some(VoteChoice::Yes),
        "no" | "nao" | "não" | "against" => Some(VoteChoice::No),
        "abstain" | "abster" | "abstencao" | "abstenção" => Some(VoteChoice::Abstain),
        _ => None,
    }
}

async fn presiding_panel(
    State(state): State<AppState>,
    current: CurrentActor,
) -> Result<Json<PresidingPanelView>, HttpError> {
    current.require_presiding_officer()?;
    let now = Utc::now();

    let open_bill = match service::open_bill(&state.database).await? {
        Some(bill) => Some(service::expire_if_elapsed(&state.database, bill, now).await?),
        None => None,
    }
    .filter(|bill| bill.status == BillStatus::Open);

    let agenda = service::bills_with_status(
        &state.database,
        &[BillStatus::Preparation, BillStatus::OnAgenda],
    )
    .await?;

    let mut closed = service::bills_with_status(&state.database, &[BillStatus::Closed]).await?;
    closed.sort_by_key(|bill| Reverse((bill.opened_at, bill.id)));
    closed.truncate(RECENTLY_CLOSED_LIMIT);

    let active_members = registry::list_members(&state.database, true)
        .await?
        .into_iter()
        .map(|(profile, seat)| MemberView::new(profile, seat.as_ref()))
        .collect();

    Ok(Json(PresidingPanelView {
        open_bill: open_bill.map(BillView::from),
        agenda: agenda.into_iter().map(BillView::from).collect(),
        recently_closed: closed.into_iter().map(BillView::from).collect(),
        active_members,
    }))
}

async fn member_panel(
    State(state): State<AppState>,
    current: CurrentActor,
) -> Result<Json<MemberPanelView>, HttpError> {
    let profile = current.require_member()?.clone();
    let now = Utc::now();

    let open_bill = match service::open_bill(&state.database).await? {
        Some(bill) => Some(service::expire_if_elapsed(&state.database, bill, now).await?),
        None => None,
    }
    .filter(|bill| bill.status == BillStatus::Open);

    let (own_vote, remaining_seconds) = match open_bill.as_ref() {
        Some(bill) => (
            service::find_vote(&state.database, bill.id, profile.user_id).await?,
            window::remaining_seconds(bill, now),
        ),
        None => (None, 0),
    };

    let seat = registry::find_seat(&state.database, profile.board_seat_id).await?;
    Ok(Json(MemberPanelView {
        open_bill: open_bill.map(BillView::from),
        own_vote: own_vote.map(VoteView::from),
        remaining_seconds,
        profile: MemberView::new(profile, seat.as_ref()),
    }))
}
