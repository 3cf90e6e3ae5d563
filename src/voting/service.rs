use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, SqlErr, TransactionTrait,
};
use tracing::{info, warn};

use crate::entities::bill::{self, BillKind, BillStatus, QuorumKind};
use crate::entities::member_profile;
use crate::entities::vote::{self, VoteChoice};
use crate::models::voting::{LiveResultsView, MemberVoteView};

use super::VotingError;
use super::lifecycle::Transition;
use super::quorum;
use super::tally::{Tally, member_statuses};
use super::window;

pub const DEFAULT_TIME_LIMIT_SECONDS: i32 = 60;
pub const MAX_TIME_LIMIT_SECONDS: i32 = 86_400;
pub const MAX_TITLE_LEN: usize = 255;
pub const MAX_AUTHOR_LEN: usize = 255;
pub const MAX_DESCRIPTION_LEN: usize = 20_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBill {
    pub title: String,
    pub author: Option<String>,
    pub kind: BillKind,
    pub description: String,
    pub quorum_kind: QuorumKind,
    pub time_limit_seconds: i32,
}

impl NewBill {
    pub fn validate(&self) -> Result<(), VotingError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(VotingError::Validation("title must not be empty".to_string()));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(VotingError::Validation(format!(
                "title exceeds {MAX_TITLE_LEN} characters"
            )));
        }
        if let Some(author) = self.author.as_ref() {
            if author.trim().chars().count() > MAX_AUTHOR_LEN {
                return Err(VotingError::Validation(format!(
                    "author exceeds {MAX_AUTHOR_LEN} characters"
                )));
            }
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(VotingError::Validation(
                "description must not be empty".to_string(),
            ));
        }
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(VotingError::Validation(format!(
                "description exceeds {MAX_DESCRIPTION_LEN} characters"
            )));
        }
        if self.time_limit_seconds <= 0 || self.time_limit_seconds > MAX_TIME_LIMIT_SECONDS {
            return Err(VotingError::Validation(format!(
                "time limit must be between 1 and {MAX_TIME_LIMIT_SECONDS} seconds"
            )));
        }
        Ok(())
    }
}

/// New bills always start in preparation, never opened.
pub async fn create_bill(
    database: &DatabaseConnection,
    new_bill: NewBill,
    now: DateTime<Utc>,
) -> Result<bill::Model, VotingError> {
    new_bill.validate()?;

    let author = new_bill
        .author
        .map(|author| author.trim().to_string())
        .filter(|author| !author.is_empty());

    let model = bill::ActiveModel {
        id: NotSet,
        title: Set(new_bill.title.trim().to_string()),
        author: Set(author),
        kind: Set(new_bill.kind),
        description: Set(new_bill.description.trim().to_string()),
        status: Set(BillStatus::Preparation),
        quorum_kind: Set(new_bill.quorum_kind),
        time_limit_seconds: Set(new_bill.time_limit_seconds),
        opened_at: Set(None),
        final_result: Set(None),
        created_at: Set(now.fixed_offset()),
    }
    .insert(database)
    .await?;

    info!("Bill {} created: {}", model.id, model.title);
    Ok(model)
}

pub async fn find_bill<C: ConnectionTrait>(
    conn: &C,
    bill_id: i32,
) -> Result<bill::Model, VotingError> {
    bill::Entity::find_by_id(bill_id)
        .one(conn)
        .await?
        .ok_or(VotingError::NotFound {
            entity: "Bill",
            id: bill_id,
        })
}

/// Counted on every call; membership changes during a session must show up.
pub async fn count_active_members<C: ConnectionTrait>(conn: &C) -> Result<u64, VotingError> {
    let count = member_profile::Entity::find()
        .filter(member_profile::Column::Active.eq(true))
        .count(conn)
        .await?;
    Ok(count)
}

pub async fn apply_transition(
    database: &DatabaseConnection,
    bill_id: i32,
    transition: Transition,
    now: DateTime<Utc>,
) -> Result<bill::Model, VotingError> {
    match transition {
        Transition::OpenVoting => open_voting(database, bill_id, now).await,
        Transition::CloseVoting => close_voting(database, bill_id).await,
        Transition::PlaceOnAgenda | Transition::WithdrawFromAgenda => {
            let bill = find_bill(database, bill_id).await?;
            let next = transition.apply(bill.id, bill.status)?;

            let mut active: bill::ActiveModel = bill.into();
            active.status = Set(next);
            let updated = active.update(database).await?;
            info!("Bill {} moved to {:?}", updated.id, updated.status);
            Ok(updated)
        }
    }
}

/// Opens the voting window, discarding votes from any earlier round.
pub async fn open_voting(
    database: &DatabaseConnection,
    bill_id: i32,
    now: DateTime<Utc>,
) -> Result<bill::Model, VotingError> {
    let txn = database.begin().await?;

    let bill = find_bill(&txn, bill_id).await?;
    let next = Transition::OpenVoting.apply(bill.id, bill.status)?;

    let already_open = bill::Entity::find()
        .filter(bill::Column::Status.eq(BillStatus::Open))
        .filter(bill::Column::Id.ne(bill.id))
        .count(&txn)
        .await?;
    if already_open > 0 {
        warn!(
            "Opening bill {} while {already_open} other bill(s) are still open",
            bill.id
        );
    }

    let purged = vote::Entity::delete_many()
        .filter(vote::Column::BillId.eq(bill.id))
        .exec(&txn)
        .await?
        .rows_affected;

    let mut active: bill::ActiveModel = bill.into();
    active.status = Set(next);
    active.opened_at = Set(Some(now.fixed_offset()));
    active.final_result = Set(None);
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    info!(
        "Voting opened on bill {} for {}s ({purged} stale votes purged)",
        updated.id, updated.time_limit_seconds
    );
    Ok(updated)
}

pub async fn close_voting(
    database: &DatabaseConnection,
    bill_id: i32,
) -> Result<bill::Model, VotingError> {
    let txn = database.begin().await?;
    let bill = find_bill(&txn, bill_id).await?;
    Transition::CloseVoting.apply(bill.id, bill.status)?;
    let closed = finalize(&txn, bill).await?;
    txn.commit().await?;
    Ok(closed)
}

/// Closes `bill` and stores the result of its current tally.
async fn finalize<C: ConnectionTrait>(
    conn: &C,
    bill: bill::Model,
) -> Result<bill::Model, VotingError> {
    assert!(
        bill.status == BillStatus::Open,
        "Only open bills can be finalized"
    );

    let votes = vote::Entity::find()
        .filter(vote::Column::BillId.eq(bill.id))
        .all(conn)
        .await?;
    let tally = Tally::from_votes(&votes);
    let active_members = count_active_members(conn).await?;
    let result = quorum::evaluate(bill.quorum_kind, &tally, active_members);

    let mut active: bill::ActiveModel = bill.into();
    active.status = Set(BillStatus::Closed);
    active.final_result = Set(Some(result));
    let closed = active.update(conn).await?;

    info!(
        "Voting closed on bill {}: yes={} no={} abstain={} members={} -> {:?}",
        closed.id, tally.yes, tally.no, tally.abstain, active_members, result
    );
    Ok(closed)
}

/// Closes the bill if its window elapsed; otherwise returns it untouched.
pub async fn expire_if_elapsed(
    database: &DatabaseConnection,
    bill: bill::Model,
    now: DateTime<Utc>,
) -> Result<bill::Model, VotingError> {
    if !window::has_expired(&bill, now) {
        return Ok(bill);
    }
    info!("Voting window on bill {} elapsed; closing", bill.id);
    let txn = database.begin().await?;
    let closed = finalize(&txn, bill).await?;
    txn.commit().await?;
    Ok(closed)
}

/// Records a single vote.
///
/// Checks run in order and stop at the first failure: open window (an
/// expired window closes the bill first), absence flag, existing vote.
pub async fn cast_vote(
    database: &DatabaseConnection,
    bill_id: i32,
    user_id: i32,
    choice: VoteChoice,
    now: DateTime<Utc>,
) -> Result<vote::Model, VotingError> {
    let bill = find_bill(database, bill_id).await?;

    if !window::accepts_votes(&bill, now) {
        if window::has_expired(&bill, now) {
            expire_if_elapsed(database, bill, now).await?;
        }
        return Err(VotingError::VotingClosed { bill_id });
    }

    let profile = member_profile::Entity::find_by_id(user_id)
        .one(database)
        .await?
        .ok_or(VotingError::NotFound {
            entity: "Member profile",
            id: user_id,
        })?;
    if profile.absent_this_session {
        return Err(VotingError::MemberAbsent);
    }

    let existing = vote::Entity::find_by_id((bill_id, user_id))
        .one(database)
        .await?;
    if existing.is_some() {
        return Err(VotingError::AlreadyVoted { bill_id });
    }

    let vote = insert_vote(database, bill_id, user_id, choice, now).await?;
    info!("Member {user_id} voted {choice:?} on bill {bill_id}");
    Ok(vote)
}

/// Inserts the vote row. A row already stored for the same member and bill,
/// including one written concurrently after the pre-checks, yields
/// `AlreadyVoted`.
pub async fn insert_vote<C: ConnectionTrait>(
    conn: &C,
    bill_id: i32,
    user_id: i32,
    choice: VoteChoice,
    now: DateTime<Utc>,
) -> Result<vote::Model, VotingError> {
    let cast_at = now.fixed_offset();
    let record = vote::ActiveModel {
        bill_id: Set(bill_id),
        user_id: Set(user_id),
        choice: Set(choice),
        cast_at: Set(cast_at),
    };

    match vote::Entity::insert(record).exec_without_returning(conn).await {
        Ok(_) => Ok(vote::Model {
            bill_id,
            user_id,
            choice,
            cast_at,
        }),
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            Err(VotingError::AlreadyVoted { bill_id })
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn find_vote(
    database: &DatabaseConnection,
    bill_id: i32,
    user_id: i32,
) -> Result<Option<vote::Model>, VotingError> {
    let vote = vote::Entity::find_by_id((bill_id, user_id))
        .one(database)
        .await?;
    Ok(vote)
}

/// Aggregated state of one bill for the scoreboard.
pub async fn live_results(
    database: &DatabaseConnection,
    bill_id: i32,
    now: DateTime<Utc>,
) -> Result<LiveResultsView, VotingError> {
    let bill = find_bill(database, bill_id).await?;
    let bill = expire_if_elapsed(database, bill, now).await?;

    let votes = vote::Entity::find()
        .filter(vote::Column::BillId.eq(bill.id))
        .all(database)
        .await?;
    let tally = Tally::from_votes(&votes);

    let profiles = member_profile::Entity::find()
        .filter(member_profile::Column::Active.eq(true))
        .order_by_asc(member_profile::Column::FullName)
        .all(database)
        .await?;
    let rows = member_statuses(&profiles, &votes);
    let total_members = rows.len() as u64;

    let member_votes = rows
        .into_iter()
        .map(|row| MemberVoteView {
            member_id: row.profile.user_id,
            name: row.profile.full_name.clone(),
            party: row.profile.party.clone(),
            photo_url: row.profile.photo_url.clone(),
            vote: row.status,
        })
        .collect::<Vec<_>>();

    Ok(LiveResultsView {
        id: bill.id,
        remaining_seconds: window::remaining_seconds(&bill, now),
        title: bill.title,
        status: bill.status,
        status_label: bill.status.label(),
        final_result: bill.final_result,
        yes: tally.yes,
        no: tally.no,
        abstain: tally.abstain,
        votes_cast: tally.total(),
        total_members,
        member_votes,
        quorum_label: bill.quorum_kind.label(),
    })
}

/// The open bill, or else the most recently opened closed one.
pub async fn scoreboard_bill(
    database: &DatabaseConnection,
) -> Result<Option<bill::Model>, VotingError> {
    let open = bill::Entity::find()
        .filter(bill::Column::Status.eq(BillStatus::Open))
        .order_by_desc(bill::Column::OpenedAt)
        .one(database)
        .await?;
    if open.is_some() {
        return Ok(open);
    }

    let last_closed = bill::Entity::find()
        .filter(bill::Column::Status.eq(BillStatus::Closed))
        .order_by_desc(bill::Column::OpenedAt)
        .one(database)
        .await?;
    Ok(last_closed)
}

pub async fn open_bill(database: &DatabaseConnection) -> Result<Option<bill::Model>, VotingError> {
    let bill = bill::Entity::find()
        .filter(bill::Column::Status.eq(BillStatus::Open))
        .order_by_desc(bill::Column::OpenedAt)
        .one(database)
        .await?;
    Ok(bill)
}

pub async fn bills_with_status(
    database: &DatabaseConnection,
    statuses: &[BillStatus],
) -> Result<Vec<bill::Model>, VotingError> {
    let bills = bill::Entity::find()
        .filter(bill::Column::Status.is_in(statuses.iter().copied()))
        .order_by_asc(bill::Column::Id)
        .all(database)
        .await?;
    Ok(bills)
}
