use serde::{Deserialize, Serialize};

use crate::entities::bill::{self, BillKind, BillResult, BillStatus, QuorumKind};
use crate::entities::vote::{self, VoteChoice};
use crate::voting::tally::MemberVoteStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BillView {
    pub id: i32,
    pub title: String,
    pub author: Option<String>,
    pub kind: BillKind,
    pub kind_label: &'static str,
    pub description: String,
    pub status: BillStatus,
    pub status_label: &'static str,
    pub quorum_kind: QuorumKind,
    pub quorum_label: &'static str,
    pub time_limit_seconds: i32,
    pub opened_at: Option<i64>,
    pub final_result: Option<BillResult>,
    pub created_at: i64,
}

impl From<bill::Model> for BillView {
    fn from(bill: bill::Model) -> Self {
        Self {
            id: bill.id,
            title: bill.title,
            author: bill.author,
            kind: bill.kind,
            kind_label: bill.kind.label(),
            description: bill.description,
            status: bill.status,
            status_label: bill.status.label(),
            quorum_kind: bill.quorum_kind,
            quorum_label: bill.quorum_kind.label(),
            time_limit_seconds: bill.time_limit_seconds,
            opened_at: bill.opened_at.map(|dt| dt.timestamp()),
            final_result: bill.final_result,
            created_at: bill.created_at.timestamp(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoteView {
    pub bill_id: i32,
    pub member_id: i32,
    pub choice: VoteChoice,
    pub cast_at: i64,
}

impl From<vote::Model> for VoteView {
    fn from(vote: vote::Model) -> Self {
        Self {
            bill_id: vote.bill_id,
            member_id: vote.user_id,
            choice: vote.choice,
            cast_at: vote.cast_at.timestamp(),
        }
    }
}

/// Payload served to the public scoreboard on every poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiveResultsView {
    pub id: i32,
    pub title: String,
    pub status: BillStatus,
    pub status_label: &'static str,
    pub final_result: Option<BillResult>,
    pub remaining_seconds: i64,
    pub yes: u64,
    pub no: u64,
    pub abstain: u64,
    pub votes_cast: u64,
    pub total_members: u64,
    pub member_votes: Vec<MemberVoteView>,
    pub quorum_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberVoteView {
    pub member_id: i32,
    pub name: String,
    pub party: Option<String>,
    pub photo_url: Option<String>,
    pub vote: MemberVoteStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreboardView {
    pub bill: Option<LiveResultsView>,
    pub total_members: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BillCreateRequest {
    pub title: String,
    pub author: Option<String>,
    pub kind: Option<BillKind>,
    pub description: String,
    pub quorum_kind: Option<QuorumKind>,
    pub time_limit_seconds: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VoteSubmissionRequest {
    pub choice: String, // "yes" / "no" / "abstain", Portuguese aliases accepted
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretariatPanelView {
    pub bills_in_preparation: Vec<BillView>,
    pub is_superuser: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresidingPanelView {
    pub open_bill: Option<BillView>,
    pub agenda: Vec<BillView>,
    pub recently_closed: Vec<BillView>,
    pub active_members: Vec<crate::models::members::MemberView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberPanelView {
    pub open_bill: Option<BillView>,
    pub own_vote: Option<VoteView>,
    pub remaining_seconds: i64,
    pub profile: crate::models::members::MemberView,
}
