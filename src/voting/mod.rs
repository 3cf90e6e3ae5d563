//! Bill lifecycle, vote casting and result calculation.
//!
//! The pure rules live in [`lifecycle`], [`window`], [`quorum`] and
//! [`tally`]; [`service`] applies them against the database. Callers pass the
//! current time in so the voting window can be exercised deterministically.
//!
//! Expiry is enforced lazily: an open bill whose window has elapsed is closed
//! by the next vote or results request that touches it. Without such a
//! request a stale bill stays `open` indefinitely.

use sea_orm::DbErr;

use crate::entities::bill::BillStatus;

pub mod lifecycle;
pub mod quorum;
pub mod service;
pub mod tally;
pub mod window;

#[cfg(test)]
mod tests;

#[derive(Debug, thiserror::Error)]
pub enum VotingError {
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },
    #[error("cannot {action} bill {bill_id}: status is {current:?}, expected {required:?}")]
    InvalidTransition {
        bill_id: i32,
        action: &'static str,
        current: BillStatus,
        required: BillStatus,
    },
    #[error("voting on bill {bill_id} is not open")]
    VotingClosed { bill_id: i32 },
    #[error("members flagged absent cannot vote")]
    MemberAbsent,
    #[error("a vote on bill {bill_id} was already recorded for this member")]
    AlreadyVoted { bill_id: i32 },
    #[error("{0}")]
    Validation(String),
}
