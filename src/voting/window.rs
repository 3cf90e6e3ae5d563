use chrono::{DateTime, Duration, Utc};

use crate::entities::bill::{self, BillStatus};

/// The time box during which an open bill accepts votes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VotingWindow {
    pub opened_at: DateTime<Utc>,
    pub time_limit_seconds: i32,
}

impl VotingWindow {
    /// `None` when the bill has never been opened.
    pub fn of(bill: &bill::Model) -> Option<Self> {
        bill.opened_at.map(|opened_at| Self {
            opened_at: opened_at.with_timezone(&Utc),
            time_limit_seconds: bill.time_limit_seconds,
        })
    }

    pub fn deadline(&self) -> DateTime<Utc> {
        self.opened_at + Duration::seconds(i64::from(self.time_limit_seconds.max(0)))
    }

    /// The deadline itself is still inside the window.
    pub fn accepts(&self, now: DateTime<Utc>) -> bool {
        now <= self.deadline()
    }

    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> i64 {
        let remaining = (self.deadline() - now).num_seconds();
        remaining.max(0)
    }
}

/// An open bill whose window has elapsed, or that somehow lacks an open stamp.
pub fn has_expired(bill: &bill::Model, now: DateTime<Utc>) -> bool {
    if bill.status != BillStatus::Open {
        return false;
    }
    match VotingWindow::of(bill) {
        Some(window) => !window.accepts(now),
        None => true,
    }
}

pub fn accepts_votes(bill: &bill::Model, now: DateTime<Utc>) -> bool {
    bill.status == BillStatus::Open && !has_expired(bill, now)
}

pub fn remaining_seconds(bill: &bill::Model, now: DateTime<Utc>) -> i64 {
    if bill.status != BillStatus::Open {
        return 0;
    }
    VotingWindow::of(bill)
        .map(|window| window.remaining_seconds(now))
        .unwrap_or(0)
}
