use crate::entities::bill::BillStatus;

use super::VotingError;

/// Status changes a presiding officer can request for a bill.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    PlaceOnAgenda,
    WithdrawFromAgenda,
    OpenVoting,
    CloseVoting,
}

impl Transition {
    pub fn required_status(self) -> BillStatus {
        match self {
            Self::PlaceOnAgenda => BillStatus::Preparation,
            Self::WithdrawFromAgenda => BillStatus::OnAgenda,
            Self::OpenVoting => BillStatus::OnAgenda,
            Self::CloseVoting => BillStatus::Open,
        }
    }

    pub fn target_status(self) -> BillStatus {
        match self {
            Self::PlaceOnAgenda => BillStatus::OnAgenda,
            Self::WithdrawFromAgenda => BillStatus::Preparation,
            Self::OpenVoting => BillStatus::Open,
            Self::CloseVoting => BillStatus::Closed,
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            Self::PlaceOnAgenda => "place on the agenda",
            Self::WithdrawFromAgenda => "withdraw from the agenda",
            Self::OpenVoting => "open voting on",
            Self::CloseVoting => "close voting on",
        }
    }

    /// Returns the next status, or an error naming the expected predecessor.
    pub fn apply(self, bill_id: i32, current: BillStatus) -> Result<BillStatus, VotingError> {
        let required = self.required_status();
        if current != required {
            return Err(VotingError::InvalidTransition {
                bill_id,
                action: self.verb(),
                current,
                required,
            });
        }
        Ok(self.target_status())
    }
}
