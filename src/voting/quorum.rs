use crate::entities::bill::{BillResult, QuorumKind};

use super::tally::Tally;

/// Decides a bill from its final tally.
///
/// `active_members` is the number of members in office when voting closes.
/// All comparisons are done in integers:
/// - simple majority: more yes than no among cast votes;
/// - absolute majority: yes strictly above half of the active members;
/// - two thirds: yes at or above two thirds of the active members.
///
/// With no active members neither member-based quorum can pass.
pub fn evaluate(quorum: QuorumKind, tally: &Tally, active_members: u64) -> BillResult {
    let yes = tally.yes;
    let passed = match quorum {
        QuorumKind::SimpleMajority => yes > tally.no,
        QuorumKind::AbsoluteMajority => {
            active_members > 0 && yes.saturating_mul(2) > active_members
        }
        QuorumKind::TwoThirds => {
            active_members > 0 && yes.saturating_mul(3) >= active_members.saturating_mul(2)
        }
    };

    if passed {
        BillResult::Approved
    } else {
        BillResult::Rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(yes: u64, no: u64, abstain: u64) -> Tally {
        Tally { yes, no, abstain }
    }

    #[test]
    fn simple_majority_ignores_abstentions() {
        assert_eq!(
            evaluate(QuorumKind::SimpleMajority, &tally(3, 1, 1), 5),
            BillResult::Approved
        );
        assert_eq!(
            evaluate(QuorumKind::SimpleMajority, &tally(2, 2, 5), 9),
            BillResult::Rejected
        );
        assert_eq!(
            evaluate(QuorumKind::SimpleMajority, &tally(0, 0, 0), 9),
            BillResult::Rejected
        );
    }

    #[test]
    fn absolute_majority_needs_more_than_half_of_members() {
        assert_eq!(
            evaluate(QuorumKind::AbsoluteMajority, &tally(4, 0, 0), 9),
            BillResult::Rejected
        );
        assert_eq!(
            evaluate(QuorumKind::AbsoluteMajority, &tally(5, 0, 0), 9),
            BillResult::Approved
        );
        assert_eq!(
            evaluate(QuorumKind::AbsoluteMajority, &tally(5, 0, 0), 10),
            BillResult::Rejected
        );
        assert_eq!(
            evaluate(QuorumKind::AbsoluteMajority, &tally(6, 4, 0), 10),
            BillResult::Approved
        );
    }

    #[test]
    fn two_thirds_threshold_is_inclusive() {
        assert_eq!(
            evaluate(QuorumKind::TwoThirds, &tally(6, 0, 0), 9),
            BillResult::Approved
        );
        assert_eq!(
            evaluate(QuorumKind::TwoThirds, &tally(5, 0, 0), 9),
            BillResult::Rejected
        );
        assert_eq!(
            evaluate(QuorumKind::TwoThirds, &tally(7, 0, 0), 10),
            BillResult::Approved
        );
        assert_eq!(
            evaluate(QuorumKind::TwoThirds, &tally(6, 0, 0), 10),
            BillResult::Rejected
        );
    }

    #[test]
    fn empty_chamber_never_reaches_member_quorums() {
        assert_eq!(
            evaluate(QuorumKind::AbsoluteMajority, &tally(0, 0, 0), 0),
            BillResult::Rejected
        );
        assert_eq!(
            evaluate(QuorumKind::TwoThirds, &tally(0, 0, 0), 0),
            BillResult::Rejected
        );
    }

    #[test]
    fn yes_votes_without_active_members_do_not_pass() {
        assert_eq!(
            evaluate(QuorumKind::AbsoluteMajority, &tally(1, 0, 0), 0),
            BillResult::Rejected
        );
        assert_eq!(
            evaluate(QuorumKind::TwoThirds, &tally(3, 0, 0), 0),
            BillResult::Rejected
        );
        assert_eq!(
            evaluate(QuorumKind::SimpleMajority, &tally(1, 0, 0), 0),
            BillResult::Approved
        );
    }
}
