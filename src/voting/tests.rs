use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, SqlErr};

use super::VotingError;
use super::lifecycle::Transition;
use super::service;
use super::tally::MemberVoteStatus;
use crate::entities::bill::{self, BillResult, BillStatus, QuorumKind};
use crate::entities::vote::{self, VoteChoice};
use crate::models::members::MemberProfileFields;
use crate::registry;
use crate::testing::{self, at, session_start};

async fn reload(database: &sea_orm::DatabaseConnection, bill_id: i32) -> bill::Model {
    bill::Entity::find_by_id(bill_id)
        .one(database)
        .await
        .unwrap()
        .unwrap()
}

async fn cast_all(
    database: &sea_orm::DatabaseConnection,
    bill_id: i32,
    ballots: &[(i32, VoteChoice)],
) {
    for (user_id, choice) in ballots {
        service::cast_vote(database, bill_id, *user_id, *choice, at(10))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn new_bills_start_in_preparation_without_timestamp() {
    let database = testing::database().await;
    let bill = testing::draft_bill(&database, QuorumKind::SimpleMajority, 60).await;

    assert_eq!(bill.status, BillStatus::Preparation);
    assert!(bill.opened_at.is_none());
    assert!(bill.final_result.is_none());
}

#[tokio::test]
async fn blank_titles_are_rejected() {
    let database = testing::database().await;
    let result = service::create_bill(
        &database,
        service::NewBill {
            title: "   ".to_string(),
            author: None,
            kind: bill::BillKind::Motion,
            description: "Moção de aplauso".to_string(),
            quorum_kind: QuorumKind::SimpleMajority,
            time_limit_seconds: 60,
        },
        session_start(),
    )
    .await;

    assert!(matches!(result, Err(VotingError::Validation(_))));
    assert_eq!(bill::Entity::find().count(&database).await.unwrap(), 0);
}

#[tokio::test]
async fn opening_a_bill_not_on_the_agenda_leaves_it_unchanged() {
    let database = testing::database().await;
    let bill = testing::draft_bill(&database, QuorumKind::SimpleMajority, 60).await;

    let result =
        service::apply_transition(&database, bill.id, Transition::OpenVoting, session_start())
            .await;
    assert!(matches!(
        result,
        Err(VotingError::InvalidTransition {
            current: BillStatus::Preparation,
            required: BillStatus::OnAgenda,
            ..
        })
    ));

    let stored = reload(&database, bill.id).await;
    assert_eq!(stored.status, BillStatus::Preparation);
    assert!(stored.opened_at.is_none());
}

#[tokio::test]
async fn withdrawn_bills_return_to_preparation() {
    let database = testing::database().await;
    let bill = testing::draft_bill(&database, QuorumKind::SimpleMajority, 60).await;

    let on_agenda =
        service::apply_transition(&database, bill.id, Transition::PlaceOnAgenda, session_start())
            .await
            .unwrap();
    assert_eq!(on_agenda.status, BillStatus::OnAgenda);

    let withdrawn = service::apply_transition(
        &database,
        bill.id,
        Transition::WithdrawFromAgenda,
        session_start(),
    )
    .await
    .unwrap();
    assert_eq!(withdrawn.status, BillStatus::Preparation);
    assert!(withdrawn.opened_at.is_none());
}

#[tokio::test]
async fn closed_bills_cannot_be_reopened() {
    let database = testing::database().await;
    testing::members(&database, 1).await;
    let bill = testing::open_bill(&database, QuorumKind::SimpleMajority, 60).await;
    service::close_voting(&database, bill.id).await.unwrap();

    let result =
        service::apply_transition(&database, bill.id, Transition::OpenVoting, at(5)).await;
    assert!(matches!(result, Err(VotingError::InvalidTransition { .. })));
    assert_eq!(reload(&database, bill.id).await.status, BillStatus::Closed);
}

#[tokio::test]
async fn opening_purges_stale_votes_and_stamps_time() {
    let database = testing::database().await;
    let member = testing::member(&database, "Ana Souza").await;
    let bill = testing::draft_bill(&database, QuorumKind::SimpleMajority, 60).await;
    service::apply_transition(&database, bill.id, Transition::PlaceOnAgenda, session_start())
        .await
        .unwrap();

    vote::ActiveModel {
        bill_id: Set(bill.id),
        user_id: Set(member.user_id),
        choice: Set(VoteChoice::No),
        cast_at: Set(session_start().fixed_offset()),
    }
    .insert(&database)
    .await
    .unwrap();

    let opened = service::apply_transition(&database, bill.id, Transition::OpenVoting, at(30))
        .await
        .unwrap();

    assert_eq!(opened.status, BillStatus::Open);
    assert_eq!(
        opened.opened_at.map(|ts| ts.timestamp()),
        Some(at(30).timestamp())
    );
    assert_eq!(vote::Entity::find().count(&database).await.unwrap(), 0);
}

#[tokio::test]
async fn votes_inside_and_after_the_window() {
    let database = testing::database().await;
    let members = testing::members(&database, 2).await;
    let bill = testing::open_bill(&database, QuorumKind::SimpleMajority, 60).await;

    let accepted = service::cast_vote(
        &database,
        bill.id,
        members[0].user_id,
        VoteChoice::Yes,
        at(30),
    )
    .await
    .unwrap();
    assert_eq!(accepted.choice, VoteChoice::Yes);

    let late = service::cast_vote(
        &database,
        bill.id,
        members[1].user_id,
        VoteChoice::No,
        at(70),
    )
    .await;
    assert!(matches!(late, Err(VotingError::VotingClosed { .. })));

    assert!(
        service::find_vote(&database, bill.id, members[1].user_id)
            .await
            .unwrap()
            .is_none()
    );
    let stored = reload(&database, bill.id).await;
    assert_eq!(stored.status, BillStatus::Closed);
    assert_eq!(stored.final_result, Some(BillResult::Approved));

    let results = service::live_results(&database, bill.id, at(70))
        .await
        .unwrap();
    assert_eq!(results.status, BillStatus::Closed);
    assert_eq!(results.remaining_seconds, 0);
    assert_eq!(results.yes, 1);
    assert_eq!(results.votes_cast, 1);
}

#[tokio::test]
async fn polling_an_expired_bill_closes_it() {
    let database = testing::database().await;
    testing::members(&database, 3).await;
    let bill = testing::open_bill(&database, QuorumKind::AbsoluteMajority, 60).await;

    let results = service::live_results(&database, bill.id, at(61))
        .await
        .unwrap();

    assert_eq!(results.status, BillStatus::Closed);
    assert_eq!(results.remaining_seconds, 0);
    assert_eq!(results.final_result, Some(BillResult::Rejected));
    assert_eq!(results.total_members, 3);
}

#[tokio::test]
async fn duplicate_votes_are_reported() {
    let database = testing::database().await;
    let member = testing::member(&database, "Bruno Lima").await;
    let bill = testing::open_bill(&database, QuorumKind::SimpleMajority, 60).await;

    service::cast_vote(&database, bill.id, member.user_id, VoteChoice::Yes, at(5))
        .await
        .unwrap();
    let second =
        service::cast_vote(&database, bill.id, member.user_id, VoteChoice::No, at(6)).await;

    assert!(matches!(second, Err(VotingError::AlreadyVoted { .. })));
    let stored = service::find_vote(&database, bill.id, member.user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.choice, VoteChoice::Yes);
}

#[tokio::test]
async fn absent_members_cannot_vote() {
    let database = testing::database().await;
    let member = testing::member(&database, "Carla Dias").await;
    registry::toggle_absence(&database, member.user_id)
        .await
        .unwrap();
    let bill = testing::open_bill(&database, QuorumKind::SimpleMajority, 60).await;

    let result =
        service::cast_vote(&database, bill.id, member.user_id, VoteChoice::Yes, at(5)).await;
    assert!(matches!(result, Err(VotingError::MemberAbsent)));
    assert_eq!(vote::Entity::find().count(&database).await.unwrap(), 0);
}

#[tokio::test]
async fn accounts_without_profile_cannot_vote() {
    let database = testing::database().await;
    let bill = testing::open_bill(&database, QuorumKind::SimpleMajority, 60).await;

    let result = service::cast_vote(&database, bill.id, 4242, VoteChoice::Yes, at(5)).await;
    assert!(matches!(result, Err(VotingError::NotFound { .. })));
}

#[tokio::test]
async fn closing_freezes_tallies() {
    let database = testing::database().await;
    let members = testing::members(&database, 3).await;
    let bill = testing::open_bill(&database, QuorumKind::SimpleMajority, 600).await;
    cast_all(
        &database,
        bill.id,
        &[
            (members[0].user_id, VoteChoice::Yes),
            (members[1].user_id, VoteChoice::No),
        ],
    )
    .await;

    let closed = service::close_voting(&database, bill.id).await.unwrap();
    assert_eq!(closed.status, BillStatus::Closed);
    assert_eq!(closed.final_result, Some(BillResult::Rejected));

    let late = service::cast_vote(
        &database,
        bill.id,
        members[2].user_id,
        VoteChoice::Yes,
        at(20),
    )
    .await;
    assert!(matches!(late, Err(VotingError::VotingClosed { .. })));

    let results = service::live_results(&database, bill.id, at(20))
        .await
        .unwrap();
    assert_eq!((results.yes, results.no, results.abstain), (1, 1, 0));
    assert_eq!(results.final_result, Some(BillResult::Rejected));
}

#[tokio::test]
async fn simple_majority_ignores_abstentions() {
    let database = testing::database().await;
    let members = testing::members(&database, 5).await;
    let bill = testing::open_bill(&database, QuorumKind::SimpleMajority, 60).await;
    cast_all(
        &database,
        bill.id,
        &[
            (members[0].user_id, VoteChoice::Yes),
            (members[1].user_id, VoteChoice::Yes),
            (members[2].user_id, VoteChoice::Yes),
            (members[3].user_id, VoteChoice::No),
            (members[4].user_id, VoteChoice::Abstain),
        ],
    )
    .await;

    let closed = service::close_voting(&database, bill.id).await.unwrap();
    assert_eq!(closed.final_result, Some(BillResult::Approved));
}

#[tokio::test]
async fn absolute_majority_counts_every_active_member() {
    let database = testing::database().await;
    let members = testing::members(&database, 9).await;
    let bill = testing::open_bill(&database, QuorumKind::AbsoluteMajority, 60).await;
    let ballots = members
        .iter()
        .take(4)
        .map(|member| (member.user_id, VoteChoice::Yes))
        .collect::<Vec<_>>();
    cast_all(&database, bill.id, &ballots).await;

    let closed = service::close_voting(&database, bill.id).await.unwrap();
    assert_eq!(closed.final_result, Some(BillResult::Rejected));
}

#[tokio::test]
async fn two_thirds_passes_at_exact_threshold() {
    let database = testing::database().await;
    let members = testing::members(&database, 9).await;
    let bill = testing::open_bill(&database, QuorumKind::TwoThirds, 60).await;
    let ballots = members
        .iter()
        .take(6)
        .map(|member| (member.user_id, VoteChoice::Yes))
        .collect::<Vec<_>>();
    cast_all(&database, bill.id, &ballots).await;

    let closed = service::close_voting(&database, bill.id).await.unwrap();
    assert_eq!(closed.final_result, Some(BillResult::Approved));
}

#[tokio::test]
async fn live_results_list_every_active_member() {
    let database = testing::database().await;
    let zelia = testing::member(&database, "Zélia Prado").await;
    let ana = testing::member(&database, "Ana Souza").await;
    let bruno = testing::member(&database, "Bruno Lima").await;
    registry::toggle_absence(&database, bruno.user_id)
        .await
        .unwrap();
    let bill = testing::open_bill(&database, QuorumKind::SimpleMajority, 60).await;
    service::cast_vote(&database, bill.id, zelia.user_id, VoteChoice::Abstain, at(10))
        .await
        .unwrap();

    let results = service::live_results(&database, bill.id, at(30))
        .await
        .unwrap();

    assert_eq!(results.status, BillStatus::Open);
    assert_eq!(results.remaining_seconds, 30);
    assert_eq!(results.total_members, 3);
    assert_eq!(results.abstain, 1);
    let rows = results
        .member_votes
        .iter()
        .map(|row| (row.member_id, row.vote))
        .collect::<Vec<_>>();
    assert_eq!(
        rows,
        vec![
            (ana.user_id, MemberVoteStatus::NotVoted),
            (bruno.user_id, MemberVoteStatus::Absent),
            (zelia.user_id, MemberVoteStatus::Abstain),
        ]
    );
    assert_eq!(results.member_votes[0].party.as_deref(), Some("PT"));
}

#[tokio::test]
async fn scoreboard_prefers_the_open_bill() {
    let database = testing::database().await;
    testing::members(&database, 1).await;
    assert!(service::scoreboard_bill(&database).await.unwrap().is_none());

    let first = testing::open_bill(&database, QuorumKind::SimpleMajority, 60).await;
    service::close_voting(&database, first.id).await.unwrap();
    let shown = service::scoreboard_bill(&database).await.unwrap().unwrap();
    assert_eq!(shown.id, first.id);

    let second = testing::open_bill(&database, QuorumKind::SimpleMajority, 60).await;
    let shown = service::scoreboard_bill(&database).await.unwrap().unwrap();
    assert_eq!(shown.id, second.id);
    assert_eq!(shown.status, BillStatus::Open);
}

#[tokio::test]
async fn inactive_voters_cannot_carry_an_absolute_majority() {
    let database = testing::database().await;
    let fields = MemberProfileFields {
        full_name: "Davi Rocha".to_string(),
        active: Some(false),
        ..MemberProfileFields::default()
    };
    let retired = registry::register_member(
        &database,
        "davi",
        testing::PASSWORD,
        None,
        &fields,
        100,
        session_start(),
    )
    .await
    .unwrap();
    let bill = testing::open_bill(&database, QuorumKind::AbsoluteMajority, 60).await;
    service::cast_vote(&database, bill.id, retired.user_id, VoteChoice::Yes, at(5))
        .await
        .unwrap();

    let closed = service::close_voting(&database, bill.id).await.unwrap();
    assert_eq!(closed.final_result, Some(BillResult::Rejected));

    let results = service::live_results(&database, bill.id, at(10))
        .await
        .unwrap();
    assert_eq!((results.yes, results.total_members), (1, 0));
}

#[tokio::test]
async fn storage_rejects_a_second_vote_row() {
    let database = testing::database().await;
    let member = testing::member(&database, "Ana Souza").await;
    let bill = testing::open_bill(&database, QuorumKind::SimpleMajority, 60).await;

    let row = |choice| vote::ActiveModel {
        bill_id: Set(bill.id),
        user_id: Set(member.user_id),
        choice: Set(choice),
        cast_at: Set(session_start().fixed_offset()),
    };
    vote::Entity::insert(row(VoteChoice::Yes))
        .exec_without_returning(&database)
        .await
        .unwrap();
    let err = vote::Entity::insert(row(VoteChoice::No))
        .exec_without_returning(&database)
        .await
        .unwrap_err();

    assert!(matches!(
        err.sql_err(),
        Some(SqlErr::UniqueConstraintViolation(_))
    ));
}

#[tokio::test]
async fn racing_insert_maps_to_already_voted() {
    let database = testing::database().await;
    let member = testing::member(&database, "Ana Souza").await;
    let bill = testing::open_bill(&database, QuorumKind::SimpleMajority, 60).await;

    service::insert_vote(&database, bill.id, member.user_id, VoteChoice::Yes, at(5))
        .await
        .unwrap();
    let second =
        service::insert_vote(&database, bill.id, member.user_id, VoteChoice::No, at(6)).await;

    assert!(matches!(second, Err(VotingError::AlreadyVoted { .. })));
    assert_eq!(vote::Entity::find().count(&database).await.unwrap(), 1);
}
