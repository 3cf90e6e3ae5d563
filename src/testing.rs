//! Fixtures shared by the database-backed tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

use crate::entities::bill::{self, BillKind, QuorumKind};
use crate::entities::member_profile;
use crate::models::members::MemberProfileFields;
use crate::registry;
use crate::voting::lifecycle::Transition;
use crate::voting::service::{self, NewBill};

pub const PASSWORD: &str = "correct-horse";

/// A fresh in-memory database with every migration applied.
pub async fn database() -> DatabaseConnection {
    let database = Database::connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    migration::Migrator::up(&database, None)
        .await
        .expect("migrations apply");
    database
}

pub fn session_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 20, 14, 0, 0).unwrap()
}

pub fn at(offset_seconds: i64) -> DateTime<Utc> {
    session_start() + Duration::seconds(offset_seconds)
}

pub async fn member(database: &DatabaseConnection, full_name: &str) -> member_profile::Model {
    let username = full_name.to_lowercase().replace(' ', ".");
    let fields = MemberProfileFields {
        full_name: full_name.to_string(),
        party: Some("pt".to_string()),
        ..MemberProfileFields::default()
    };
    registry::register_member(
        database,
        &username,
        PASSWORD,
        None,
        &fields,
        100,
        session_start(),
    )
    .await
    .expect("member registered")
}

pub async fn members(database: &DatabaseConnection, count: usize) -> Vec<member_profile::Model> {
    let mut created = Vec::with_capacity(count);
    for index in 0..count {
        created.push(member(database, &format!("Member {index:02}")).await);
    }
    created
}

pub async fn draft_bill(
    database: &DatabaseConnection,
    quorum_kind: QuorumKind,
    time_limit_seconds: i32,
) -> bill::Model {
    service::create_bill(
        database,
        NewBill {
            title: "Projeto de Lei 12/2025".to_string(),
            author: Some("Mesa Diretora".to_string()),
            kind: BillKind::Ordinary,
            description: "Dispõe sobre a arborização urbana.".to_string(),
            quorum_kind,
            time_limit_seconds,
        },
        session_start(),
    )
    .await
    .expect("bill created")
}

/// A bill placed on the agenda and opened at [`session_start`].
pub async fn open_bill(
    database: &DatabaseConnection,
    quorum_kind: QuorumKind,
    time_limit_seconds: i32,
) -> bill::Model {
    let bill = draft_bill(database, quorum_kind, time_limit_seconds).await;
    service::apply_transition(database, bill.id, Transition::PlaceOnAgenda, session_start())
        .await
        .expect("placed on agenda");
    service::apply_transition(database, bill.id, Transition::OpenVoting, session_start())
        .await
        .expect("voting opened")
}
