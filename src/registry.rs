//! Accounts, member profiles, board seats and the chamber configuration.

use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, SqlErr, TransactionTrait,
};
use tracing::{info, warn};

use crate::accounts::{
    MAX_CANDIDACY_NAME_LEN, MAX_FULL_NAME_LEN, MAX_SEAT_NAME_LEN, MAX_URL_LEN,
    SECRETARIAT_GROUP, activation_expiry, canonicalize_email, canonicalize_optional,
    canonicalize_party, canonicalize_required, generate_token, hash_password, is_presiding_seat,
    parse_token, sanitize_username, validate_password, verify_password,
};
use crate::entities::{
    activation_token, board_seat, member_profile, system_config, user_account, user_group,
};
use crate::models::members::MemberProfileFields;

pub const MAX_MEMBER_LIMIT: i32 = 1_000;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("member limit of {limit} reached")]
    LimitReached { limit: i32 },
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("activation token expired")]
    TokenExpired,
    #[error("account {username} is already active")]
    AlreadyActive { username: String },
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

impl RegistryError {
    fn validation(err: anyhow::Error) -> Self {
        Self::Validation(err.to_string())
    }

    fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// An authenticated account with everything role checks need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub account: user_account::Model,
    pub groups: Vec<String>,
    pub profile: Option<member_profile::Model>,
    pub seat: Option<board_seat::Model>,
}

impl Actor {
    pub fn user_id(&self) -> i32 {
        self.account.id
    }

    pub fn is_superuser(&self) -> bool {
        self.account.is_superuser
    }

    pub fn in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|name| name == group)
    }

    pub fn is_secretariat(&self) -> bool {
        self.in_group(SECRETARIAT_GROUP)
    }

    pub fn is_presiding_officer(&self) -> bool {
        self.profile.is_some()
            && self
                .seat
                .as_ref()
                .is_some_and(|seat| is_presiding_seat(&seat.name))
    }
}

pub async fn load_actor(
    database: &DatabaseConnection,
    user_id: i32,
) -> Result<Option<Actor>, RegistryError> {
    let Some(account) = user_account::Entity::find_by_id(user_id)
        .one(database)
        .await?
    else {
        return Ok(None);
    };

    let groups = account
        .find_related(user_group::Entity)
        .all(database)
        .await?
        .into_iter()
        .map(|group| group.group_name)
        .collect::<Vec<_>>();

    let (profile, seat) = match member_profile::Entity::find_by_id(user_id)
        .find_also_related(board_seat::Entity)
        .one(database)
        .await?
    {
        Some((profile, seat)) => (Some(profile), seat),
        None => (None, None),
    };

    Ok(Some(Actor {
        account,
        groups,
        profile,
        seat,
    }))
}

#[derive(Debug, Clone)]
pub struct NewAccount<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub email: Option<&'a str>,
    pub is_active: bool,
    pub is_superuser: bool,
}

async fn create_account<C: ConnectionTrait>(
    conn: &C,
    account: NewAccount<'_>,
    now: DateTime<Utc>,
) -> Result<user_account::Model, RegistryError> {
    let username = sanitize_username(account.username).map_err(RegistryError::validation)?;
    validate_password(account.password).map_err(RegistryError::validation)?;
    let email = canonicalize_email(account.email).map_err(RegistryError::validation)?;

    let taken = user_account::Entity::find()
        .filter(user_account::Column::Username.eq(username.clone()))
        .count(conn)
        .await?;
    if taken > 0 {
        return Err(RegistryError::Conflict(format!(
            "username {username} is already taken"
        )));
    }

    let password_hash =
        hash_password(account.password).map_err(|err| RegistryError::Hashing(err.to_string()))?;

    let model = user_account::ActiveModel {
        id: NotSet,
        username: Set(username.clone()),
        email: Set(email),
        password_hash: Set(password_hash),
        is_active: Set(account.is_active),
        is_superuser: Set(account.is_superuser),
        created_at: Set(now.fixed_offset()),
    }
    .insert(conn)
    .await
    .map_err(|err| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            RegistryError::Conflict(format!("username {username} is already taken"))
        }
        _ => RegistryError::Database(err),
    })?;

    Ok(model)
}

/// Creates the configured superuser when the database has none.
pub async fn ensure_superuser(
    database: &DatabaseConnection,
    username: &str,
    password: &str,
    now: DateTime<Utc>,
) -> Result<Option<user_account::Model>, RegistryError> {
    let existing = user_account::Entity::find()
        .filter(user_account::Column::IsSuperuser.eq(true))
        .count(database)
        .await?;
    if existing > 0 {
        return Ok(None);
    }

    let account = create_account(
        database,
        NewAccount {
            username,
            password,
            email: None,
            is_active: true,
            is_superuser: true,
        },
        now,
    )
    .await?;
    info!("Bootstrap superuser {} created", account.username);
    Ok(Some(account))
}

pub async fn authenticate(
    database: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<user_account::Model, RegistryError> {
    let account = user_account::Entity::find()
        .filter(user_account::Column::Username.eq(username.trim()))
        .one(database)
        .await?
        .ok_or(RegistryError::InvalidCredentials)?;

    if !verify_password(password, &account.password_hash) {
        return Err(RegistryError::InvalidCredentials);
    }
    if !account.is_active {
        warn!("Login attempt for inactive account {}", account.username);
        return Err(RegistryError::InvalidCredentials);
    }
    Ok(account)
}

/// Creates an inactive secretariat account and its activation token.
pub async fn register_secretariat(
    database: &DatabaseConnection,
    username: &str,
    password: &str,
    email: Option<&str>,
    now: DateTime<Utc>,
) -> Result<(user_account::Model, activation_token::Model), RegistryError> {
    let txn = database.begin().await?;

    let account = create_account(
        &txn,
        NewAccount {
            username,
            password,
            email,
            is_active: false,
            is_superuser: false,
        },
        now,
    )
    .await?;

    user_group::ActiveModel {
        user_id: Set(account.id),
        group_name: Set(SECRETARIAT_GROUP.to_string()),
    }
    .insert(&txn)
    .await?;

    let token = activation_token::ActiveModel {
        user_id: Set(account.id),
        token: Set(generate_token()),
        created_at: Set(now.fixed_offset()),
        expires_at: Set(activation_expiry(now).fixed_offset()),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    info!("Secretariat account {} pending activation", account.username);
    Ok((account, token))
}

pub async fn activate_account(
    database: &DatabaseConnection,
    raw_token: &str,
    now: DateTime<Utc>,
) -> Result<user_account::Model, RegistryError> {
    let token_value = parse_token(raw_token)
        .map_err(|_| RegistryError::not_found("Activation token", raw_token))?;

    let (token, account) = activation_token::Entity::find()
        .filter(activation_token::Column::Token.eq(token_value))
        .find_also_related(user_account::Entity)
        .one(database)
        .await?
        .ok_or_else(|| RegistryError::not_found("Activation token", raw_token))?;
    let account = account.ok_or_else(|| RegistryError::not_found("Account", token.user_id))?;

    if now > token.expires_at.with_timezone(&Utc) {
        token.delete(database).await?;
        return Err(RegistryError::TokenExpired);
    }

    if account.is_active {
        return Err(RegistryError::AlreadyActive {
            username: account.username,
        });
    }

    let txn = database.begin().await?;
    let mut active: user_account::ActiveModel = account.into();
    active.is_active = Set(true);
    let activated = active.update(&txn).await?;
    token.delete(&txn).await?;
    txn.commit().await?;

    info!("Account {} activated", activated.username);
    Ok(activated)
}

pub async fn load_config(
    database: &DatabaseConnection,
) -> Result<Option<system_config::Model>, RegistryError> {
    let config = system_config::Entity::find()
        .order_by_asc(system_config::Column::Id)
        .one(database)
        .await?;
    Ok(config)
}

/// Inserts the singleton row. When one already exists the new values are
/// dropped and the stored row is returned unchanged.
pub async fn create_config(
    database: &DatabaseConnection,
    member_limit: i32,
) -> Result<system_config::Model, RegistryError> {
    validate_member_limit(member_limit)?;
    if let Some(existing) = load_config(database).await? {
        return Ok(existing);
    }

    let config = system_config::ActiveModel {
        id: NotSet,
        member_limit: Set(member_limit),
    }
    .insert(database)
    .await?;
    Ok(config)
}

pub async fn update_config(
    database: &DatabaseConnection,
    member_limit: i32,
) -> Result<system_config::Model, RegistryError> {
    validate_member_limit(member_limit)?;
    let Some(existing) = load_config(database).await? else {
        return create_config(database, member_limit).await;
    };

    let mut active: system_config::ActiveModel = existing.into();
    active.member_limit = Set(member_limit);
    let updated = active.update(database).await?;
    info!("Member limit set to {}", updated.member_limit);
    Ok(updated)
}

fn validate_member_limit(member_limit: i32) -> Result<(), RegistryError> {
    if member_limit <= 0 || member_limit > MAX_MEMBER_LIMIT {
        return Err(RegistryError::Validation(format!(
            "member limit must be between 1 and {MAX_MEMBER_LIMIT}"
        )));
    }
    Ok(())
}

pub async fn member_limit(
    database: &DatabaseConnection,
    fallback: i32,
) -> Result<i32, RegistryError> {
    Ok(load_config(database)
        .await?
        .map(|config| config.member_limit)
        .unwrap_or(fallback))
}

pub async fn list_seats(
    database: &DatabaseConnection,
) -> Result<Vec<board_seat::Model>, RegistryError> {
    let seats = board_seat::Entity::find()
        .order_by_asc(board_seat::Column::Name)
        .all(database)
        .await?;
    Ok(seats)
}

pub async fn create_seat(
    database: &DatabaseConnection,
    name: &str,
    vote_weight: Option<i32>,
) -> Result<board_seat::Model, RegistryError> {
    let name = canonicalize_required(name, "Seat name", MAX_SEAT_NAME_LEN)
        .map_err(RegistryError::validation)?;
    let vote_weight = vote_weight.unwrap_or(1);
    if !(0..=10).contains(&vote_weight) {
        return Err(RegistryError::Validation(
            "vote weight must be between 0 and 10".to_string(),
        ));
    }

    let taken = board_seat::Entity::find()
        .filter(board_seat::Column::Name.eq(name.clone()))
        .count(database)
        .await?;
    if taken > 0 {
        return Err(RegistryError::Conflict(format!("seat {name} already exists")));
    }

    let seat = board_seat::ActiveModel {
        id: NotSet,
        name: Set(name),
        vote_weight: Set(vote_weight),
    }
    .insert(database)
    .await?;
    Ok(seat)
}

struct ValidatedProfile {
    full_name: String,
    candidacy_name: Option<String>,
    party: Option<String>,
    photo_url: Option<String>,
    inauguration_document_url: Option<String>,
    board_seat_id: Option<i32>,
}

async fn validate_profile<C: ConnectionTrait>(
    conn: &C,
    fields: &MemberProfileFields,
) -> Result<ValidatedProfile, RegistryError> {
    let full_name = canonicalize_required(&fields.full_name, "Full name", MAX_FULL_NAME_LEN)
        .map_err(RegistryError::validation)?;
    let candidacy_name = canonicalize_optional(
        fields.candidacy_name.as_deref(),
        "Candidacy name",
        MAX_CANDIDACY_NAME_LEN,
    )
    .map_err(RegistryError::validation)?;
    let party = canonicalize_party(fields.party.as_deref()).map_err(RegistryError::validation)?;
    let photo_url = canonicalize_optional(fields.photo_url.as_deref(), "Photo URL", MAX_URL_LEN)
        .map_err(RegistryError::validation)?;
    let inauguration_document_url = canonicalize_optional(
        fields.inauguration_document_url.as_deref(),
        "Inauguration document URL",
        MAX_URL_LEN,
    )
    .map_err(RegistryError::validation)?;

    if let Some(seat_id) = fields.board_seat_id {
        board_seat::Entity::find_by_id(seat_id)
            .one(conn)
            .await?
            .ok_or_else(|| RegistryError::not_found("Board seat", seat_id))?;
    }

    Ok(ValidatedProfile {
        full_name,
        candidacy_name,
        party,
        photo_url,
        inauguration_document_url,
        board_seat_id: fields.board_seat_id,
    })
}

/// Creates an active account with its member profile, respecting the limit.
pub async fn register_member(
    database: &DatabaseConnection,
    username: &str,
    password: &str,
    email: Option<&str>,
    fields: &MemberProfileFields,
    fallback_limit: i32,
    now: DateTime<Utc>,
) -> Result<member_profile::Model, RegistryError> {
    let limit = member_limit(database, fallback_limit).await?;
    let current = member_profile::Entity::find().count(database).await?;
    if current >= u64::try_from(limit.max(0)).unwrap_or(0) {
        return Err(RegistryError::LimitReached { limit });
    }

    let txn = database.begin().await?;
    let validated = validate_profile(&txn, fields).await?;
    let account = create_account(
        &txn,
        NewAccount {
            username,
            password,
            email,
            is_active: true,
            is_superuser: false,
        },
        now,
    )
    .await?;

    let profile = member_profile::ActiveModel {
        user_id: Set(account.id),
        full_name: Set(validated.full_name),
        candidacy_name: Set(validated.candidacy_name),
        party: Set(validated.party),
        photo_url: Set(validated.photo_url),
        inauguration_document_url: Set(validated.inauguration_document_url),
        board_seat_id: Set(validated.board_seat_id),
        active: Set(fields.active.unwrap_or(true)),
        absent_this_session: Set(fields.absent_this_session.unwrap_or(false)),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    info!(
        "Member {} registered ({}/{limit})",
        profile.full_name,
        current + 1
    );
    Ok(profile)
}

pub async fn update_member(
    database: &DatabaseConnection,
    user_id: i32,
    fields: &MemberProfileFields,
) -> Result<member_profile::Model, RegistryError> {
    let profile = find_profile(database, user_id).await?;
    let validated = validate_profile(database, fields).await?;

    let mut active: member_profile::ActiveModel = profile.into();
    active.full_name = Set(validated.full_name);
    active.candidacy_name = Set(validated.candidacy_name);
    active.party = Set(validated.party);
    active.photo_url = Set(validated.photo_url);
    active.inauguration_document_url = Set(validated.inauguration_document_url);
    active.board_seat_id = Set(validated.board_seat_id);
    if let Some(flag) = fields.active {
        active.active = Set(flag);
    }
    if let Some(flag) = fields.absent_this_session {
        active.absent_this_session = Set(flag);
    }
    let updated = active.update(database).await?;
    Ok(updated)
}

/// Deletes the account; profile and votes follow by cascade.
pub async fn remove_member(database: &DatabaseConnection, user_id: i32) -> Result<(), RegistryError> {
    find_profile(database, user_id).await?;
    let account = user_account::Entity::find_by_id(user_id)
        .one(database)
        .await?
        .ok_or_else(|| RegistryError::not_found("Account", user_id))?;
    let username = account.username.clone();
    account.delete(database).await?;
    info!("Member account {username} removed");
    Ok(())
}

pub async fn toggle_absence(
    database: &DatabaseConnection,
    user_id: i32,
) -> Result<member_profile::Model, RegistryError> {
    let profile = find_profile(database, user_id).await?;
    let absent = !profile.absent_this_session;
    let mut active: member_profile::ActiveModel = profile.into();
    active.absent_this_session = Set(absent);
    let updated = active.update(database).await?;
    info!(
        "Member {} marked {}",
        updated.full_name,
        if absent { "absent" } else { "present" }
    );
    Ok(updated)
}

pub async fn find_profile(
    database: &DatabaseConnection,
    user_id: i32,
) -> Result<member_profile::Model, RegistryError> {
    member_profile::Entity::find_by_id(user_id)
        .one(database)
        .await?
        .ok_or_else(|| RegistryError::not_found("Member profile", user_id))
}

pub async fn find_seat(
    database: &DatabaseConnection,
    seat_id: Option<i32>,
) -> Result<Option<board_seat::Model>, RegistryError> {
    let Some(seat_id) = seat_id else {
        return Ok(None);
    };
    let seat = board_seat::Entity::find_by_id(seat_id).one(database).await?;
    Ok(seat)
}

/// Profiles with their seats, ordered by full name.
pub async fn list_members(
    database: &DatabaseConnection,
    active_only: bool,
) -> Result<Vec<(member_profile::Model, Option<board_seat::Model>)>, RegistryError> {
    let mut select = member_profile::Entity::find();
    if active_only {
        select = select.filter(member_profile::Column::Active.eq(true));
    }
    let members = select
        .find_also_related(board_seat::Entity)
        .order_by_asc(member_profile::Column::FullName)
        .order_by_asc(member_profile::Column::UserId)
        .all(database)
        .await?;
    Ok(members)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::testing::{self, PASSWORD, session_start};

    fn seated(full_name: &str, board_seat_id: i32) -> MemberProfileFields {
        MemberProfileFields {
            full_name: full_name.to_string(),
            board_seat_id: Some(board_seat_id),
            ..MemberProfileFields::default()
        }
    }

    #[tokio::test]
    async fn secretariat_accounts_activate_once() {
        let database = testing::database().await;
        let (account, token) = register_secretariat(
            &database,
            "secretaria",
            PASSWORD,
            Some("Secretaria@Camara.gov.br"),
            session_start(),
        )
        .await
        .unwrap();
        assert!(!account.is_active);
        assert!(matches!(
            authenticate(&database, "secretaria", PASSWORD).await,
            Err(RegistryError::InvalidCredentials)
        ));

        let activated = activate_account(&database, &token.token, session_start())
            .await
            .unwrap();
        assert!(activated.is_active);
        assert!(authenticate(&database, "secretaria", PASSWORD).await.is_ok());

        let actor = load_actor(&database, account.id).await.unwrap().unwrap();
        assert!(actor.is_secretariat());
        assert!(!actor.is_presiding_officer());

        assert!(matches!(
            activate_account(&database, &token.token, session_start()).await,
            Err(RegistryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn expired_tokens_are_deleted() {
        let database = testing::database().await;
        let (account, token) =
            register_secretariat(&database, "secretaria", PASSWORD, None, session_start())
                .await
                .unwrap();

        let later = session_start() + Duration::hours(25);
        assert!(matches!(
            activate_account(&database, &token.token, later).await,
            Err(RegistryError::TokenExpired)
        ));
        assert_eq!(
            activation_token::Entity::find()
                .count(&database)
                .await
                .unwrap(),
            0
        );
        let stored = user_account::Entity::find_by_id(account.id)
            .one(&database)
            .await
            .unwrap()
            .unwrap();
        assert!(!stored.is_active);
    }

    #[tokio::test]
    async fn active_accounts_reject_activation() {
        let database = testing::database().await;
        let member = testing::member(&database, "Ana Souza").await;
        activation_token::ActiveModel {
            user_id: Set(member.user_id),
            token: Set(generate_token()),
            created_at: Set(session_start().fixed_offset()),
            expires_at: Set(activation_expiry(session_start()).fixed_offset()),
        }
        .insert(&database)
        .await
        .unwrap();
        let token = activation_token::Entity::find()
            .one(&database)
            .await
            .unwrap()
            .unwrap();

        assert!(matches!(
            activate_account(&database, &token.token, session_start()).await,
            Err(RegistryError::AlreadyActive { .. })
        ));
    }

    #[tokio::test]
    async fn duplicate_usernames_conflict() {
        let database = testing::database().await;
        testing::member(&database, "Ana Souza").await;
        let result =
            register_secretariat(&database, "ana.souza", PASSWORD, None, session_start()).await;
        assert!(matches!(result, Err(RegistryError::Conflict(_))));
    }

    #[tokio::test]
    async fn superuser_is_bootstrapped_once() {
        let database = testing::database().await;
        let created = ensure_superuser(&database, "admin", PASSWORD, session_start())
            .await
            .unwrap();
        assert!(created.is_some_and(|account| account.is_superuser));

        let again = ensure_superuser(&database, "other", PASSWORD, session_start())
            .await
            .unwrap();
        assert!(again.is_none());
    }

    #[tokio::test]
    async fn config_row_is_a_singleton() {
        let database = testing::database().await;
        assert_eq!(member_limit(&database, 15).await.unwrap(), 15);

        let first = create_config(&database, 9).await.unwrap();
        let second = create_config(&database, 20).await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.member_limit, 9);
        assert_eq!(
            system_config::Entity::find().count(&database).await.unwrap(),
            1
        );

        update_config(&database, 12).await.unwrap();
        assert_eq!(member_limit(&database, 15).await.unwrap(), 12);
        assert!(matches!(
            update_config(&database, 0).await,
            Err(RegistryError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn registration_stops_at_member_limit() {
        let database = testing::database().await;
        create_config(&database, 2).await.unwrap();
        testing::member(&database, "Ana Souza").await;
        testing::member(&database, "Bruno Lima").await;

        let fields = MemberProfileFields {
            full_name: "Carla Dias".to_string(),
            ..MemberProfileFields::default()
        };
        let result = register_member(
            &database,
            "carla",
            PASSWORD,
            None,
            &fields,
            15,
            session_start(),
        )
        .await;
        assert!(matches!(result, Err(RegistryError::LimitReached { limit: 2 })));
        assert_eq!(
            user_account::Entity::find().count(&database).await.unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn absence_toggles_back_and_forth() {
        let database = testing::database().await;
        let member = testing::member(&database, "Ana Souza").await;

        let absent = toggle_absence(&database, member.user_id).await.unwrap();
        assert!(absent.absent_this_session);
        let present = toggle_absence(&database, member.user_id).await.unwrap();
        assert!(!present.absent_this_session);
    }

    #[tokio::test]
    async fn only_the_exact_presiding_seat_presides() {
        let database = testing::database().await;
        let president = create_seat(&database, "Presidente", Some(2)).await.unwrap();
        let vice = create_seat(&database, "Vice-Presidente", None).await.unwrap();
        assert!(matches!(
            create_seat(&database, "Presidente", None).await,
            Err(RegistryError::Conflict(_))
        ));

        let chair = register_member(
            &database,
            "chair",
            PASSWORD,
            None,
            &seated("Ana Souza", president.id),
            15,
            session_start(),
        )
        .await
        .unwrap();
        let deputy = register_member(
            &database,
            "deputy",
            PASSWORD,
            None,
            &seated("Bruno Lima", vice.id),
            15,
            session_start(),
        )
        .await
        .unwrap();

        let chair = load_actor(&database, chair.user_id).await.unwrap().unwrap();
        let deputy = load_actor(&database, deputy.user_id).await.unwrap().unwrap();
        assert!(chair.is_presiding_officer());
        assert!(!deputy.is_presiding_officer());
    }

    #[tokio::test]
    async fn removing_a_member_requires_a_profile() {
        let database = testing::database().await;
        let admin = ensure_superuser(&database, "admin", PASSWORD, session_start())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(
            remove_member(&database, admin.id).await,
            Err(RegistryError::NotFound { .. })
        ));

        let member = testing::member(&database, "Ana Souza").await;
        remove_member(&database, member.user_id).await.unwrap();
        assert_eq!(
            member_profile::Entity::find().count(&database).await.unwrap(),
            0
        );
        assert!(list_members(&database, false).await.unwrap().is_empty());
    }
}
