use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub email: Option<String>,
    /// Argon2id PHC string
    pub password_hash: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_group::Entity")]
    UserGroup,
    #[sea_orm(has_one = "super::member_profile::Entity")]
    MemberProfile,
    #[sea_orm(has_one = "super::activation_token::Entity")]
    ActivationToken,
    #[sea_orm(has_many = "super::vote::Entity")]
    Vote,
}

impl Related<super::user_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserGroup.def()
    }
}

impl Related<super::member_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MemberProfile.def()
    }
}

impl Related<super::activation_token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActivationToken.def()
    }
}

impl Related<super::vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vote.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
