use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "board_seats")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    /// Shown on the roster; tallies count one vote per member
    pub vote_weight: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::member_profile::Entity")]
    MemberProfile,
}

impl Related<super::member_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MemberProfile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
