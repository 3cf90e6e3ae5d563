use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "member_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i32,
    pub full_name: String,
    pub candidacy_name: Option<String>,
    pub party: Option<String>,
    pub photo_url: Option<String>,
    pub inauguration_document_url: Option<String>,
    pub board_seat_id: Option<i32>,
    pub active: bool,
    pub absent_this_session: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_account::Entity",
        from = "Column::UserId",
        to = "super::user_account::Column::Id",
        on_delete = "Cascade"
    )]
    UserAccount,
    #[sea_orm(
        belongs_to = "super::board_seat::Entity",
        from = "Column::BoardSeatId",
        to = "super::board_seat::Column::Id",
        on_delete = "SetNull"
    )]
    BoardSeat,
}

impl Related<super::user_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserAccount.def()
    }
}

impl Related<super::board_seat::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BoardSeat.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
