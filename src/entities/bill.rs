use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bills")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub author: Option<String>,
    pub kind: BillKind,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub status: BillStatus,
    pub quorum_kind: QuorumKind,
    pub time_limit_seconds: i32,
    pub opened_at: Option<DateTimeWithTimeZone>,
    pub final_result: Option<BillResult>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::vote::Entity")]
    Vote,
}

impl Related<super::vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vote.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillStatus {
    #[sea_orm(string_value = "preparation")]
    Preparation,
    #[sea_orm(string_value = "on_agenda")]
    OnAgenda,
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "closed")]
    Closed,
}

impl BillStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Preparation => "In preparation",
            Self::OnAgenda => "On the agenda",
            Self::Open => "Open for voting",
            Self::Closed => "Voting closed",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum BillKind {
    #[sea_orm(string_value = "ordinary")]
    Ordinary,
    #[sea_orm(string_value = "complementary")]
    Complementary,
    #[sea_orm(string_value = "amendment")]
    ConstitutionalAmendment,
    #[sea_orm(string_value = "motion")]
    Motion,
}

impl BillKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Ordinary => "Ordinary bill",
            Self::Complementary => "Complementary bill",
            Self::ConstitutionalAmendment => "Amendment to the Organic Law",
            Self::Motion => "Motion",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum QuorumKind {
    #[sea_orm(string_value = "simple_majority")]
    SimpleMajority,
    #[sea_orm(string_value = "absolute_majority")]
    AbsoluteMajority,
    #[sea_orm(string_value = "two_thirds")]
    TwoThirds,
}

impl QuorumKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::SimpleMajority => "Simple majority",
            Self::AbsoluteMajority => "Absolute majority",
            Self::TwoThirds => "Two thirds of members",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillResult {
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}
