use serde::{Deserialize, Serialize};

use crate::accounts::is_presiding_seat;
use crate::entities::{board_seat, member_profile, system_config};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberView {
    pub member_id: i32,
    pub full_name: String,
    pub candidacy_name: Option<String>,
    pub party: Option<String>,
    pub photo_url: Option<String>,
    pub inauguration_document_url: Option<String>,
    pub board_seat: Option<String>,
    pub is_presiding_officer: bool,
    pub active: bool,
    pub absent_this_session: bool,
}

impl MemberView {
    pub fn new(profile: member_profile::Model, seat: Option<&board_seat::Model>) -> Self {
        let board_seat = seat.map(|seat| seat.name.clone());
        let is_presiding_officer = board_seat.as_deref().is_some_and(is_presiding_seat);
        Self {
            member_id: profile.user_id,
            full_name: profile.full_name,
            candidacy_name: profile.candidacy_name,
            party: profile.party,
            photo_url: profile.photo_url,
            inauguration_document_url: profile.inauguration_document_url,
            board_seat,
            is_presiding_officer,
            active: profile.active,
            absent_this_session: profile.absent_this_session,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberRosterView {
    pub members: Vec<MemberView>,
    pub member_limit: i32,
}

/// Profile fields editable by the secretariat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MemberProfileFields {
    pub full_name: String,
    pub candidacy_name: Option<String>,
    pub party: Option<String>,
    pub photo_url: Option<String>,
    pub inauguration_document_url: Option<String>,
    pub board_seat_id: Option<i32>,
    pub active: Option<bool>,
    pub absent_this_session: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MemberRegistrationRequest {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub profile: MemberProfileFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSeatView {
    pub id: i32,
    pub name: String,
    pub vote_weight: i32,
}

impl From<board_seat::Model> for BoardSeatView {
    fn from(seat: board_seat::Model) -> Self {
        Self {
            id: seat.id,
            name: seat.name,
            vote_weight: seat.vote_weight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BoardSeatCreateRequest {
    pub name: String,
    pub vote_weight: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemConfigView {
    pub member_limit: i32,
    pub persisted: bool,
}

impl From<system_config::Model> for SystemConfigView {
    fn from(config: system_config::Model) -> Self {
        Self {
            member_limit: config.member_limit,
            persisted: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SystemConfigRequest {
    pub member_limit: i32,
}
