use std::collections::HashMap;

use serde::Serialize;

use crate::entities::member_profile;
use crate::entities::vote::{self, VoteChoice};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub yes: u64,
    pub no: u64,
    pub abstain: u64,
}

impl Tally {
    pub fn from_votes<'a>(votes: impl IntoIterator<Item = &'a vote::Model>) -> Self {
        let mut tally = Self::default();
        for vote in votes {
            tally.record(vote.choice);
        }
        tally
    }

    pub fn record(&mut self, choice: VoteChoice) {
        match choice {
            VoteChoice::Yes => self.yes += 1,
            VoteChoice::No => self.no += 1,
            VoteChoice::Abstain => self.abstain += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.yes + self.no + self.abstain
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberVoteStatus {
    Yes,
    No,
    Abstain,
    Absent,
    NotVoted,
}

impl From<VoteChoice> for MemberVoteStatus {
    fn from(choice: VoteChoice) -> Self {
        match choice {
            VoteChoice::Yes => Self::Yes,
            VoteChoice::No => Self::No,
            VoteChoice::Abstain => Self::Abstain,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberStatusRow<'a> {
    pub profile: &'a member_profile::Model,
    pub status: MemberVoteStatus,
}

/// Per-member status for every active member, ordered by full name.
///
/// A recorded vote wins over the absence flag.
pub fn member_statuses<'a>(
    profiles: &'a [member_profile::Model],
    votes: &[vote::Model],
) -> Vec<MemberStatusRow<'a>> {
    let choices: HashMap<i32, VoteChoice> = votes
        .iter()
        .map(|vote| (vote.user_id, vote.choice))
        .collect();

    let mut rows: Vec<MemberStatusRow<'a>> = profiles
        .iter()
        .filter(|profile| profile.active)
        .map(|profile| {
            let status = match choices.get(&profile.user_id) {
                Some(choice) => MemberVoteStatus::from(*choice),
                None if profile.absent_this_session => MemberVoteStatus::Absent,
                None => MemberVoteStatus::NotVoted,
            };
            MemberStatusRow { profile, status }
        })
        .collect();

    rows.sort_by(|a, b| {
        a.profile
            .full_name
            .cmp(&b.profile.full_name)
            .then(a.profile.user_id.cmp(&b.profile.user_id))
    });
    rows
}
