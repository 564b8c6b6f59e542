//! Votes and derived tallies.
//!
//! A vote is one user's up/down verdict on one caption. Tallies are always
//! derived from the vote rows of the page being rendered, never stored.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::caption::CaptionId;
use super::user::UserId;

/// Closed set of legal vote values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "i16", into = "i16")]
pub enum VoteValue {
    /// Upvote (+1).
    Up,
    /// Downvote (−1).
    Down,
}

/// Error for vote values outside {+1, −1}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("vote value must be 1 or -1, got {0}")]
pub struct InvalidVoteValue(pub i16);

impl VoteValue {
    /// Wire representation: +1 or −1.
    #[must_use]
    pub const fn as_i16(self) -> i16 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }
}

impl TryFrom<i16> for VoteValue {
    type Error = InvalidVoteValue;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Up),
            -1 => Ok(Self::Down),
            other => Err(InvalidVoteValue(other)),
        }
    }
}

impl From<VoteValue> for i16 {
    fn from(value: VoteValue) -> Self {
        value.as_i16()
    }
}

impl fmt::Display for VoteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i16())
    }
}

/// One stored vote row.
#[derive(Debug, Clone, PartialEq)]
pub struct Vote {
    pub caption_id: CaptionId,
    pub voter: UserId,
    pub value: VoteValue,
    pub created_at: DateTime<Utc>,
}

/// A vote to be written; the creation timestamp is assigned at insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVote {
    pub caption_id: CaptionId,
    pub voter: UserId,
    pub value: VoteValue,
}

/// Upvote/downvote counts for one caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoteTally {
    pub upvotes: u32,
    pub downvotes: u32,
}

impl VoteTally {
    /// Fold one vote value into the tally.
    pub fn record(&mut self, value: VoteValue) {
        match value {
            VoteValue::Up => self.upvotes += 1,
            VoteValue::Down => self.downvotes += 1,
        }
    }
}

/// Tally votes per caption.
#[must_use]
pub fn tally_by_caption(votes: &[Vote]) -> HashMap<CaptionId, VoteTally> {
    let mut tallies: HashMap<CaptionId, VoteTally> = HashMap::new();
    for vote in votes {
        tallies.entry(vote.caption_id).or_default().record(vote.value);
    }
    tallies
}

/// Map a voter's own vote per caption.
///
/// The input is expected to be pre-filtered to one voter; when duplicates
/// slip through, the last row wins, matching the historical client loop.
#[must_use]
pub fn own_vote_by_caption(votes: &[Vote]) -> HashMap<CaptionId, VoteValue> {
    votes
        .iter()
        .map(|vote| (vote.caption_id, vote.value))
        .collect()
}
