//! Driven port for reading and writing vote rows.

use async_trait::async_trait;

use crate::domain::caption::CaptionId;
use crate::domain::user::UserId;
use crate::domain::vote::{NewVote, Vote};

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by the vote adapter.
    pub enum VotePersistenceError {
        /// Connection to the backing store could not be established.
        Connection { message: String } => "vote store connection failed: {message}",
        /// Query or insert failed during execution.
        Query { message: String } => "vote store query failed: {message}",
        /// The (caption, voter) pair already holds a vote.
        Duplicate { message: String } => "duplicate vote: {message}",
    }
}

/// Port for vote reads and the single-insert write path.
///
/// Read scopes always carry an explicit caption id set so queries stay under
/// the backing store's row-return cap.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// All vote rows for the given captions.
    async fn votes_for_captions(
        &self,
        caption_ids: &[CaptionId],
    ) -> Result<Vec<Vote>, VotePersistenceError>;

    /// The voter's own rows for the given captions, filtered server-side.
    async fn votes_by_voter(
        &self,
        voter: &UserId,
        caption_ids: &[CaptionId],
    ) -> Result<Vec<Vote>, VotePersistenceError>;

    /// Whether the voter already voted on the caption.
    async fn has_vote(
        &self,
        voter: &UserId,
        caption_id: CaptionId,
    ) -> Result<bool, VotePersistenceError>;

    /// Insert one vote row with a store-assigned creation timestamp.
    async fn insert(&self, vote: &NewVote) -> Result<(), VotePersistenceError>;
}

/// Fixture repository holding no votes and accepting every insert.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureVoteRepository;

#[async_trait]
impl VoteRepository for FixtureVoteRepository {
    async fn votes_for_captions(
        &self,
        _caption_ids: &[CaptionId],
    ) -> Result<Vec<Vote>, VotePersistenceError> {
        Ok(Vec::new())
    }

    async fn votes_by_voter(
        &self,
        _voter: &UserId,
        _caption_ids: &[CaptionId],
    ) -> Result<Vec<Vote>, VotePersistenceError> {
        Ok(Vec::new())
    }

    async fn has_vote(
        &self,
        _voter: &UserId,
        _caption_id: CaptionId,
    ) -> Result<bool, VotePersistenceError> {
        Ok(false)
    }

    async fn insert(&self, _vote: &NewVote) -> Result<(), VotePersistenceError> {
        Ok(())
    }
}
