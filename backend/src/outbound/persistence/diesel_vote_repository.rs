//! PostgreSQL-backed `VoteRepository` using Diesel.
//!
//! Reads are always scoped by an explicit caption id set. The insert path
//! assigns the creation timestamp and maps unique-index violations to the
//! duplicate variant so the domain's conflict handling sees a typed error.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{VotePersistenceError, VoteRepository};
use crate::domain::{CaptionId, NewVote, UserId, Vote};

use super::models::{NewVoteRow, VoteRow};
use super::pool::{DbPool, PoolError};
use super::schema::caption_votes;

/// Diesel-backed implementation of the vote port.
#[derive(Clone)]
pub struct DieselVoteRepository {
    pool: DbPool,
}

impl DieselVoteRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> VotePersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            VotePersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> VotePersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    debug!(error = %error, "vote query failed");
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            VotePersistenceError::duplicate(info.message().to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            VotePersistenceError::connection(info.message().to_owned())
        }
        DieselError::DatabaseError(_, info) => {
            VotePersistenceError::query(info.message().to_owned())
        }
        other => VotePersistenceError::query(other.to_string()),
    }
}

fn rows_to_votes(rows: Vec<VoteRow>) -> Result<Vec<Vote>, VotePersistenceError> {
    rows.into_iter()
        .map(|row| {
            Vote::try_from(row)
                .map_err(|error| VotePersistenceError::query(error.message().to_owned()))
        })
        .collect()
}

fn raw_ids(caption_ids: &[CaptionId]) -> Vec<i64> {
    caption_ids.iter().map(|id| id.get()).collect()
}

#[async_trait]
impl VoteRepository for DieselVoteRepository {
    async fn votes_for_captions(
        &self,
        caption_ids: &[CaptionId],
    ) -> Result<Vec<Vote>, VotePersistenceError> {
        if caption_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<VoteRow> = caption_votes::table
            .filter(caption_votes::caption_id.eq_any(raw_ids(caption_ids)))
            .select(VoteRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_votes(rows)
    }

    async fn votes_by_voter(
        &self,
        voter: &UserId,
        caption_ids: &[CaptionId],
    ) -> Result<Vec<Vote>, VotePersistenceError> {
        if caption_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<VoteRow> = caption_votes::table
            .filter(caption_votes::profile_id.eq(*voter.as_uuid()))
            .filter(caption_votes::caption_id.eq_any(raw_ids(caption_ids)))
            .select(VoteRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_votes(rows)
    }

    async fn has_vote(
        &self,
        voter: &UserId,
        caption_id: CaptionId,
    ) -> Result<bool, VotePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::select(diesel::dsl::exists(
            caption_votes::table
                .filter(caption_votes::profile_id.eq(*voter.as_uuid()))
                .filter(caption_votes::caption_id.eq(caption_id.get())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn insert(&self, vote: &NewVote) -> Result<(), VotePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewVoteRow {
            caption_id: vote.caption_id.get(),
            profile_id: *vote.voter.as_uuid(),
            vote_value: vote.value.as_i16(),
            created_at: Utc::now(),
        };
        diesel::insert_into(caption_votes::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }
}
