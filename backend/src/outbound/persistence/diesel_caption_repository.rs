//! PostgreSQL-backed `CaptionRepository` using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::Caption;
use crate::domain::ports::{CaptionPage, CaptionPersistenceError, CaptionRepository};

use super::models::CaptionRow;
use super::pool::{DbPool, PoolError};
use super::schema::captions;

/// Diesel-backed implementation of the caption read port.
#[derive(Clone)]
pub struct DieselCaptionRepository {
    pool: DbPool,
}

impl DieselCaptionRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CaptionPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            CaptionPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> CaptionPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    debug!(error = %error, "caption query failed");
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            CaptionPersistenceError::connection(info.message().to_owned())
        }
        DieselError::DatabaseError(_, info) => {
            CaptionPersistenceError::query(info.message().to_owned())
        }
        other => CaptionPersistenceError::query(other.to_string()),
    }
}

#[async_trait]
impl CaptionRepository for DieselCaptionRepository {
    async fn list_page(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<CaptionPage, CaptionPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CaptionRow> = captions::table
            .order(captions::id.asc())
            .offset(offset)
            .limit(limit)
            .select(CaptionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let total: i64 = captions::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(CaptionPage {
            captions: rows.into_iter().map(Caption::from).collect(),
            total: u64::try_from(total).unwrap_or(0),
        })
    }
}
