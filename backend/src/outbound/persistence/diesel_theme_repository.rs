//! PostgreSQL-backed `ThemeRepository` using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::HumorTheme;
use crate::domain::ports::{ThemePersistenceError, ThemeRepository};

use super::models::HumorThemeRow;
use super::pool::{DbPool, PoolError};
use super::schema::humor_themes;

/// Diesel-backed implementation of the theme read port.
#[derive(Clone)]
pub struct DieselThemeRepository {
    pool: DbPool,
}

impl DieselThemeRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ThemePersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ThemePersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> ThemePersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    debug!(error = %error, "theme query failed");
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            ThemePersistenceError::connection(info.message().to_owned())
        }
        DieselError::DatabaseError(_, info) => {
            ThemePersistenceError::query(info.message().to_owned())
        }
        other => ThemePersistenceError::query(other.to_string()),
    }
}

#[async_trait]
impl ThemeRepository for DieselThemeRepository {
    async fn list_ordered_by_name(&self) -> Result<Vec<HumorTheme>, ThemePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<HumorThemeRow> = humor_themes::table
            .order(humor_themes::name.asc())
            .select(HumorThemeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(HumorTheme::from).collect())
    }
}
