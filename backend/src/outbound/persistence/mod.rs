//! PostgreSQL persistence adapters.

mod diesel_caption_repository;
mod diesel_theme_repository;
mod diesel_vote_repository;
pub(crate) mod models;
pub mod pool;
pub(crate) mod schema;

pub use diesel_caption_repository::DieselCaptionRepository;
pub use diesel_theme_repository::DieselThemeRepository;
pub use diesel_vote_repository::DieselVoteRepository;
pub use pool::{DbPool, PoolConfig, PoolError};

use diesel::Connection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

/// Migrations shipped with this crate (`backend/migrations`).
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Run pending migrations over a short-lived synchronous connection.
///
/// Diesel's migration harness is synchronous; this is invoked once at
/// startup before the async pool is built.
///
/// # Errors
///
/// Returns a descriptive message when connecting or migrating fails.
pub fn run_migrations(database_url: &str) -> Result<(), String> {
    let mut conn = diesel::pg::PgConnection::establish(database_url)
        .map_err(|error| format!("failed to connect for migrations: {error}"))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|error| format!("failed to run migrations: {error}"))?;
    Ok(())
}
