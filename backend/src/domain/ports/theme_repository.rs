//! Driven port for the read-only humor theme listing.

use async_trait::async_trait;

use crate::domain::theme::HumorTheme;

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by the theme read adapter.
    pub enum ThemePersistenceError {
        /// Connection to the backing store could not be established.
        Connection { message: String } => "theme read connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } => "theme read query failed: {message}",
    }
}

/// Port for listing humor themes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ThemeRepository: Send + Sync {
    /// All theme rows, ordered by name ascending.
    async fn list_ordered_by_name(&self) -> Result<Vec<HumorTheme>, ThemePersistenceError>;
}

/// Fixture repository serving an empty theme list.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureThemeRepository;

#[async_trait]
impl ThemeRepository for FixtureThemeRepository {
    async fn list_ordered_by_name(&self) -> Result<Vec<HumorTheme>, ThemePersistenceError> {
        Ok(Vec::new())
    }
}
