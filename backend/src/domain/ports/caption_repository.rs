//! Driven port for reading caption records.

use async_trait::async_trait;

use crate::domain::caption::Caption;

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by the caption read adapter.
    pub enum CaptionPersistenceError {
        /// Connection to the backing store could not be established.
        Connection { message: String } => "caption read connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } => "caption read query failed: {message}",
    }
}

/// One page of caption rows plus the exact total count across all pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionPage {
    /// Rows for the requested window, ordered by id ascending.
    pub captions: Vec<Caption>,
    /// Total caption rows in the collection.
    pub total: u64,
}

/// Port for paged caption reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CaptionRepository: Send + Sync {
    /// Fetch `limit` caption rows starting at `offset`, ordered by id, plus
    /// the exact total row count.
    async fn list_page(&self, offset: i64, limit: i64)
    -> Result<CaptionPage, CaptionPersistenceError>;
}

/// Fixture repository serving an empty collection.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCaptionRepository;

#[async_trait]
impl CaptionRepository for FixtureCaptionRepository {
    async fn list_page(
        &self,
        _offset: i64,
        _limit: i64,
    ) -> Result<CaptionPage, CaptionPersistenceError> {
        Ok(CaptionPage {
            captions: Vec::new(),
            total: 0,
        })
    }
}
