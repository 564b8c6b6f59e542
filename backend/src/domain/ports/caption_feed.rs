//! Driving ports for the caption feed and vote submission.
//!
//! Inbound adapters call these use-cases without importing persistence
//! concerns; handler tests substitute deterministic doubles.

use async_trait::async_trait;
use pagination::{Page, PageNumber, PageRequest};

use crate::domain::caption::{Caption, CaptionId};
use crate::domain::error::Error;
use crate::domain::feed::FEED_PAGE_SIZE;
use crate::domain::user::UserId;
use crate::domain::vote::{VoteTally, VoteValue};

/// One caption as rendered in the feed: the record, its tally, and the
/// viewer's own vote when one exists.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionFeedEntry {
    pub caption: Caption,
    pub tally: VoteTally,
    pub my_vote: Option<VoteValue>,
}

/// A feed page: entries plus the pagination envelope.
pub type CaptionFeedPage = Page<CaptionFeedEntry>;

/// Domain use-case port for reading the caption feed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CaptionFeedQuery: Send + Sync {
    /// Assemble the feed page the viewer asked for.
    ///
    /// Read failures degrade to an empty page rather than erroring; the
    /// error path is reserved for failures of the use-case itself.
    async fn feed_page(&self, viewer: &UserId, page: PageNumber)
    -> Result<CaptionFeedPage, Error>;
}

/// Domain use-case port for casting a vote.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VoteCommand: Send + Sync {
    /// Record the voter's verdict on a caption.
    async fn cast_vote(
        &self,
        voter: &UserId,
        caption_id: CaptionId,
        value: VoteValue,
    ) -> Result<(), Error>;
}

/// Fixture feed serving empty pages.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCaptionFeedQuery;

#[async_trait]
impl CaptionFeedQuery for FixtureCaptionFeedQuery {
    async fn feed_page(
        &self,
        _viewer: &UserId,
        page: PageNumber,
    ) -> Result<CaptionFeedPage, Error> {
        Ok(Page::empty(PageRequest::new(page, FEED_PAGE_SIZE), 0))
    }
}

/// Fixture command accepting every vote.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureVoteCommand;

#[async_trait]
impl VoteCommand for FixtureVoteCommand {
    async fn cast_vote(
        &self,
        _voter: &UserId,
        _caption_id: CaptionId,
        _value: VoteValue,
    ) -> Result<(), Error> {
        Ok(())
    }
}
