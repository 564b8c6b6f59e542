//! Caption feed assembly and vote casting.
//!
//! The feed is read in three scoped queries: one caption page with an exact
//! count, all votes for that page's id set, and the viewer's own votes as a
//! separate voter-filtered query. Scoping by id set keeps the vote reads
//! under the backing store's implicit row-return cap. Read failures degrade
//! (empty feed, zero tallies) instead of erroring; write failures surface.

use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageNumber, PageRequest};
use tracing::{info, warn};

use crate::domain::caption::{Caption, CaptionId};
use crate::domain::error::Error;
use crate::domain::ports::{
    CaptionFeedEntry, CaptionFeedPage, CaptionFeedQuery, CaptionRepository, VoteCommand,
    VotePersistenceError, VoteRepository,
};
use crate::domain::user::UserId;
use crate::domain::vote::{NewVote, Vote, VoteValue, own_vote_by_caption, tally_by_caption};

/// Fixed feed page size.
pub const FEED_PAGE_SIZE: NonZeroU32 = match NonZeroU32::new(20) {
    Some(size) => size,
    None => unreachable!(),
};

/// Message returned when a voter re-votes a caption.
const ALREADY_VOTED: &str = "you have already voted on this caption";

/// Feed reader and vote writer over the caption and vote ports.
#[derive(Clone)]
pub struct CaptionFeedService<C, V> {
    captions: Arc<C>,
    votes: Arc<V>,
}

impl<C, V> CaptionFeedService<C, V> {
    /// Create a new service over the given repositories.
    pub const fn new(captions: Arc<C>, votes: Arc<V>) -> Self {
        Self { captions, votes }
    }
}

impl<C, V> CaptionFeedService<C, V>
where
    C: CaptionRepository,
    V: VoteRepository,
{
    fn map_write_error(error: VotePersistenceError) -> Error {
        match error {
            VotePersistenceError::Connection { message } => Error::service_unavailable(message),
            // Write failures are user-visible verbatim.
            VotePersistenceError::Query { message } => Error::backend(message),
            VotePersistenceError::Duplicate { .. } => Error::conflict(ALREADY_VOTED),
        }
    }

    async fn votes_for_page(&self, caption_ids: &[CaptionId]) -> Vec<Vote> {
        match self.votes.votes_for_captions(caption_ids).await {
            Ok(votes) => votes,
            Err(error) => {
                warn!(%error, "vote tally read failed, rendering zero tallies");
                Vec::new()
            }
        }
    }

    async fn own_votes_for_page(&self, viewer: &UserId, caption_ids: &[CaptionId]) -> Vec<Vote> {
        match self.votes.votes_by_voter(viewer, caption_ids).await {
            Ok(votes) => votes,
            Err(error) => {
                warn!(%error, "own-vote read failed, rendering none");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl<C, V> CaptionFeedQuery for CaptionFeedService<C, V>
where
    C: CaptionRepository,
    V: VoteRepository,
{
    async fn feed_page(
        &self,
        viewer: &UserId,
        page: PageNumber,
    ) -> Result<CaptionFeedPage, Error> {
        let request = PageRequest::new(page, FEED_PAGE_SIZE);

        let listing = match self
            .captions
            .list_page(request.offset(), request.limit())
            .await
        {
            Ok(listing) => listing,
            Err(error) => {
                warn!(%error, "caption page read failed, rendering an empty feed");
                return Ok(Page::empty(request, 0));
            }
        };

        let caption_ids: Vec<CaptionId> = listing.captions.iter().map(Caption::id).collect();
        if caption_ids.is_empty() {
            return Ok(Page::empty(request, listing.total));
        }

        let all_votes = self.votes_for_page(&caption_ids).await;
        let own_votes = self.own_votes_for_page(viewer, &caption_ids).await;

        let tallies = tally_by_caption(&all_votes);
        let mine = own_vote_by_caption(&own_votes);

        let entries = listing
            .captions
            .into_iter()
            .map(|caption| {
                let tally = tallies.get(&caption.id()).copied().unwrap_or_default();
                let my_vote = mine.get(&caption.id()).copied();
                CaptionFeedEntry {
                    caption,
                    tally,
                    my_vote,
                }
            })
            .collect();

        Page::new(request, entries, listing.total)
            .map_err(|error| Error::internal(format!("feed page assembly failed: {error}")))
    }
}

#[async_trait]
impl<C, V> VoteCommand for CaptionFeedService<C, V>
where
    C: CaptionRepository,
    V: VoteRepository,
{
    async fn cast_vote(
        &self,
        voter: &UserId,
        caption_id: CaptionId,
        value: VoteValue,
    ) -> Result<(), Error> {
        let already_voted = self
            .votes
            .has_vote(voter, caption_id)
            .await
            .map_err(Self::map_write_error)?;
        if already_voted {
            return Err(Error::conflict(ALREADY_VOTED));
        }

        let vote = NewVote {
            caption_id,
            voter: *voter,
            value,
        };
        self.votes.insert(&vote).await.map_err(Self::map_write_error)?;

        info!(caption_id = %caption_id, value = %value, "vote recorded");
        Ok(())
    }
}
