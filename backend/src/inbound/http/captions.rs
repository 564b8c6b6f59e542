//! Caption feed page.
//!
//! ```text
//! GET /captions?page=N   session-gated; redirects to / when signed out
//! ```
//!
//! The `page` parameter is parsed defensively: non-numeric and negative
//! values collapse to page zero rather than erroring.

use actix_web::{HttpResponse, get, web};
use pagination::PageNumber;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::{CaptionFeedEntry, CaptionFeedPage, CaptionFeedQuery as _};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::pages::redirect_to_home;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Query parameters accepted by the captions page.
#[derive(Debug, Deserialize)]
pub struct CaptionsQuery {
    /// Zero-based page number; anything unparsable reads as page zero.
    page: Option<String>,
}

/// One caption as rendered in the feed.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaptionEntryDto {
    /// Caption row id.
    id: i64,
    /// Display text; rows without text render as `Caption #<id>`.
    text: String,
    upvotes: u32,
    downvotes: u32,
    /// The viewer's own vote: 1, −1, or absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    my_vote: Option<i16>,
}

impl From<CaptionFeedEntry> for CaptionEntryDto {
    fn from(entry: CaptionFeedEntry) -> Self {
        Self {
            id: entry.caption.id().get(),
            text: entry.caption.display_text(),
            upvotes: entry.tally.upvotes,
            downvotes: entry.tally.downvotes,
            my_vote: entry.my_vote.map(crate::domain::VoteValue::as_i16),
        }
    }
}

/// Pagination envelope rendered alongside the entries.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationDto {
    page: u32,
    per_page: u32,
    total_items: u64,
    total_pages: u64,
    has_previous: bool,
    has_next: bool,
}

/// Captions page model.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaptionsPage {
    /// Email of the signed-in viewer, as shown in the page header.
    viewer_email: String,
    entries: Vec<CaptionEntryDto>,
    pagination: PaginationDto,
}

impl CaptionsPage {
    fn from_feed(viewer_email: String, feed: CaptionFeedPage) -> Self {
        let pagination = PaginationDto {
            page: feed.page(),
            per_page: feed.per_page(),
            total_items: feed.total_items(),
            total_pages: feed.total_pages(),
            has_previous: feed.has_previous(),
            has_next: feed.has_next(),
        };
        let entries = feed.map(CaptionEntryDto::from);
        Self {
            viewer_email,
            entries: entries.into_items(),
            pagination,
        }
    }
}

/// Caption feed page for the signed-in viewer.
#[utoipa::path(
    get,
    path = "/captions",
    params(("page" = Option<String>, Query, description = "Zero-based page number")),
    responses(
        (status = 200, description = "Caption feed page model", body = CaptionsPage),
        (status = 303, description = "Signed out; redirected to the landing page"),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["captions"],
    operation_id = "captionsPage"
)]
#[get("/captions")]
pub async fn captions_page(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<CaptionsQuery>,
) -> ApiResult<HttpResponse> {
    let Some(user) = session.current_user() else {
        return Ok(redirect_to_home());
    };

    let page = PageNumber::parse_lossy(query.page.as_deref());
    let feed = state.feed.feed_page(user.id(), page).await?;
    let response = CaptionsPage::from_feed(user.email().to_string(), feed);

    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(response))
}
