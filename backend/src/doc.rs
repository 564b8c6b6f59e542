//! OpenAPI document assembled from the handler annotations.

use utoipa::OpenApi;

use crate::domain::{Error, User};
use crate::inbound::http;

/// Public OpenAPI surface used by Swagger UI and tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "CaptionBoard API",
        description = "Caption voting feed, OAuth sign-in, and caption-generation upload proxy."
    ),
    paths(
        http::pages::home,
        http::pages::protected,
        http::captions::captions_page,
        http::votes::submit_vote,
        http::uploads::upload_page,
        http::uploads::generate_captions,
        http::themes::list_themes,
        http::auth::login,
        http::auth::callback,
        http::auth::logout,
        http::health::ready,
        http::health::live,
    ),
    components(schemas(
        Error,
        User,
        crate::domain::HumorTheme,
        crate::domain::ports::GeneratedCaption,
        http::pages::HomePage,
        http::pages::ProtectedPage,
        http::captions::CaptionsPage,
        http::captions::CaptionEntryDto,
        http::captions::PaginationDto,
        http::votes::SubmitVoteRequest,
        http::votes::SubmitVoteResponse,
        http::uploads::UploadPage,
        http::uploads::GenerateCaptionsResponse,
        http::themes::ThemesPage,
    )),
    tags(
        (name = "pages", description = "Page models"),
        (name = "captions", description = "Caption feed and voting"),
        (name = "uploads", description = "Image upload proxy"),
        (name = "themes", description = "Humor theme listing"),
        (name = "auth", description = "OAuth sign-in"),
        (name = "health", description = "Probes")
    )
)]
pub struct ApiDoc;
