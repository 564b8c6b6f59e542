//! Public humor theme listing.
//!
//! ```text
//! GET /themes
//! ```
//!
//! Read failures degrade to an empty list, matching the feed's read policy.

use actix_web::{HttpResponse, get, web};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::HumorTheme;
use crate::domain::ports::ThemeRepository as _;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Theme listing page model.
#[derive(Debug, Serialize, ToSchema)]
pub struct ThemesPage {
    themes: Vec<HumorTheme>,
}

/// List humor themes, ordered by name.
#[utoipa::path(
    get,
    path = "/themes",
    responses(
        (status = 200, description = "Theme listing", body = ThemesPage)
    ),
    tags = ["themes"],
    operation_id = "listThemes",
    security([])
)]
#[get("/themes")]
pub async fn list_themes(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let themes = match state.themes.list_ordered_by_name().await {
        Ok(themes) => themes,
        Err(error) => {
            warn!(%error, "theme read failed, rendering an empty list");
            Vec::new()
        }
    };
    Ok(HttpResponse::Ok().json(ThemesPage { themes }))
}
