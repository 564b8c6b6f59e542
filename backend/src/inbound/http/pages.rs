//! Landing and protected page models.
//!
//! ```text
//! GET /            public; reflects session state and the auth error flag
//! GET /protected   session-gated; redirects to / when signed out
//! ```

use actix_web::{HttpResponse, get, http::header, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::User;
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::session::SessionContext;

/// Redirect an unauthenticated visitor to the landing route.
pub(crate) fn redirect_to_home() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .finish()
}

/// Query parameters accepted by the landing page.
#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    /// Error flag appended by a failed sign-in (`/?error=auth`).
    error: Option<String>,
}

/// Landing page model.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HomePage {
    /// Whether a session user is present.
    signed_in: bool,
    /// The session user, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<User>,
    /// Whether the previous sign-in attempt failed.
    auth_error: bool,
}

/// Landing page: public, reflects session state.
#[utoipa::path(
    get,
    path = "/",
    params(("error" = Option<String>, Query, description = "Auth error flag from a failed sign-in")),
    responses(
        (status = 200, description = "Landing page model", body = HomePage)
    ),
    tags = ["pages"],
    operation_id = "home",
    security([])
)]
#[get("/")]
pub async fn home(session: SessionContext, query: web::Query<HomeQuery>) -> ApiResult<HttpResponse> {
    let user = session.current_user();
    let page = HomePage {
        signed_in: user.is_some(),
        user,
        auth_error: query.error.as_deref() == Some("auth"),
    };
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(page))
}

/// Protected page model: the signed-in user's identity details.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProtectedPage {
    /// Greeting label: display name, falling back to email.
    display_label: String,
    /// Provider-reported email address.
    email: String,
    /// Stable user identifier.
    user_id: String,
    /// Most recent sign-in, when the provider reported one.
    #[serde(skip_serializing_if = "Option::is_none")]
    last_sign_in_at: Option<DateTime<Utc>>,
}

/// Protected page: session-gated identity details.
#[utoipa::path(
    get,
    path = "/protected",
    responses(
        (status = 200, description = "Protected page model", body = ProtectedPage),
        (status = 303, description = "Signed out; redirected to the landing page")
    ),
    tags = ["pages"],
    operation_id = "protectedPage"
)]
#[get("/protected")]
pub async fn protected(session: SessionContext) -> ApiResult<HttpResponse> {
    let Some(user) = session.current_user() else {
        return Ok(redirect_to_home());
    };
    let page = ProtectedPage {
        display_label: user.display_label().to_owned(),
        email: user.email().to_string(),
        user_id: user.id().to_string(),
        last_sign_in_at: user.last_sign_in_at(),
    };
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(page))
}
