//! OAuth sign-in, callback, and sign-out.
//!
//! ```text
//! GET  /auth/login      302 to the provider's authorize URL
//! GET  /auth/callback   code exchange; on failure redirect to /?error=auth
//! POST /auth/logout     purge the session, redirect home
//! ```
//!
//! Provider failures are treated as "no user": the visitor lands back on the
//! home page with the error flag, never on an error response.

use actix_web::{HttpResponse, get, http::header, post, web};
use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::ports::{AuthState, IdentityProvider as _};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

fn redirect_to(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.to_owned()))
        .finish()
}

fn redirect_with_auth_error() -> HttpResponse {
    redirect_to("/?error=auth")
}

/// Begin OAuth sign-in: stash a CSRF nonce and bounce to the provider.
#[utoipa::path(
    get,
    path = "/auth/login",
    responses(
        (status = 302, description = "Redirect to the identity provider")
    ),
    tags = ["auth"],
    operation_id = "authLogin",
    security([])
)]
#[get("/auth/login")]
pub async fn login(state: web::Data<HttpState>, session: SessionContext) -> ApiResult<HttpResponse> {
    let auth_state = AuthState::generate();
    session.begin_login(&auth_state)?;
    let url = state.identity.authorize_url(&auth_state);
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, url.to_string()))
        .finish())
}

/// Query parameters the provider appends to the callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// OAuth callback: verify the nonce, exchange the code, establish the
/// session.
#[utoipa::path(
    get,
    path = "/auth/callback",
    params(
        ("code" = Option<String>, Query, description = "Authorization code"),
        ("state" = Option<String>, Query, description = "Echoed CSRF nonce"),
        ("error" = Option<String>, Query, description = "Provider-side failure")
    ),
    responses(
        (status = 303, description = "Redirect home; /?error=auth on failure")
    ),
    tags = ["auth"],
    operation_id = "authCallback",
    security([])
)]
#[get("/auth/callback")]
pub async fn callback(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<CallbackQuery>,
) -> ApiResult<HttpResponse> {
    let stored = session.take_login_state();

    if let Some(provider_error) = &query.error {
        warn!(provider_error = %provider_error, "provider reported a sign-in failure");
        return Ok(redirect_with_auth_error());
    }

    let (Some(code), Some(echoed)) = (&query.code, &query.state) else {
        warn!("callback arrived without a code or state");
        return Ok(redirect_with_auth_error());
    };

    let state_matches = stored
        .is_some_and(|expected| AuthState::parse(echoed) == Some(expected));
    if !state_matches {
        warn!("callback state did not match the stashed login nonce");
        return Ok(redirect_with_auth_error());
    }

    match state.identity.exchange_code(code).await {
        Ok(user) => {
            session.persist_user(&user)?;
            info!(user_id = %user.id(), "sign-in completed");
            Ok(redirect_to("/"))
        }
        Err(error) => {
            // Provider failures degrade to "no user" rather than erroring.
            warn!(%error, "authorization code exchange failed");
            Ok(redirect_with_auth_error())
        }
    }
}

/// Sign out: purge the session cookie.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 303, description = "Session purged; redirect home")
    ),
    tags = ["auth"],
    operation_id = "authLogout"
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    redirect_to("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        FixtureIdentityProvider, IdentityProvider, IdentityProviderError, MockIdentityProvider,
    };
    use crate::inbound::http::session::SessionContext;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use std::sync::Arc;
    use url::Url;

    fn auth_app(
        identity: Arc<dyn crate::domain::ports::IdentityProvider>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let state = HttpState {
            identity,
            ..HttpState::fixture()
        };
        App::new()
            .app_data(web::Data::new(state))
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .service(login)
            .service(callback)
            .service(logout)
            .route(
                "/whoami",
                web::get().to(|session: SessionContext| async move {
                    match session.current_user() {
                        Some(user) => HttpResponse::Ok().body(user.email().to_string()),
                        None => HttpResponse::Unauthorized().finish(),
                    }
                }),
            )
    }

    fn location_of(res: &actix_web::dev::ServiceResponse) -> String {
        res.headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .expect("redirect location")
            .to_owned()
    }

    fn session_cookie(res: &actix_web::dev::ServiceResponse) -> actix_web::cookie::Cookie<'static> {
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned()
    }

    #[actix_web::test]
    async fn login_redirects_to_the_provider_with_the_stashed_state() {
        let app = test::init_service(auth_app(Arc::new(FixtureIdentityProvider))).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/auth/login").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FOUND);
        let location = Url::parse(&location_of(&res)).expect("authorize URL");
        assert_eq!(location.host_str(), Some("identity.invalid"));
        assert!(
            location
                .query_pairs()
                .any(|(key, _)| key == "state"),
            "authorize URL must carry the CSRF state"
        );
    }

    #[actix_web::test]
    async fn a_full_sign_in_establishes_the_session() {
        let app = test::init_service(auth_app(Arc::new(FixtureIdentityProvider))).await;

        let login_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/auth/login").to_request(),
        )
        .await;
        let cookie = session_cookie(&login_res);
        let authorize = Url::parse(&location_of(&login_res)).expect("authorize URL");
        let state = authorize
            .query_pairs()
            .find(|(key, _)| key == "state")
            .map(|(_, value)| value.into_owned())
            .expect("state parameter");

        let callback_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/auth/callback?code=abc123&state={state}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(callback_res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location_of(&callback_res), "/");
        let signed_in = session_cookie(&callback_res);

        let whoami_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(signed_in)
                .to_request(),
        )
        .await;
        assert_eq!(whoami_res.status(), StatusCode::OK);
        let body = test::read_body(whoami_res).await;
        assert_eq!(body, "fixture@example.com");
    }

    #[actix_web::test]
    async fn a_mismatched_state_redirects_with_the_error_flag() {
        let mut identity = MockIdentityProvider::new();
        identity.expect_exchange_code().never();
        identity
            .expect_authorize_url()
            .returning(|state| FixtureIdentityProvider.authorize_url(state));
        let app = test::init_service(auth_app(Arc::new(identity))).await;

        let login_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/auth/login").to_request(),
        )
        .await;
        let cookie = session_cookie(&login_res);

        let callback_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/auth/callback?code=abc123&state=00000000-0000-0000-0000-000000000000")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(callback_res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location_of(&callback_res), "/?error=auth");
    }

    #[actix_web::test]
    async fn a_provider_error_never_reaches_the_exchange() {
        let mut identity = MockIdentityProvider::new();
        identity.expect_exchange_code().never();
        let app = test::init_service(auth_app(Arc::new(identity))).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/auth/callback?error=access_denied")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location_of(&res), "/?error=auth");
    }

    #[actix_web::test]
    async fn a_failed_exchange_degrades_to_the_error_flag() {
        let mut identity = MockIdentityProvider::new();
        identity
            .expect_authorize_url()
            .returning(|state| FixtureIdentityProvider.authorize_url(state));
        identity
            .expect_exchange_code()
            .returning(|_| Err(IdentityProviderError::upstream(500_u16, "token mint broke")));
        let app = test::init_service(auth_app(Arc::new(identity))).await;

        let login_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/auth/login").to_request(),
        )
        .await;
        let cookie = session_cookie(&login_res);
        let authorize = Url::parse(&location_of(&login_res)).expect("authorize URL");
        let state = authorize
            .query_pairs()
            .find(|(key, _)| key == "state")
            .map(|(_, value)| value.into_owned())
            .expect("state parameter");

        let callback_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/auth/callback?code=abc123&state={state}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(location_of(&callback_res), "/?error=auth");
    }

    #[actix_web::test]
    async fn logout_purges_the_session() {
        let app = test::init_service(auth_app(Arc::new(FixtureIdentityProvider))).await;

        let login_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/auth/login").to_request(),
        )
        .await;
        let cookie = session_cookie(&login_res);
        let authorize = Url::parse(&location_of(&login_res)).expect("authorize URL");
        let state = authorize
            .query_pairs()
            .find(|(key, _)| key == "state")
            .map(|(_, value)| value.into_owned())
            .expect("state parameter");
        let callback_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/auth/callback?code=abc123&state={state}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let signed_in = session_cookie(&callback_res);

        let logout_res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/auth/logout")
                .cookie(signed_in)
                .to_request(),
        )
        .await;
        assert_eq!(logout_res.status(), StatusCode::SEE_OTHER);
        let cleared = session_cookie(&logout_res);

        let whoami_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(cleared)
                .to_request(),
        )
        .await;
        assert_eq!(whoami_res.status(), StatusCode::UNAUTHORIZED);
    }
}
