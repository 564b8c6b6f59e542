//! Session-gate coverage over a fixture-backed application.
//!
//! Exercises the real route table: page routes redirect signed-out visitors
//! to the landing page without touching any port, while action endpoints
//! answer 401.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::http::{StatusCode, header};
use actix_web::{App, HttpResponse, test, web};
use serde_json::{Value, json};

use captionboard::domain::{EmailAddress, Error, User, UserId};
use captionboard::inbound::http::captions::captions_page;
use captionboard::inbound::http::pages::{home, protected};
use captionboard::inbound::http::session::SessionContext;
use captionboard::inbound::http::state::HttpState;
use captionboard::inbound::http::uploads::{generate_captions, upload_page};
use captionboard::inbound::http::votes::submit_vote;

fn fixture_user() -> User {
    User::new(
        UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("fixture id"),
        EmailAddress::new("ada@example.com").expect("fixture email"),
        None,
        None,
    )
}

fn gate_app() -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();

    App::new()
        .app_data(web::Data::new(HttpState::fixture()))
        .wrap(session)
        .service(home)
        .service(protected)
        .service(captions_page)
        .service(submit_vote)
        .service(upload_page)
        .service(generate_captions)
        .route(
            "/test/sign-in",
            web::post().to(|session: SessionContext| async move {
                session.persist_user(&fixture_user())?;
                Ok::<_, Error>(HttpResponse::Ok())
            }),
        )
}

async fn sign_in<S, B>(app: &S) -> Cookie<'static>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
    B: actix_web::body::MessageBody,
{
    let res = test::call_service(
        app,
        test::TestRequest::post().uri("/test/sign-in").to_request(),
    )
    .await;
    assert!(res.status().is_success());
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

fn assert_redirects_home(res: &actix_web::dev::ServiceResponse) {
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        res.headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok()),
        Some("/")
    );
}

#[actix_web::test]
async fn the_home_page_is_public() {
    let app = test::init_service(gate_app()).await;
    let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn page_routes_redirect_signed_out_visitors() {
    let app = test::init_service(gate_app()).await;
    for path in ["/protected", "/captions", "/captions?page=2", "/upload"] {
        let res = test::call_service(&app, test::TestRequest::get().uri(path).to_request()).await;
        assert_redirects_home(&res);
    }
}

#[actix_web::test]
async fn action_endpoints_answer_unauthorised_when_signed_out() {
    let app = test::init_service(gate_app()).await;

    let vote_res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/captions/1/votes")
            .set_json(json!({ "value": 1 }))
            .to_request(),
    )
    .await;
    assert_eq!(vote_res.status(), StatusCode::UNAUTHORIZED);

    let upload_res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/generate-captions")
            .to_request(),
    )
    .await;
    assert_eq!(upload_res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn a_signed_in_visitor_sees_the_empty_fixture_feed() {
    let app = test::init_service(gate_app()).await;
    let cookie = sign_in(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/captions?page=banana")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let value: Value = test::read_body_json(res).await;
    assert_eq!(value["viewerEmail"], "ada@example.com");
    assert_eq!(value["entries"].as_array().map(Vec::len), Some(0));
    assert_eq!(value["pagination"]["page"], 0);
    assert_eq!(value["pagination"]["perPage"], 20);
    assert_eq!(value["pagination"]["hasNext"], false);
}

#[actix_web::test]
async fn a_signed_in_visitor_can_vote_against_the_fixture_command() {
    let app = test::init_service(gate_app()).await;
    let cookie = sign_in(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/captions/1/votes")
            .cookie(cookie)
            .set_json(json!({ "value": -1 }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let value: Value = test::read_body_json(res).await;
    assert_eq!(value["success"], true);
}
