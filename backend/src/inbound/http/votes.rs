//! Vote submission endpoint.
//!
//! ```text
//! POST /captions/{caption_id}/votes {"value": 1}
//! ```
//!
//! The session is re-checked server-side; the client's "already voted" UI
//! guard is never trusted. Write failures surface their message verbatim.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::VoteCommand as _;
use crate::domain::{CaptionId, Error, VoteValue};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Vote request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SubmitVoteRequest {
    /// +1 for an upvote, −1 for a downvote; everything else is rejected.
    #[schema(example = 1)]
    pub value: i16,
}

/// Vote response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitVoteResponse {
    pub success: bool,
}

/// Record the signed-in user's vote on a caption.
#[utoipa::path(
    post,
    path = "/captions/{caption_id}/votes",
    params(("caption_id" = i64, Path, description = "Caption row id")),
    request_body = SubmitVoteRequest,
    responses(
        (status = 200, description = "Vote recorded", body = SubmitVoteResponse),
        (status = 400, description = "Illegal vote value", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 409, description = "Already voted on this caption", body = Error),
        (status = 502, description = "Vote store failure", body = Error)
    ),
    tags = ["captions"],
    operation_id = "submitVote"
)]
#[post("/captions/{caption_id}/votes")]
pub async fn submit_vote(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<SubmitVoteRequest>,
) -> ApiResult<HttpResponse> {
    let user = session.require_user()?;
    let value = VoteValue::try_from(payload.value)
        .map_err(|error| Error::invalid_request(error.to_string()))?;
    let caption_id = CaptionId::new(path.into_inner());

    state.votes.cast_vote(user.id(), caption_id, value).await?;

    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(SubmitVoteResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockVoteCommand;
    use crate::inbound::http::test_utils::{fixture_user, signed_in_cookie};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::Value;
    use std::sync::Arc;

    fn votes_app(
        votes: MockVoteCommand,
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
            votes: Arc::new(votes),
            ..HttpState::fixture()
        };
        App::new()
            .app_data(web::Data::new(state))
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .service(submit_vote)
            .route(
                "/test/sign-in",
                web::post().to(|session: SessionContext| async move {
                    session.persist_user(&fixture_user())?;
                    Ok::<_, Error>(HttpResponse::Ok())
                }),
            )
    }

    fn vote_request(value: i16) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/captions/4/votes")
            .set_json(SubmitVoteRequest { value })
    }

    #[actix_web::test]
    async fn voting_requires_a_session() {
        let mut votes = MockVoteCommand::new();
        votes.expect_cast_vote().never();
        let app = test::init_service(votes_app(votes)).await;

        let res = test::call_service(&app, vote_request(1).to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn legal_votes_reach_the_command_and_succeed() {
        let mut votes = MockVoteCommand::new();
        votes
            .expect_cast_vote()
            .withf(|voter, caption_id, value| {
                voter == fixture_user().id()
                    && *caption_id == CaptionId::new(4)
                    && *value == VoteValue::Up
            })
            .times(1)
            .returning(|_, _, _| Ok(()));
        let app = test::init_service(votes_app(votes)).await;
        let cookie = signed_in_cookie(&app, "/test/sign-in").await;

        let res = test::call_service(&app, vote_request(1).cookie(cookie).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let value: Value = test::read_body_json(res).await;
        assert_eq!(value["success"], true);
    }

    #[actix_web::test]
    async fn illegal_vote_values_are_rejected_before_the_command() {
        let mut votes = MockVoteCommand::new();
        votes.expect_cast_vote().never();
        let app = test::init_service(votes_app(votes)).await;
        let cookie = signed_in_cookie(&app, "/test/sign-in").await;

        let res = test::call_service(&app, vote_request(3).cookie(cookie).to_request()).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let value: Value = test::read_body_json(res).await;
        assert_eq!(value["message"], "vote value must be 1 or -1, got 3");
    }

    #[actix_web::test]
    async fn duplicate_votes_surface_as_conflicts() {
        let mut votes = MockVoteCommand::new();
        votes
            .expect_cast_vote()
            .returning(|_, _, _| Err(Error::conflict("you have already voted on this caption")));
        let app = test::init_service(votes_app(votes)).await;
        let cookie = signed_in_cookie(&app, "/test/sign-in").await;

        let res = test::call_service(&app, vote_request(-1).cookie(cookie).to_request()).await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn store_failures_surface_their_message_verbatim() {
        let mut votes = MockVoteCommand::new();
        votes
            .expect_cast_vote()
            .returning(|_, _, _| Err(Error::backend("permission denied for table caption_votes")));
        let app = test::init_service(votes_app(votes)).await;
        let cookie = signed_in_cookie(&app, "/test/sign-in").await;

        let res = test::call_service(&app, vote_request(1).cookie(cookie).to_request()).await;
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
        let value: Value = test::read_body_json(res).await;
        assert_eq!(
            value["message"],
            "permission denied for table caption_votes"
        );
    }
}
