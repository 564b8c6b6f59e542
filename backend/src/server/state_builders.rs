//! Construction of the HTTP state from the server configuration.
//!
//! Each port gets its real adapter when the backing service is configured
//! and a fixture otherwise, so the server always starts.

use std::sync::Arc;

use tracing::warn;

use captionboard::domain::ports::{
    CaptionFeedQuery, FixtureCaptionFeedQuery, FixtureGenerateCaptions, FixtureIdentityProvider,
    FixtureThemeRepository, FixtureVoteCommand, GenerateCaptions, IdentityProvider,
    ThemeRepository, VoteCommand,
};
use captionboard::domain::{CaptionFeedService, CaptionGenerationService};
use captionboard::inbound::http::state::HttpState;
use captionboard::outbound::captioner::CaptionPipelineHttpApi;
use captionboard::outbound::identity::HttpIdentityProvider;
use captionboard::outbound::persistence::{
    DieselCaptionRepository, DieselThemeRepository, DieselVoteRepository,
};

use super::config::ServerConfig;

pub(crate) fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let (feed, votes, themes): (
        Arc<dyn CaptionFeedQuery>,
        Arc<dyn VoteCommand>,
        Arc<dyn ThemeRepository>,
    ) = match &config.db_pool {
        Some(pool) => {
            let captions = Arc::new(DieselCaptionRepository::new(pool.clone()));
            let vote_repo = Arc::new(DieselVoteRepository::new(pool.clone()));
            let service = Arc::new(CaptionFeedService::new(captions, vote_repo));
            let feed: Arc<dyn CaptionFeedQuery> = service.clone();
            let votes: Arc<dyn VoteCommand> = service;
            (feed, votes, Arc::new(DieselThemeRepository::new(pool.clone())))
        }
        None => {
            warn!("no database configured, feed and votes serve fixture data");
            (
                Arc::new(FixtureCaptionFeedQuery),
                Arc::new(FixtureVoteCommand),
                Arc::new(FixtureThemeRepository),
            )
        }
    };

    let generator: Arc<dyn GenerateCaptions> = match &config.caption_api {
        Some(settings) => {
            let api = CaptionPipelineHttpApi::new(&settings.base_url, settings.token.clone())
                .map_err(std::io::Error::other)?;
            Arc::new(CaptionGenerationService::new(Arc::new(api)))
        }
        None => {
            warn!("no captioning API configured, uploads will be unavailable");
            Arc::new(FixtureGenerateCaptions)
        }
    };

    let identity: Arc<dyn IdentityProvider> = match &config.identity {
        Some(settings) => {
            let provider =
                HttpIdentityProvider::new(&settings.base_url, settings.redirect_url.clone())
                    .map_err(std::io::Error::other)?;
            Arc::new(provider)
        }
        None => {
            warn!("no identity provider configured, sign-in serves a fixture user");
            Arc::new(FixtureIdentityProvider)
        }
    };

    Ok(HttpState {
        feed,
        votes,
        generator,
        identity,
        themes,
    })
}
