//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on domain ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CaptionFeedQuery, FixtureCaptionFeedQuery, FixtureGenerateCaptions, FixtureIdentityProvider,
    FixtureThemeRepository, FixtureVoteCommand, GenerateCaptions, IdentityProvider,
    ThemeRepository, VoteCommand,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Caption feed reads.
    pub feed: Arc<dyn CaptionFeedQuery>,
    /// Vote submission.
    pub votes: Arc<dyn VoteCommand>,
    /// Upload-proxy caption generation.
    pub generator: Arc<dyn GenerateCaptions>,
    /// OAuth identity provider.
    pub identity: Arc<dyn IdentityProvider>,
    /// Read-only humor theme listing.
    pub themes: Arc<dyn ThemeRepository>,
}

impl HttpState {
    /// State backed entirely by fixtures, for handler tests and runs with no
    /// backing services configured.
    #[must_use]
    pub fn fixture() -> Self {
        Self {
            feed: Arc::new(FixtureCaptionFeedQuery),
            votes: Arc::new(FixtureVoteCommand),
            generator: Arc::new(FixtureGenerateCaptions),
            identity: Arc::new(FixtureIdentityProvider),
            themes: Arc::new(FixtureThemeRepository),
        }
    }
}
