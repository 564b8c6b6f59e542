//! Domain ports: the traits inbound and outbound adapters meet at.
//!
//! Driving ports ([`CaptionFeedQuery`], [`VoteCommand`], [`GenerateCaptions`])
//! are called by inbound adapters; driven ports ([`CaptionRepository`],
//! [`VoteRepository`], [`ThemeRepository`], [`CaptionPipelineApi`],
//! [`IdentityProvider`]) are implemented by outbound adapters. Each port
//! ships a fixture for tests and unconfigured development runs.

pub(crate) mod macros;

mod caption_feed;
mod caption_generation;
mod caption_pipeline;
mod caption_repository;
mod identity_provider;
mod theme_repository;
mod vote_repository;

pub use caption_feed::{
    CaptionFeedEntry, CaptionFeedPage, CaptionFeedQuery, FixtureCaptionFeedQuery,
    FixtureVoteCommand, VoteCommand,
};
pub use caption_generation::{FixtureGenerateCaptions, GenerateCaptions, GeneratedCaptionSet};
pub use caption_pipeline::{
    CaptionPipelineApi, GeneratedCaption, ImageId, PipelineApiError, UploadTarget,
};
pub use caption_repository::{
    CaptionPage, CaptionPersistenceError, CaptionRepository, FixtureCaptionRepository,
};
pub use identity_provider::{
    AuthState, FixtureIdentityProvider, IdentityProvider, IdentityProviderError,
};
pub use theme_repository::{FixtureThemeRepository, ThemePersistenceError, ThemeRepository};
pub use vote_repository::{FixtureVoteRepository, VotePersistenceError, VoteRepository};

#[cfg(test)]
pub use caption_feed::{MockCaptionFeedQuery, MockVoteCommand};
#[cfg(test)]
pub use caption_generation::MockGenerateCaptions;
#[cfg(test)]
pub use caption_pipeline::MockCaptionPipelineApi;
#[cfg(test)]
pub use caption_repository::MockCaptionRepository;
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
#[cfg(test)]
pub use theme_repository::MockThemeRepository;
#[cfg(test)]
pub use vote_repository::MockVoteRepository;
