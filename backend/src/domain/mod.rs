//! Domain types, services, and ports.
//!
//! Types are immutable and transport agnostic; invariants and serde
//! contracts live in each type's Rustdoc. Services implement the driving
//! ports in [`ports`] over the driven ports the outbound adapters provide.

pub mod caption;
pub mod error;
pub mod feed;
pub mod pipeline;
pub mod ports;
pub mod theme;
pub mod user;
pub mod vote;

pub use self::caption::{Caption, CaptionId, probe_caption_text};
pub use self::error::{Error, ErrorCode};
pub use self::feed::{CaptionFeedService, FEED_PAGE_SIZE};
pub use self::pipeline::{CaptionGenerationService, ImageContentType, ImageUpload};
pub use self::theme::HumorTheme;
pub use self::user::{DisplayName, EmailAddress, User, UserId, UserValidationError};
pub use self::vote::{NewVote, Vote, VoteTally, VoteValue};

/// Convenient result alias for domain operations.
pub type ApiResult<T> = Result<T, Error>;
