//! Driving port for the image-upload caption generation use-case.

use async_trait::async_trait;
use url::Url;

use crate::domain::error::Error;
use crate::domain::pipeline::ImageUpload;

use super::caption_pipeline::GeneratedCaption;

/// Result of a successful generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCaptionSet {
    /// Captions produced for the uploaded image.
    pub captions: Vec<GeneratedCaption>,
    /// Public CDN URL the uploaded image is served from.
    pub image_url: Url,
}

/// Domain use-case port for generating captions from an uploaded image.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerateCaptions: Send + Sync {
    /// Drive the upload pipeline for one validated image.
    async fn generate(&self, upload: ImageUpload) -> Result<GeneratedCaptionSet, Error>;
}

/// Fixture used when no pipeline endpoint is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureGenerateCaptions;

#[async_trait]
impl GenerateCaptions for FixtureGenerateCaptions {
    async fn generate(&self, _upload: ImageUpload) -> Result<GeneratedCaptionSet, Error> {
        Err(Error::service_unavailable(
            "caption pipeline is not configured",
        ))
    }
}
