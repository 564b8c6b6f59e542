//! Driven port for the external captioning API.
//!
//! The adapter owns transport only; the four-step sequencing and its
//! short-circuit rules live in the domain service.

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use url::Url;
use utoipa::ToSchema;

use crate::domain::pipeline::ImageContentType;

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by the captioning API adapter.
    pub enum PipelineApiError {
        /// The API answered with a non-success status; `body` is its
        /// response text, surfaced verbatim to callers.
        Upstream { status: u16, body: String } => "upstream status {status}: {body}",
        /// The request never completed (connect, TLS, or read failure).
        Transport { message: String } => "pipeline transport failure: {message}",
        /// The response arrived but could not be decoded.
        Decode { message: String } => "pipeline response decode failed: {message}",
    }
}

/// Short-lived upload target issued by the captioning API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    /// Time-limited destination for the raw image bytes.
    pub presigned_url: Url,
    /// Public CDN URL the image will be served from.
    pub cdn_url: Url,
}

/// Opaque image identifier minted by the pipeline on registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageId(String);

impl ImageId {
    /// Wrap a raw pipeline identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One generated caption, decoded from the pipeline's loosely shaped
/// caption objects through the text-probing shim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedCaption {
    /// Pipeline-side identifier, when the object carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Recovered caption text, or the raw JSON when no text key matched.
    pub text: String,
}

/// Port mirroring the captioning API's four endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CaptionPipelineApi: Send + Sync {
    /// Request a presigned upload URL and CDN URL for the content type.
    async fn create_upload_target(
        &self,
        content_type: ImageContentType,
    ) -> Result<UploadTarget, PipelineApiError>;

    /// `PUT` the raw image bytes to the presigned URL.
    async fn upload_bytes(
        &self,
        target: &UploadTarget,
        content_type: ImageContentType,
        bytes: Bytes,
    ) -> Result<(), PipelineApiError>;

    /// Register the CDN URL with the pipeline, obtaining an image id.
    async fn register_image(&self, cdn_url: &Url) -> Result<ImageId, PipelineApiError>;

    /// Request caption generation for a registered image.
    async fn generate_captions(
        &self,
        image_id: &ImageId,
    ) -> Result<Vec<GeneratedCaption>, PipelineApiError>;
}
