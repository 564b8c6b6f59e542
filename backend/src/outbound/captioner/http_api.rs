//! Reqwest-backed captioning API adapter.
//!
//! Owns transport only: request serialisation, status and decode mapping.
//! Requests deliberately carry no client-side timeout — a hung upstream call
//! blocks its request, preserving the proxy's historical behaviour.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use url::Url;

use crate::domain::ImageContentType;
use crate::domain::ports::{
    CaptionPipelineApi, GeneratedCaption, ImageId, PipelineApiError, UploadTarget,
};

use super::dto::{PresignedUrlDto, RegisteredImageDto, decode_captions};

/// Errors raised while constructing the adapter.
#[derive(Debug, thiserror::Error)]
pub enum CaptionerBuildError {
    /// The base URL cannot host the pipeline endpoints.
    #[error("invalid captioning API base URL: {0}")]
    Url(#[from] url::ParseError),
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Captioning API adapter speaking JSON over HTTPS with bearer auth.
pub struct CaptionPipelineHttpApi {
    client: Client,
    token: String,
    presign_url: Url,
    register_url: Url,
    generate_url: Url,
}

impl CaptionPipelineHttpApi {
    /// Build an adapter rooted at `base_url` (e.g. `https://api.almostcrackd.ai`).
    ///
    /// # Errors
    ///
    /// Returns [`CaptionerBuildError`] when the base URL cannot be extended
    /// with the endpoint paths or the client fails to construct.
    pub fn new(base_url: &Url, token: impl Into<String>) -> Result<Self, CaptionerBuildError> {
        let base = ensure_trailing_slash(base_url);
        Ok(Self {
            client: Client::builder().build()?,
            token: token.into(),
            presign_url: base.join("pipeline/generate-presigned-url")?,
            register_url: base.join("pipeline/upload-image-from-url")?,
            generate_url: base.join("pipeline/generate-captions")?,
        })
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        body: &serde_json::Value,
    ) -> Result<T, PipelineApiError> {
        let response = self
            .client
            .post(url.clone())
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(upstream_error(status, bytes.as_ref()));
        }
        serde_json::from_slice(bytes.as_ref())
            .map_err(|error| PipelineApiError::decode(error.to_string()))
    }
}

fn ensure_trailing_slash(url: &Url) -> Url {
    let mut base = url.clone();
    if !base.path().ends_with('/') {
        base.set_path(&format!("{}/", base.path()));
    }
    base
}

fn map_transport_error(error: reqwest::Error) -> PipelineApiError {
    PipelineApiError::transport(error.to_string())
}

fn upstream_error(status: StatusCode, body: &[u8]) -> PipelineApiError {
    PipelineApiError::upstream(status.as_u16(), String::from_utf8_lossy(body).into_owned())
}

#[async_trait]
impl CaptionPipelineApi for CaptionPipelineHttpApi {
    async fn create_upload_target(
        &self,
        content_type: ImageContentType,
    ) -> Result<UploadTarget, PipelineApiError> {
        let dto: PresignedUrlDto = self
            .post_json(
                &self.presign_url,
                &json!({ "contentType": content_type.as_str() }),
            )
            .await?;
        dto.into_upload_target().map_err(PipelineApiError::decode)
    }

    async fn upload_bytes(
        &self,
        target: &UploadTarget,
        content_type: ImageContentType,
        bytes: Bytes,
    ) -> Result<(), PipelineApiError> {
        let response = self
            .client
            .put(target.presigned_url.clone())
            .header(reqwest::header::CONTENT_TYPE, content_type.as_str())
            .body(bytes)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.map_err(map_transport_error)?;
            return Err(upstream_error(status, body.as_ref()));
        }
        Ok(())
    }

    async fn register_image(&self, cdn_url: &Url) -> Result<ImageId, PipelineApiError> {
        let dto: RegisteredImageDto = self
            .post_json(
                &self.register_url,
                &json!({ "imageUrl": cdn_url.as_str(), "isCommonUse": false }),
            )
            .await?;
        dto.into_image_id().map_err(PipelineApiError::decode)
    }

    async fn generate_captions(
        &self,
        image_id: &ImageId,
    ) -> Result<Vec<GeneratedCaption>, PipelineApiError> {
        let payload: serde_json::Value = self
            .post_json(&self.generate_url, &json!({ "imageId": image_id.as_str() }))
            .await?;
        Ok(decode_captions(&payload))
    }
}
