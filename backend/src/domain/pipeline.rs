//! Image-upload caption generation.
//!
//! Four strictly sequential calls against the captioning API, each gated on
//! the previous succeeding: presigned-URL request, raw byte upload, image
//! registration, caption generation. A failing step short-circuits the chain
//! and surfaces the upstream status and body; transport and decode failures
//! are logged in full and surfaced only as a generic internal error. There
//! are no retries and no compensation for orphaned intermediate uploads.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{error, info};

use crate::domain::error::Error;
use crate::domain::ports::{
    CaptionPipelineApi, GenerateCaptions, GeneratedCaptionSet, PipelineApiError,
};

/// Image content types the upload proxy accepts.
///
/// Parsing happens before any outbound call, so an unsupported type never
/// produces network traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageContentType {
    Jpeg,
    Png,
    Webp,
    Gif,
    Heic,
}

impl ImageContentType {
    /// Accepted media types, as advertised to clients.
    pub const ALLOWED: [Self; 5] = [Self::Jpeg, Self::Png, Self::Webp, Self::Gif, Self::Heic];

    /// Parse a raw media type, accepting the historical `image/jpg` alias.
    ///
    /// # Errors
    ///
    /// Returns an invalid-request [`Error`] naming the offending type.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Ok(Self::Jpeg),
            "image/png" => Ok(Self::Png),
            "image/webp" => Ok(Self::Webp),
            "image/gif" => Ok(Self::Gif),
            "image/heic" => Ok(Self::Heic),
            _ => Err(Error::invalid_request(format!(
                "Unsupported image type: {raw}"
            ))),
        }
    }

    /// Canonical media type string sent upstream.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
            Self::Gif => "image/gif",
            Self::Heic => "image/heic",
        }
    }
}

impl fmt::Display for ImageContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated image upload: content type plus raw bytes.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub content_type: ImageContentType,
    pub bytes: Bytes,
}

/// Pipeline steps, used to label upstream failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PipelineStep {
    PresignedUrl,
    ByteUpload,
    Registration,
    Generation,
}

impl PipelineStep {
    /// User-facing failure prefix for the step.
    const fn failure_prefix(self) -> &'static str {
        match self {
            Self::PresignedUrl => "Failed to get presigned URL",
            Self::ByteUpload => "Failed to upload image",
            Self::Registration => "Failed to register image",
            Self::Generation => "Failed to generate captions",
        }
    }
}

/// Caption generation use-case over the pipeline port.
#[derive(Clone)]
pub struct CaptionGenerationService<A> {
    api: Arc<A>,
}

impl<A> CaptionGenerationService<A> {
    /// Create a new service over the given pipeline API.
    pub const fn new(api: Arc<A>) -> Self {
        Self { api }
    }
}

fn map_step_error(step: PipelineStep, error: PipelineApiError) -> Error {
    match error {
        PipelineApiError::Upstream { status, body } => {
            Error::upstream(status, format!("{}: {body}", step.failure_prefix()))
        }
        PipelineApiError::Transport { message } | PipelineApiError::Decode { message } => {
            // Full detail stays in the logs; callers only see the generic
            // internal message.
            error!(step = ?step, detail = %message, "caption pipeline failed unexpectedly");
            Error::internal(message)
        }
    }
}

#[async_trait]
impl<A> GenerateCaptions for CaptionGenerationService<A>
where
    A: CaptionPipelineApi,
{
    async fn generate(&self, upload: ImageUpload) -> Result<GeneratedCaptionSet, Error> {
        let content_type = upload.content_type;

        let target = self
            .api
            .create_upload_target(content_type)
            .await
            .map_err(|err| map_step_error(PipelineStep::PresignedUrl, err))?;

        self.api
            .upload_bytes(&target, content_type, upload.bytes)
            .await
            .map_err(|err| map_step_error(PipelineStep::ByteUpload, err))?;

        let image_id = self
            .api
            .register_image(&target.cdn_url)
            .await
            .map_err(|err| map_step_error(PipelineStep::Registration, err))?;

        let captions = self
            .api
            .generate_captions(&image_id)
            .await
            .map_err(|err| map_step_error(PipelineStep::Generation, err))?;

        info!(
            image_id = %image_id,
            captions = captions.len(),
            "caption generation completed"
        );
        Ok(GeneratedCaptionSet {
            captions,
            image_url: target.cdn_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorCode;
    use crate::domain::ports::{GeneratedCaption, ImageId, MockCaptionPipelineApi, UploadTarget};
    use rstest::rstest;
    use url::Url;

    fn upload() -> ImageUpload {
        ImageUpload {
            content_type: ImageContentType::Png,
            bytes: Bytes::from_static(b"\x89PNG fake"),
        }
    }

    fn target() -> UploadTarget {
        UploadTarget {
            presigned_url: Url::parse("https://uploads.example/presigned/abc").expect("url"),
            cdn_url: Url::parse("https://cdn.example/images/abc.png").expect("url"),
        }
    }

    fn service(api: MockCaptionPipelineApi) -> CaptionGenerationService<MockCaptionPipelineApi> {
        CaptionGenerationService::new(Arc::new(api))
    }

    #[rstest]
    #[case("image/jpeg", Ok(ImageContentType::Jpeg))]
    #[case("image/jpg", Ok(ImageContentType::Jpeg))]
    #[case("IMAGE/PNG", Ok(ImageContentType::Png))]
    #[case("image/webp", Ok(ImageContentType::Webp))]
    #[case("image/gif", Ok(ImageContentType::Gif))]
    #[case("image/heic", Ok(ImageContentType::Heic))]
    fn allow_listed_types_parse(
        #[case] raw: &str,
        #[case] expected: Result<ImageContentType, Error>,
    ) {
        assert_eq!(ImageContentType::parse(raw), expected);
    }

    #[rstest]
    #[case("image/bmp")]
    #[case("image/tiff")]
    #[case("application/pdf")]
    #[case("")]
    fn other_types_are_rejected_with_the_offending_name(#[case] raw: &str) {
        let error = ImageContentType::parse(raw).expect_err("type must be rejected");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(error.message(), format!("Unsupported image type: {raw}"));
    }

    #[tokio::test]
    async fn the_four_steps_run_in_sequence_on_success() {
        let mut api = MockCaptionPipelineApi::new();
        api.expect_create_upload_target()
            .withf(|content_type| *content_type == ImageContentType::Png)
            .times(1)
            .returning(|_| Ok(target()));
        api.expect_upload_bytes()
            .withf(|step_target, content_type, bytes| {
                step_target == &target()
                    && *content_type == ImageContentType::Png
                    && bytes.as_ref() == &b"\x89PNG fake"[..]
            })
            .times(1)
            .returning(|_, _, _| Ok(()));
        api.expect_register_image()
            .withf(|cdn_url| cdn_url == &target().cdn_url)
            .times(1)
            .returning(|_| Ok(ImageId::new("img-123")));
        api.expect_generate_captions()
            .withf(|image_id| image_id.as_str() == "img-123")
            .times(1)
            .returning(|_| {
                Ok(vec![GeneratedCaption {
                    id: Some("c1".to_owned()),
                    text: "A penguin files taxes".to_owned(),
                }])
            });

        let result = service(api).generate(upload()).await.expect("generated");
        assert_eq!(result.captions.len(), 1);
        assert_eq!(result.image_url, target().cdn_url);
    }

    #[tokio::test]
    async fn a_failed_byte_upload_short_circuits_the_chain() {
        let mut api = MockCaptionPipelineApi::new();
        api.expect_create_upload_target().returning(|_| Ok(target()));
        api.expect_upload_bytes()
            .returning(|_, _, _| Err(PipelineApiError::upstream(403_u16, "signature expired")));
        api.expect_register_image().never();
        api.expect_generate_captions().never();

        let error = service(api)
            .generate(upload())
            .await
            .expect_err("chain must stop at step 2");
        assert_eq!(error.code(), ErrorCode::Upstream);
        assert_eq!(error.upstream_status(), Some(403));
        assert_eq!(error.message(), "Failed to upload image: signature expired");
    }

    #[tokio::test]
    async fn a_failed_presign_never_touches_later_steps() {
        let mut api = MockCaptionPipelineApi::new();
        api.expect_create_upload_target()
            .returning(|_| Err(PipelineApiError::upstream(500_u16, "minting broke")));
        api.expect_upload_bytes().never();
        api.expect_register_image().never();
        api.expect_generate_captions().never();

        let error = service(api)
            .generate(upload())
            .await
            .expect_err("chain must stop at step 1");
        assert_eq!(
            error.message(),
            "Failed to get presigned URL: minting broke"
        );
        assert_eq!(error.upstream_status(), Some(500));
    }

    #[tokio::test]
    async fn registration_failures_carry_their_step_label() {
        let mut api = MockCaptionPipelineApi::new();
        api.expect_create_upload_target().returning(|_| Ok(target()));
        api.expect_upload_bytes().returning(|_, _, _| Ok(()));
        api.expect_register_image()
            .returning(|_| Err(PipelineApiError::upstream(422_u16, "url not reachable")));
        api.expect_generate_captions().never();

        let error = service(api)
            .generate(upload())
            .await
            .expect_err("chain must stop at step 3");
        assert_eq!(error.message(), "Failed to register image: url not reachable");
        assert_eq!(error.upstream_status(), Some(422));
    }

    #[tokio::test]
    async fn transport_failures_become_internal_errors() {
        let mut api = MockCaptionPipelineApi::new();
        api.expect_create_upload_target()
            .returning(|_| Err(PipelineApiError::transport("connection refused")));

        let error = service(api)
            .generate(upload())
            .await
            .expect_err("transport failure must surface as internal");
        assert_eq!(error.code(), ErrorCode::InternalError);
    }
}
