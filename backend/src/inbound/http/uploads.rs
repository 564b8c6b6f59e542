//! Image upload page and the caption-generation proxy endpoint.
//!
//! ```text
//! GET  /upload                 session-gated page model
//! POST /api/generate-captions  multipart {file}; JSON {captions, imageUrl}
//! ```
//!
//! The content type is validated against the allow-list before any outbound
//! call; an unsupported upload never produces network traffic.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, get, post, web};
use bytes::{Bytes, BytesMut};
use futures_util::TryStreamExt;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ports::{GenerateCaptions as _, GeneratedCaption};
use crate::domain::{Error, ImageContentType, ImageUpload};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::pages::redirect_to_home;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Upper bound on accepted image payloads.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Upload page model.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadPage {
    /// Email of the signed-in viewer.
    viewer_email: String,
    /// Media types the proxy accepts.
    allowed_types: Vec<&'static str>,
    /// Maximum accepted payload size in bytes.
    max_bytes: usize,
}

/// Upload page: session-gated.
#[utoipa::path(
    get,
    path = "/upload",
    responses(
        (status = 200, description = "Upload page model", body = UploadPage),
        (status = 303, description = "Signed out; redirected to the landing page")
    ),
    tags = ["uploads"],
    operation_id = "uploadPage"
)]
#[get("/upload")]
pub async fn upload_page(session: SessionContext) -> ApiResult<HttpResponse> {
    let Some(user) = session.current_user() else {
        return Ok(redirect_to_home());
    };
    let page = UploadPage {
        viewer_email: user.email().to_string(),
        allowed_types: ImageContentType::ALLOWED
            .iter()
            .map(|content_type| content_type.as_str())
            .collect(),
        max_bytes: MAX_IMAGE_BYTES,
    };
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(page))
}

/// Successful generation response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCaptionsResponse {
    captions: Vec<GeneratedCaption>,
    image_url: String,
}

/// The `file` part of a multipart upload: raw media type plus bytes.
struct FilePart {
    content_type: String,
    bytes: Bytes,
}

fn multipart_error(error: &actix_multipart::MultipartError) -> Error {
    Error::invalid_request(format!("malformed multipart payload: {error}"))
}

async fn read_file_part(payload: &mut Multipart) -> Result<FilePart, Error> {
    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|error| multipart_error(&error))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field
            .content_type()
            .map_or_else(|| "application/octet-stream".to_owned(), ToString::to_string);

        let mut buffer = BytesMut::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|error| multipart_error(&error))?
        {
            if buffer.len() + chunk.len() > MAX_IMAGE_BYTES {
                return Err(Error::invalid_request(
                    "image exceeds the 10 MiB upload limit",
                ));
            }
            buffer.extend_from_slice(&chunk);
        }
        return Ok(FilePart {
            content_type,
            bytes: buffer.freeze(),
        });
    }
    Err(Error::invalid_request("No file provided"))
}

/// Proxy an uploaded image through the captioning pipeline.
#[utoipa::path(
    post,
    path = "/api/generate-captions",
    responses(
        (status = 200, description = "Generated captions", body = GenerateCaptionsResponse),
        (status = 400, description = "Missing file or unsupported image type", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 500, description = "Unexpected pipeline failure", body = Error),
        (status = 502, description = "Upstream pipeline failure", body = Error)
    ),
    tags = ["uploads"],
    operation_id = "generateCaptions"
)]
#[post("/api/generate-captions")]
pub async fn generate_captions(
    state: web::Data<HttpState>,
    session: SessionContext,
    mut payload: Multipart,
) -> ApiResult<HttpResponse> {
    session.require_user()?;

    let file = read_file_part(&mut payload).await?;
    let content_type = ImageContentType::parse(&file.content_type)?;

    let generated = state
        .generator
        .generate(ImageUpload {
            content_type,
            bytes: file.bytes,
        })
        .await?;

    Ok(HttpResponse::Ok().json(GenerateCaptionsResponse {
        captions: generated.captions,
        image_url: generated.image_url.to_string(),
    }))
}
