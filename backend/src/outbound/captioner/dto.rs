//! Wire DTOs for the captioning API.
//!
//! Caption objects returned by the generation endpoint have no fixed shape;
//! decoding funnels through the domain's text-probing shim and falls back to
//! the raw JSON serialisation, matching the historical client behaviour.

use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::domain::ports::{GeneratedCaption, ImageId, UploadTarget};
use crate::domain::probe_caption_text;

/// Response of `POST /pipeline/generate-presigned-url`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PresignedUrlDto {
    presigned_url: String,
    cdn_url: String,
}

impl PresignedUrlDto {
    /// Validate the URLs and convert into the domain upload target.
    pub(crate) fn into_upload_target(self) -> Result<UploadTarget, String> {
        let presigned_url = Url::parse(&self.presigned_url)
            .map_err(|error| format!("invalid presigned URL: {error}"))?;
        let cdn_url =
            Url::parse(&self.cdn_url).map_err(|error| format!("invalid CDN URL: {error}"))?;
        Ok(UploadTarget {
            presigned_url,
            cdn_url,
        })
    }
}

/// Response of `POST /pipeline/upload-image-from-url`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisteredImageDto {
    image_id: Value,
}

impl RegisteredImageDto {
    /// Convert into the opaque image id, tolerating string or numeric ids.
    pub(crate) fn into_image_id(self) -> Result<ImageId, String> {
        match self.image_id {
            Value::String(id) if !id.is_empty() => Ok(ImageId::new(id)),
            Value::Number(id) => Ok(ImageId::new(id.to_string())),
            other => Err(format!("unusable image id: {other}")),
        }
    }
}

/// Decode the generation endpoint's caption payload.
///
/// The endpoint has returned both a bare array and a `{captions: [...]}`
/// wrapper; anything else decodes as no captions.
pub(crate) fn decode_captions(value: &Value) -> Vec<GeneratedCaption> {
    let items = match value {
        Value::Array(items) => items.as_slice(),
        Value::Object(object) => match object.get("captions").and_then(Value::as_array) {
            Some(items) => items.as_slice(),
            None => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    items
        .iter()
        .map(|item| GeneratedCaption {
            id: caption_id_of(item),
            text: probe_caption_text(item).unwrap_or_else(|| item.to_string()),
        })
        .collect()
}

fn caption_id_of(item: &Value) -> Option<String> {
    match item.get("id") {
        Some(Value::String(id)) => Some(id.clone()),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn presigned_dto_parses_both_urls() {
        let dto: PresignedUrlDto = serde_json::from_value(json!({
            "presignedUrl": "https://uploads.example/put/abc",
            "cdnUrl": "https://cdn.example/abc.png"
        }))
        .expect("decode dto");
        let target = dto.into_upload_target().expect("valid URLs");
        assert_eq!(target.cdn_url.as_str(), "https://cdn.example/abc.png");
    }

    #[test]
    fn presigned_dto_rejects_garbage_urls() {
        let dto: PresignedUrlDto = serde_json::from_value(json!({
            "presignedUrl": "not a url",
            "cdnUrl": "https://cdn.example/abc.png"
        }))
        .expect("decode dto");
        assert!(dto.into_upload_target().is_err());
    }

    #[test]
    fn image_ids_decode_from_strings_and_numbers() {
        let from_string: RegisteredImageDto =
            serde_json::from_value(json!({ "imageId": "img-9" })).expect("decode");
        assert_eq!(from_string.into_image_id().expect("id").as_str(), "img-9");

        let from_number: RegisteredImageDto =
            serde_json::from_value(json!({ "imageId": 42 })).expect("decode");
        assert_eq!(from_number.into_image_id().expect("id").as_str(), "42");

        let from_null: RegisteredImageDto =
            serde_json::from_value(json!({ "imageId": null })).expect("decode");
        assert!(from_null.into_image_id().is_err());
    }

    #[test]
    fn captions_decode_from_a_bare_array() {
        let captions = decode_captions(&json!([
            { "id": "c1", "caption_text": "first" },
            { "id": 2, "text": "second" }
        ]));
        assert_eq!(captions.len(), 2);
        assert_eq!(captions[0].text, "first");
        assert_eq!(captions[0].id.as_deref(), Some("c1"));
        assert_eq!(captions[1].text, "second");
        assert_eq!(captions[1].id.as_deref(), Some("2"));
    }

    #[test]
    fn captions_decode_from_the_wrapped_shape() {
        let captions = decode_captions(&json!({
            "captions": [{ "caption": "wrapped" }]
        }));
        assert_eq!(captions.len(), 1);
        assert_eq!(captions[0].text, "wrapped");
        assert_eq!(captions[0].id, None);
    }

    #[test]
    fn unrecognised_caption_objects_fall_back_to_raw_json() {
        let captions = decode_captions(&json!([{ "headline": "no text key" }]));
        assert_eq!(captions[0].text, r#"{"headline":"no text key"}"#);
    }

    #[test]
    fn non_caption_payloads_decode_as_empty() {
        assert!(decode_captions(&json!("surprise string")).is_empty());
        assert!(decode_captions(&json!({ "message": "ok" })).is_empty());
    }
}
