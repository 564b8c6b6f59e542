//! Caption records and the caption-text compatibility shim.
//!
//! Captions are created out-of-band and read-only here. The persistence
//! schema pins one nullable text column, but caption objects returned by the
//! external captioning API have no fixed shape; [`probe_caption_text`] keeps
//! the historical multi-key probing alive on that read boundary only.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Keys probed, in order, when recovering caption text from a loosely
/// shaped caption object.
const CAPTION_TEXT_KEYS: [&str; 5] = ["caption_text", "caption", "text", "content", "body"];

/// Caption identifier: a 64-bit row id, ordered ascending in the feed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct CaptionId(i64);

impl CaptionId {
    /// Wrap a raw row id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// The underlying row id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for CaptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One caption record from the `captions` collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    id: CaptionId,
    text: Option<String>,
}

impl Caption {
    /// Build a caption from its row components.
    #[must_use]
    pub fn new(id: CaptionId, text: Option<String>) -> Self {
        let text = text.filter(|t| !t.trim().is_empty());
        Self { id, text }
    }

    /// Row identifier.
    #[must_use]
    pub const fn id(&self) -> CaptionId {
        self.id
    }

    /// Raw text, when the row carries any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Text shown to users: the row's text, or `Caption #<id>` when the row
    /// carries none.
    #[must_use]
    pub fn display_text(&self) -> String {
        self.text
            .clone()
            .unwrap_or_else(|| format!("Caption #{}", self.id))
    }
}

/// Recover caption text from a loosely shaped JSON caption object.
///
/// Probes the historical column aliases in order and returns the first
/// string value. Returns `None` when no recognised key holds a string; the
/// caller decides the fallback (the upload page historically rendered the
/// raw JSON).
#[must_use]
pub fn probe_caption_text(value: &Value) -> Option<String> {
    let object = value.as_object()?;
    CAPTION_TEXT_KEYS
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_str))
        .map(ToOwned::to_owned)
}
