//! Humor theme read model, carried over from the hello-world sample.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// One row from the read-only `humor_themes` collection.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HumorTheme {
    /// Row identifier.
    pub id: i64,
    /// Theme name; the listing is ordered by this field.
    pub name: String,
    /// Optional blurb describing the theme.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
}
