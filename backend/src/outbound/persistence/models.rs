//! Internal Diesel row structs.
//!
//! Implementation details of the persistence layer; never exposed to the
//! domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{Caption, CaptionId, Error, HumorTheme, UserId, Vote, VoteValue};

use super::schema::{caption_votes, captions, humor_themes};

/// Row struct for reading from the captions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = captions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CaptionRow {
    pub id: i64,
    pub caption_text: Option<String>,
}

impl From<CaptionRow> for Caption {
    fn from(row: CaptionRow) -> Self {
        Self::new(CaptionId::new(row.id), row.caption_text)
    }
}

/// Row struct for reading from the caption_votes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = caption_votes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VoteRow {
    pub caption_id: i64,
    pub profile_id: Uuid,
    pub vote_value: i16,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<VoteRow> for Vote {
    type Error = Error;

    fn try_from(row: VoteRow) -> Result<Self, Self::Error> {
        let value = VoteValue::try_from(row.vote_value)
            .map_err(|err| Error::internal(format!("stored vote row is invalid: {err}")))?;
        Ok(Self {
            caption_id: CaptionId::new(row.caption_id),
            voter: UserId::from_uuid(row.profile_id),
            value,
            created_at: row.created_at,
        })
    }
}

/// Insertable struct for creating new vote records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = caption_votes)]
pub(crate) struct NewVoteRow {
    pub caption_id: i64,
    pub profile_id: Uuid,
    pub vote_value: i16,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the humor_themes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = humor_themes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct HumorThemeRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<HumorThemeRow> for HumorTheme {
    fn from(row: HumorThemeRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caption_rows_map_into_domain_captions() {
        let caption: Caption = CaptionRow {
            id: 7,
            caption_text: None,
        }
        .into();
        assert_eq!(caption.display_text(), "Caption #7");
    }

    #[test]
    fn corrupt_vote_rows_are_rejected() {
        let row = VoteRow {
            caption_id: 1,
            profile_id: Uuid::nil(),
            vote_value: 3,
            created_at: Utc::now(),
        };
        assert!(Vote::try_from(row).is_err());
    }
}
