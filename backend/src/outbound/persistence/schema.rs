//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `backend/migrations`
//! exactly. `captions` and `humor_themes` are read-only to this service;
//! only `caption_votes` is written.

diesel::table! {
    /// Caption records, created out-of-band.
    captions (id) {
        /// Primary key: row id.
        id -> Int8,
        /// Caption text; rows without text render via a fallback label.
        caption_text -> Nullable<Text>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One vote per (caption, voter), enforced by a unique index.
    caption_votes (id) {
        /// Surrogate primary key.
        id -> Int8,
        /// Caption the vote applies to.
        caption_id -> Int8,
        /// Voter's identity-provider UUID.
        profile_id -> Uuid,
        /// +1 or −1.
        vote_value -> Int2,
        /// Insertion timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Humor themes listed on the public themes page.
    humor_themes (id) {
        /// Primary key: row id.
        id -> Int8,
        /// Theme name; listings order by this column.
        name -> Text,
        /// Optional blurb.
        description -> Nullable<Text>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(captions, caption_votes, humor_themes);
