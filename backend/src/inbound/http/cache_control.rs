//! Shared cache-control policy for session-scoped responses.
//!
//! Feed and vote responses must always be revalidated: optimistic client
//! counters are a UI affordance and the authoritative tally only exists on a
//! fresh read.

/// Private responses must always be revalidated before reuse.
pub const PRIVATE_NO_CACHE_MUST_REVALIDATE: &str = "private, no-cache, must-revalidate";

/// Standard cache-control header tuple for private responses.
pub const fn private_no_cache_header() -> (&'static str, &'static str) {
    ("Cache-Control", PRIVATE_NO_CACHE_MUST_REVALIDATE)
}
