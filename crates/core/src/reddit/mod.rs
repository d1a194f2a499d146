/// Reddit listing transformations
///
/// Request construction, listing normalization and the post-fetch pipeline.
/// Everything here is pure; the shell crate performs the HTTP calls.
pub mod auth;
pub mod config;
pub mod listing;
pub mod request;

use chrono::{DateTime, Utc};

use crate::engagement::{rank_by_engagement, EngagementScorer};
use config::ExtraSort;
pub use listing::Post;

/// Public web and API base, also used for comment links
pub const PUBLIC_BASE: &str = "https://www.reddit.com";
/// API base for requests carrying a bearer token
pub const OAUTH_BASE: &str = "https://oauth.reddit.com";

/// Error type for a refresh cycle's transformation steps
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FeedError {
    #[error("no posts found")]
    NoPosts,

    #[error("failed to decode listing: {0}")]
    Decode(String),
}

/// Bearer token obtained once at startup
///
/// Immutable once created; refresh cycles borrow it.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccessToken(<{} chars>)", self.0.len())
    }
}

/// Truncate to the display limit, then optionally rank by engagement
///
/// Ranking sees only the truncated subset: a post beyond `limit` is never
/// surfaced, however engaging.
pub fn finalize_batch(
    mut posts: Vec<Post>,
    limit: usize,
    extra_sort: ExtraSort,
    scorer: &dyn EngagementScorer,
    now: DateTime<Utc>,
) -> Vec<Post> {
    posts.truncate(limit);

    match extra_sort {
        ExtraSort::Engagement => rank_by_engagement(posts, scorer, now),
        ExtraSort::None => posts,
    }
}
