//! Listing payload schema and normalization into [`Post`] records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{FeedError, PUBLIC_BASE};

/// Raw listing response as returned by `/r/<sub>/<sort>.json` and `/search.json`
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct ListingResponse {
    pub data: ListingData,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct ListingData {
    pub children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct ListingChild {
    pub data: RawPost,
}

/// A single submission as it appears in the listing
///
/// Every field is defaulted: the upstream API routinely returns `null` for
/// flair text and omits `crosspost_parent_list` on regular submissions.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct RawPost {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ups: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub num_comments: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub domain: String,
    #[serde(deserialize_with = "null_as_default")]
    pub permalink: String,
    #[serde(deserialize_with = "null_as_default")]
    pub stickied: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub pinned: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub is_self: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub thumbnail: String,
    #[serde(deserialize_with = "null_as_default")]
    pub link_flair_text: String,
    #[serde(deserialize_with = "null_as_default")]
    pub crosspost_parent_list: Vec<CrosspostParent>,
}

/// The original submission a crosspost points at
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct CrosspostParent {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub subreddit: String,
    #[serde(deserialize_with = "null_as_default")]
    pub permalink: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Uniform post record handed to the renderer
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Post {
    pub title: String,
    pub discussion_url: String,
    pub target_url: Option<String>,
    pub target_url_domain: String,
    pub thumbnail_url: Option<String>,
    pub tags: Vec<String>,
    pub comment_count: i64,
    pub score: i64,
    pub time_posted: DateTime<Utc>,
    pub is_crosspost: bool,
    /// Only meaningful after an engagement ranking pass
    #[serde(skip)]
    pub engagement: f64,
}

/// Upstream thumbnail values that mean "no image"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailSentinel {
    SelfPost,
    Default,
    Nsfw,
}

impl ThumbnailSentinel {
    pub const ALL: [ThumbnailSentinel; 3] = [Self::SelfPost, Self::Default, Self::Nsfw];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelfPost => "self",
            Self::Default => "default",
            Self::Nsfw => "nsfw",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

/// Returns the decoded thumbnail URL, or `None` for empty and sentinel values
pub fn thumbnail_url(raw: &str) -> Option<String> {
    if raw.is_empty() || ThumbnailSentinel::parse(raw).is_some() {
        return None;
    }

    Some(html_escape::decode_html_entities(raw).into_owned())
}

/// Substitutes `{SUBREDDIT}`, `{POST-ID}` and `{POST-PATH}` in a comments URL template
///
/// Substitution is literal. `{POST-PATH}` receives the permalink with every
/// leading slash removed. Unknown placeholders are left as they are.
pub fn template_comments_url(template: &str, subreddit: &str, post_id: &str, permalink: &str) -> String {
    template
        .replace("{SUBREDDIT}", subreddit)
        .replace("{POST-ID}", post_id)
        .replace("{POST-PATH}", permalink.trim_start_matches('/'))
}

/// Parameters of the normalization pass that come from the widget configuration
#[derive(Debug, Clone, Default)]
pub struct NormalizeOptions<'a> {
    pub subreddit: &'a str,
    pub comments_url_template: &'a str,
    pub show_flairs: bool,
}

impl NormalizeOptions<'_> {
    fn comments_url(&self, subreddit: &str, post_id: &str, permalink: &str) -> String {
        if self.comments_url_template.is_empty() {
            format!("{PUBLIC_BASE}{permalink}")
        } else {
            template_comments_url(self.comments_url_template, subreddit, post_id, permalink)
        }
    }
}

/// Convert epoch seconds, as sent by the API, to a UTC timestamp
pub fn timestamp_from_epoch(seconds: f64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(seconds as i64, 0).unwrap_or_default()
}

/// Map a single listing entry to a post; `None` for pinned and sticky entries
pub fn normalize_post(raw: &RawPost, options: &NormalizeOptions<'_>) -> Option<Post> {
    if raw.stickied || raw.pinned {
        return None;
    }

    let mut post = Post {
        title: html_escape::decode_html_entities(&raw.title).into_owned(),
        discussion_url: options.comments_url(options.subreddit, &raw.id, &raw.permalink),
        target_url: None,
        target_url_domain: raw.domain.clone(),
        thumbnail_url: thumbnail_url(&raw.thumbnail),
        tags: Vec::new(),
        comment_count: raw.num_comments,
        score: raw.ups,
        time_posted: timestamp_from_epoch(raw.created),
        is_crosspost: false,
        engagement: 0.0,
    };

    if !raw.is_self {
        post.target_url = Some(raw.url.clone());
    }

    if options.show_flairs && !raw.link_flair_text.is_empty() {
        post.tags.push(raw.link_flair_text.clone());
    }

    if let Some(parent) = raw.crosspost_parent_list.first() {
        post.is_crosspost = true;
        post.target_url_domain = format!("r/{}", parent.subreddit);
        post.target_url = Some(options.comments_url(
            &parent.subreddit,
            &parent.id,
            &parent.permalink,
        ));
    }

    Some(post)
}

/// Normalize a full listing, preserving upstream order
///
/// Fails with [`FeedError::NoPosts`] when nothing survives filtering.
pub fn normalize_listing(
    listing: &ListingResponse,
    options: &NormalizeOptions<'_>,
) -> Result<Vec<Post>, FeedError> {
    let posts: Vec<Post> = listing
        .data
        .children
        .iter()
        .filter_map(|child| normalize_post(&child.data, options))
        .collect();

    if posts.is_empty() {
        return Err(FeedError::NoPosts);
    }

    Ok(posts)
}

/// Decode a listing body and normalize it in one step
pub fn parse_listing(body: &str, options: &NormalizeOptions<'_>) -> Result<Vec<Post>, FeedError> {
    let listing: ListingResponse =
        serde_json::from_str(body).map_err(|e| FeedError::Decode(e.to_string()))?;

    normalize_listing(&listing, options)
}
