//! Widget configuration: defaults, enumerated modes and validation.
//!
//! Raw values come from the command line or environment; [`WidgetConfig::from_raw`]
//! turns them into a validated configuration before anything touches the network.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::request::REQUEST_URL_PLACEHOLDER;
use super::PUBLIC_BASE;

pub const DEFAULT_LIMIT: usize = 15;
pub const DEFAULT_COLLAPSE_AFTER: i64 = 5;
pub const CACHE_DURATION: Duration = Duration::from_secs(30 * 60);

/// Error type for configuration validation
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("subreddit is required")]
    MissingSubreddit,

    #[error("no `{{REQUEST-URL}}` placeholder specified in request URL template")]
    MissingRequestUrlPlaceholder,
}

/// Listing sort order; also the listing path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Hot,
    New,
    Top,
    Rising,
}

impl SortMode {
    pub const ALL: [SortMode; 4] = [Self::Hot, Self::New, Self::Top, Self::Rising];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::New => "new",
            Self::Top => "top",
            Self::Rising => "rising",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }

    /// Invalid or empty values fall back to [`SortMode::Hot`]
    pub fn parse_or_default(value: &str) -> Self {
        Self::parse(value).unwrap_or_default()
    }
}

/// Time window for the `top` sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopPeriod {
    Hour,
    #[default]
    Day,
    Week,
    Month,
    Year,
    All,
}

impl TopPeriod {
    pub const ALL: [TopPeriod; 6] = [
        Self::Hour,
        Self::Day,
        Self::Week,
        Self::Month,
        Self::Year,
        Self::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::All => "all",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == value)
    }

    pub fn parse_or_default(value: &str) -> Self {
        Self::parse(value).unwrap_or_default()
    }
}

/// Secondary ordering applied after truncation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtraSort {
    #[default]
    None,
    Engagement,
}

impl ExtraSort {
    pub fn parse(value: &str) -> Self {
        match value {
            "engagement" => Self::Engagement,
            _ => Self::None,
        }
    }
}

/// Rendering layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Style {
    #[default]
    ForumPosts,
    HorizontalCards,
    VerticalCards,
}

impl Style {
    pub fn parse(value: &str) -> Self {
        match value {
            "horizontal-cards" => Self::HorizontalCards,
            "vertical-cards" => Self::VerticalCards,
            _ => Self::ForumPosts,
        }
    }
}

/// Application identity used for the client-credentials exchange
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub app_name: String,
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    /// All three values are required for an authenticated session
    pub fn is_complete(&self) -> bool {
        !self.app_name.is_empty() && !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("app_name", &self.app_name)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Configuration as supplied by the user, before defaults are applied
#[derive(Debug, Clone, Default)]
pub struct RawWidgetConfig {
    pub subreddit: String,
    pub sort_by: String,
    pub top_period: String,
    pub search: String,
    pub extra_sort_by: String,
    pub style: String,
    pub show_thumbnails: bool,
    pub show_flairs: bool,
    pub comments_url_template: String,
    pub request_url_template: String,
    pub limit: i64,
    pub collapse_after: i64,
    pub credentials: Credentials,
}

/// Validated widget configuration
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetConfig {
    pub subreddit: String,
    pub sort: SortMode,
    pub top_period: TopPeriod,
    pub search: String,
    pub extra_sort: ExtraSort,
    pub style: Style,
    pub show_thumbnails: bool,
    pub show_flairs: bool,
    pub comments_url_template: String,
    pub request_url_template: String,
    pub limit: usize,
    /// `-1` disables collapsing
    pub collapse_after: i64,
    pub credentials: Credentials,
}

impl WidgetConfig {
    /// Apply defaults and validate
    ///
    /// Fails when the subreddit is empty or the request URL template lacks the
    /// `{REQUEST-URL}` placeholder.
    pub fn from_raw(raw: RawWidgetConfig) -> Result<Self, ConfigError> {
        if raw.subreddit.is_empty() {
            return Err(ConfigError::MissingSubreddit);
        }

        if !raw.request_url_template.is_empty()
            && !raw.request_url_template.contains(REQUEST_URL_PLACEHOLDER)
        {
            return Err(ConfigError::MissingRequestUrlPlaceholder);
        }

        let limit = if raw.limit <= 0 {
            DEFAULT_LIMIT
        } else {
            raw.limit as usize
        };

        let collapse_after = if raw.collapse_after == 0 || raw.collapse_after < -1 {
            DEFAULT_COLLAPSE_AFTER
        } else {
            raw.collapse_after
        };

        Ok(Self {
            sort: SortMode::parse_or_default(&raw.sort_by),
            top_period: TopPeriod::parse_or_default(&raw.top_period),
            extra_sort: ExtraSort::parse(&raw.extra_sort_by),
            style: Style::parse(&raw.style),
            subreddit: raw.subreddit,
            search: raw.search,
            show_thumbnails: raw.show_thumbnails,
            show_flairs: raw.show_flairs,
            comments_url_template: raw.comments_url_template,
            request_url_template: raw.request_url_template,
            limit,
            collapse_after,
            credentials: raw.credentials,
        })
    }

    /// Widget title, e.g. `r/rust`
    pub fn title(&self) -> String {
        format!("r/{}", self.subreddit)
    }

    pub fn title_url(&self) -> String {
        format!("{PUBLIC_BASE}/r/{}/", self.subreddit)
    }

    /// Number of posts shown before the rest are collapsed, if any
    pub fn visible_before_collapse(&self, total: usize) -> usize {
        if self.collapse_after < 0 {
            total
        } else {
            total.min(self.collapse_after as usize)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawWidgetConfig {
        RawWidgetConfig {
            subreddit: "rust".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_raw_applies_defaults() {
        let config = WidgetConfig::from_raw(raw()).unwrap();

        assert_eq!(config.sort, SortMode::Hot);
        assert_eq!(config.top_period, TopPeriod::Day);
        assert_eq!(config.extra_sort, ExtraSort::None);
        assert_eq!(config.style, Style::ForumPosts);
        assert_eq!(config.limit, DEFAULT_LIMIT);
        assert_eq!(config.collapse_after, DEFAULT_COLLAPSE_AFTER);
    }

    #[test]
    fn test_from_raw_missing_subreddit() {
        let result = WidgetConfig::from_raw(RawWidgetConfig::default());
        assert_eq!(result, Err(ConfigError::MissingSubreddit));
    }

    #[test]
    fn test_from_raw_request_template_without_placeholder() {
        let mut r = raw();
        r.request_url_template = "https://proxy.example/?u=".to_string();

        assert_eq!(
            WidgetConfig::from_raw(r),
            Err(ConfigError::MissingRequestUrlPlaceholder)
        );
    }

    #[test]
    fn test_from_raw_request_template_with_placeholder() {
        let mut r = raw();
        r.request_url_template = "https://proxy.example/?u={REQUEST-URL}".to_string();

        assert!(WidgetConfig::from_raw(r).is_ok());
    }

    #[test]
    fn test_from_raw_invalid_modes_fall_back() {
        let mut r = raw();
        r.sort_by = "controversial".to_string();
        r.top_period = "decade".to_string();
        r.extra_sort_by = "random".to_string();

        let config = WidgetConfig::from_raw(r).unwrap();

        assert_eq!(config.sort, SortMode::Hot);
        assert_eq!(config.top_period, TopPeriod::Day);
        assert_eq!(config.extra_sort, ExtraSort::None);
    }

    #[test]
    fn test_from_raw_valid_modes_kept() {
        let mut r = raw();
        r.sort_by = "top".to_string();
        r.top_period = "year".to_string();
        r.extra_sort_by = "engagement".to_string();
        r.style = "vertical-cards".to_string();
        r.limit = 3;

        let config = WidgetConfig::from_raw(r).unwrap();

        assert_eq!(config.sort, SortMode::Top);
        assert_eq!(config.top_period, TopPeriod::Year);
        assert_eq!(config.extra_sort, ExtraSort::Engagement);
        assert_eq!(config.style, Style::VerticalCards);
        assert_eq!(config.limit, 3);
    }

    #[test]
    fn test_from_raw_non_positive_limit() {
        for limit in [0, -4] {
            let mut r = raw();
            r.limit = limit;
            assert_eq!(WidgetConfig::from_raw(r).unwrap().limit, DEFAULT_LIMIT);
        }
    }

    #[test]
    fn test_from_raw_collapse_after() {
        let cases = [(0, 5), (-2, 5), (-1, -1), (8, 8)];

        for (input, expected) in cases {
            let mut r = raw();
            r.collapse_after = input;
            assert_eq!(WidgetConfig::from_raw(r).unwrap().collapse_after, expected);
        }
    }

    #[test]
    fn test_visible_before_collapse() {
        let mut config = WidgetConfig::from_raw(raw()).unwrap();
        assert_eq!(config.visible_before_collapse(12), 5);
        assert_eq!(config.visible_before_collapse(3), 3);

        config.collapse_after = -1;
        assert_eq!(config.visible_before_collapse(12), 12);
    }

    #[test]
    fn test_title_and_url() {
        let config = WidgetConfig::from_raw(raw()).unwrap();
        assert_eq!(config.title(), "r/rust");
        assert_eq!(config.title_url(), "https://www.reddit.com/r/rust/");
    }

    #[test]
    fn test_credentials_complete_and_redacted() {
        let mut creds = Credentials {
            app_name: "app".to_string(),
            client_id: "id".to_string(),
            client_secret: "hunter2".to_string(),
        };
        assert!(creds.is_complete());
        assert!(!format!("{creds:?}").contains("hunter2"));

        creds.client_id.clear();
        assert!(!creds.is_complete());
    }
}
