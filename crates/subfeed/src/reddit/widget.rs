use chrono::{DateTime, Utc};

use crate::prelude::*;
use subfeed_core::engagement::{EngagementScorer, RelativeEngagement};
use subfeed_core::reddit::config::WidgetConfig;
use subfeed_core::reddit::listing::{parse_listing, NormalizeOptions};
use subfeed_core::reddit::request::{build_listing_request, ListingRequest, RequestParams};
use subfeed_core::reddit::{finalize_batch, AccessToken, Post};

use super::auth::fetch_access_token;
use super::transport::Transport;

/// A subreddit feed and the batch of posts currently on display
#[derive(Debug)]
pub struct RedditWidget {
    pub config: WidgetConfig,
    token: Option<AccessToken>,
    pub posts: Vec<Post>,
    pub last_error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl RedditWidget {
    pub fn new(config: WidgetConfig, token: Option<AccessToken>) -> Self {
        Self {
            config,
            token,
            posts: Vec::new(),
            last_error: None,
            last_updated: None,
        }
    }

    /// Exchange credentials once; the token is fixed for the widget's lifetime
    pub async fn initialize(
        config: WidgetConfig,
        client: &reqwest::Client,
        auth_base: &str,
    ) -> Result<Self, Error> {
        let token = fetch_access_token(client, auth_base, &config.credentials).await?;

        if token.is_none() {
            log::debug!("no complete Reddit credentials, using the public API");
        }

        Ok(Self::new(config, token))
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn request(&self) -> ListingRequest {
        let params = RequestParams {
            subreddit: &self.config.subreddit,
            sort: self.config.sort,
            top_period: self.config.top_period,
            search: &self.config.search,
            request_url_template: &self.config.request_url_template,
            app_name: &self.config.credentials.app_name,
        };

        build_listing_request(&params, self.token.as_ref())
    }

    /// One request and normalization, without truncation or ranking
    pub async fn fetch_posts<T: Transport>(&self, transport: &T) -> Result<Vec<Post>, Error> {
        let request = self.request();
        log::debug!("fetching {}", request.url);

        let body = transport.get(&request).await?;

        let options = NormalizeOptions {
            subreddit: &self.config.subreddit,
            comments_url_template: &self.config.comments_url_template,
            show_flairs: self.config.show_flairs,
        };

        let posts = parse_listing(&body, &options)?;
        log::info!("normalized {} posts from r/{}", posts.len(), self.config.subreddit);

        Ok(posts)
    }

    /// Run one refresh cycle with the default engagement scorer
    pub async fn update<T: Transport>(&mut self, transport: &T) -> Result<usize, Error> {
        self.update_with(transport, &RelativeEngagement, Utc::now())
            .await
    }

    /// Run one refresh cycle
    ///
    /// On success the new batch replaces the old one entirely. On failure the
    /// previous batch stays in place and the error is kept in `last_error`.
    pub async fn update_with<T: Transport>(
        &mut self,
        transport: &T,
        scorer: &dyn EngagementScorer,
        now: DateTime<Utc>,
    ) -> Result<usize, Error> {
        match self.fetch_posts(transport).await {
            Ok(posts) => {
                self.posts = finalize_batch(
                    posts,
                    self.config.limit,
                    self.config.extra_sort,
                    scorer,
                    now,
                );
                self.last_error = None;
                self.last_updated = Some(now);
                Ok(self.posts.len())
            }
            Err(err) => {
                log::warn!("refresh of r/{} failed: {err}", self.config.subreddit);
                self.record_failure(&err);
                Err(err)
            }
        }
    }

    /// Keep the current batch and remember why this cycle produced nothing
    pub fn record_failure(&mut self, err: &Error) {
        self.last_error = Some(err.to_string());
    }
}
