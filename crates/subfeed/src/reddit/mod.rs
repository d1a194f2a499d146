use std::time::Duration;

use crate::prelude::{println, *};
use subfeed_core::reddit::config::{Credentials, RawWidgetConfig, WidgetConfig};

pub mod auth;
pub mod list_posts;
pub mod render;
pub mod transport;
pub mod watch;
pub mod widget;

pub use transport::{HttpTransport, ProxyOptions, Transport};
pub use widget::RedditWidget;

/// Base URL of the token endpoint
pub const AUTH_BASE: &str = subfeed_core::reddit::PUBLIC_BASE;

#[derive(Debug, clap::Parser)]
#[command(name = "reddit")]
#[command(about = "Reddit (www.reddit.com) listings")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Fetch a subreddit listing once and print it
    #[clap(name = "list")]
    List(list_posts::ListOptions),

    /// Keep a subreddit listing up to date, refreshing on an interval
    #[clap(name = "watch")]
    Watch(watch::WatchOptions),
}

/// Options shared by every command that displays a subreddit
#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone, Default)]
pub struct FeedOptions {
    /// Subreddit name, without the `r/` prefix
    #[arg(value_name = "SUBREDDIT", env = "SUBFEED_SUBREDDIT")]
    pub subreddit: String,

    /// Sort order: hot, new, top, rising
    #[arg(long, env = "SUBFEED_SORT_BY", default_value = "hot")]
    pub sort_by: String,

    /// Time window for the top sort: hour, day, week, month, year, all
    #[arg(long, env = "SUBFEED_TOP_PERIOD", default_value = "day")]
    pub top_period: String,

    /// Search the subreddit instead of listing it
    #[arg(long, default_value = "")]
    pub search: String,

    /// Secondary ordering applied after the limit: engagement
    #[arg(long, default_value = "")]
    pub extra_sort_by: String,

    /// Layout: forum-posts, horizontal-cards, vertical-cards
    #[arg(long, default_value = "forum-posts")]
    pub style: String,

    /// Show post thumbnails
    #[arg(long)]
    pub show_thumbnails: bool,

    /// Show link flairs as tags
    #[arg(long)]
    pub show_flairs: bool,

    /// Comment link template with {SUBREDDIT}, {POST-ID} and {POST-PATH} placeholders
    #[arg(long, default_value = "")]
    pub comments_url_template: String,

    /// Request URL template; must contain {REQUEST-URL}
    #[arg(long, default_value = "")]
    pub request_url_template: String,

    /// Maximum number of posts to display
    #[arg(short, long, env = "SUBFEED_LIMIT", default_value = "15", allow_hyphen_values = true)]
    pub limit: i64,

    /// Number of posts shown before collapsing the rest (-1 never collapses)
    #[arg(long, default_value = "5", allow_hyphen_values = true)]
    pub collapse_after: i64,

    /// Proxy URL for listing requests
    #[arg(long, env = "SUBFEED_PROXY")]
    pub proxy: Option<String>,

    /// Accept invalid TLS certificates from the proxy
    #[arg(long)]
    pub proxy_allow_insecure: bool,

    /// Request timeout in seconds
    #[arg(long, default_value = "5")]
    pub timeout: u64,

    /// Reddit application name, used for the User-Agent
    #[arg(long, env = "REDDIT_APP_NAME", default_value = "")]
    pub app_name: String,

    /// Reddit application client id
    #[arg(long, env = "REDDIT_CLIENT_ID", default_value = "")]
    pub client_id: String,

    /// Reddit application client secret
    #[arg(long, env = "REDDIT_CLIENT_SECRET", default_value = "", hide_env_values = true)]
    pub client_secret: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl FeedOptions {
    pub fn raw_config(&self) -> RawWidgetConfig {
        RawWidgetConfig {
            subreddit: self.subreddit.clone(),
            sort_by: self.sort_by.clone(),
            top_period: self.top_period.clone(),
            search: self.search.clone(),
            extra_sort_by: self.extra_sort_by.clone(),
            style: self.style.clone(),
            show_thumbnails: self.show_thumbnails,
            show_flairs: self.show_flairs,
            comments_url_template: self.comments_url_template.clone(),
            request_url_template: self.request_url_template.clone(),
            limit: self.limit,
            collapse_after: self.collapse_after,
            credentials: Credentials {
                app_name: self.app_name.clone(),
                client_id: self.client_id.clone(),
                client_secret: self.client_secret.clone(),
            },
        }
    }

    /// Validate into a widget configuration; no network call happens before this succeeds
    pub fn widget_config(&self) -> Result<WidgetConfig, Error> {
        Ok(WidgetConfig::from_raw(self.raw_config())?)
    }

    pub fn proxy_options(&self) -> Option<ProxyOptions> {
        self.proxy.as_ref().map(|url| ProxyOptions {
            url: url.clone(),
            allow_insecure: self.proxy_allow_insecure,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Validate the configuration, exchange credentials and pick the transport
pub async fn initialize(options: &FeedOptions) -> Result<(RedditWidget, HttpTransport), Error> {
    initialize_with(options, AUTH_BASE).await
}

/// Same as [`initialize`], against a given token endpoint base
pub async fn initialize_with(
    options: &FeedOptions,
    auth_base: &str,
) -> Result<(RedditWidget, HttpTransport), Error> {
    let config = options.widget_config()?;

    let auth_client = reqwest::Client::builder()
        .timeout(options.timeout())
        .build()
        .map_err(|e| Error::CredentialExchange(f!("building HTTP client: {e}")))?;

    let widget = RedditWidget::initialize(config, &auth_client, auth_base).await?;
    let transport = HttpTransport::for_config(
        &widget.config,
        options.proxy_options().as_ref(),
        options.timeout(),
    )?;

    log::debug!(
        "r/{}: authenticated={} proxied={}",
        widget.config.subreddit,
        widget.is_authenticated(),
        transport.is_proxied()
    );

    Ok((widget, transport))
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    if global.verbose {
        println!("Reddit API Base: {}", subfeed_core::reddit::PUBLIC_BASE);
        println!();
    }

    match app.command {
        Commands::List(options) => list_posts::run(options, global).await,
        Commands::Watch(options) => watch::run(options, global).await,
    }
}
