use chrono::Utc;

use crate::prelude::{println, *};

use super::render::{format_posts_json, format_posts_text};
use super::{initialize, FeedOptions, RedditWidget};

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct ListOptions {
    #[clap(flatten)]
    pub feed: FeedOptions,
}

pub async fn run(options: ListOptions, global: crate::Global) -> Result<()> {
    if global.verbose {
        println!(
            "Fetching r/{} ({})...",
            options.feed.subreddit, options.feed.sort_by
        );
    }

    let widget = list_posts_data(&options.feed).await?;

    if options.feed.json {
        println!("{}", format_posts_json(&widget.config, &widget.posts)?);
    } else {
        print!(
            "{}",
            format_posts_text(&widget.config, &widget.posts, Utc::now())
        );
    }

    Ok(())
}

/// Initializes a widget and runs a single refresh cycle
pub async fn list_posts_data(options: &FeedOptions) -> Result<RedditWidget> {
    let (mut widget, transport) = initialize(options).await?;
    let subreddit = widget.config.subreddit.clone();

    match widget.update(&transport).await {
        Ok(_) => {}
        Err(err) if err.is_fatal() => return Err(err.into()),
        Err(err) => return Err(eyre!("Failed to fetch r/{}: {}", subreddit, err)),
    }

    Ok(widget)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_posts_data_keeps_fatal_error_type() {
        let options = FeedOptions {
            subreddit: "rust".to_string(),
            request_url_template: "https://mirror.example/".to_string(),
            limit: 15,
            timeout: 5,
            ..Default::default()
        };

        let report = list_posts_data(&options).await.unwrap_err();

        assert!(matches!(report.downcast_ref::<Error>(), Some(Error::Config(_))));
    }
}
