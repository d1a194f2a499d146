use std::time::Duration;

use chrono::Utc;
use colored::Colorize;

use crate::prelude::{eprintln, println, *};
use subfeed_core::reddit::config::CACHE_DURATION;

use super::render::{format_posts_json, format_posts_text};
use super::{initialize, FeedOptions, RedditWidget, Transport};

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct WatchOptions {
    #[clap(flatten)]
    pub feed: FeedOptions,

    /// Seconds between refresh cycles (defaults to the 30 minute cache duration)
    #[arg(long)]
    pub interval: Option<u64>,

    /// Abandon a refresh cycle that takes longer than this many seconds
    #[arg(long, default_value = "30")]
    pub deadline: u64,
}

impl WatchOptions {
    pub fn interval(&self) -> Duration {
        self.interval.map(Duration::from_secs).unwrap_or(CACHE_DURATION)
    }
}

/// Result of one refresh attempt
#[derive(Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    Updated(usize),
    Failed(Error),
    Interrupted,
}

/// Run one refresh cycle bounded by a deadline
///
/// On timeout the in-flight request is dropped and the previous batch stays.
pub async fn refresh_with_deadline<T: Transport>(
    widget: &mut RedditWidget,
    transport: &T,
    deadline: Duration,
) -> CycleOutcome {
    match tokio::time::timeout(deadline, widget.update(transport)).await {
        Ok(Ok(count)) => CycleOutcome::Updated(count),
        Ok(Err(err)) => CycleOutcome::Failed(err),
        Err(_) => {
            let err = Error::Cancelled(f!("no response within {}s", deadline.as_secs()));
            widget.record_failure(&err);
            CycleOutcome::Failed(err)
        }
    }
}

/// Footer shown under each refresh, e.g. `Last updated 14:05:00 UTC`
pub fn format_status(widget: &RedditWidget) -> String {
    let updated = match widget.last_updated {
        Some(at) => f!("Last updated {}", at.format("%H:%M:%S UTC")),
        None => "Not updated yet".to_string(),
    };

    match &widget.last_error {
        Some(err) => f!("{updated} (last refresh failed: {err})"),
        None => updated,
    }
}

fn display(widget: &RedditWidget, json: bool) -> Result<()> {
    if json {
        println!("{}", format_posts_json(&widget.config, &widget.posts)?);
    } else {
        print!(
            "{}",
            format_posts_text(&widget.config, &widget.posts, Utc::now())
        );
        println!("{}", format_status(widget).bright_black());
    }
    Ok(())
}

pub async fn run(options: WatchOptions, global: crate::Global) -> Result<()> {
    let (mut widget, transport) = initialize(&options.feed).await?;
    let deadline = Duration::from_secs(options.deadline);
    let interval = options.interval();

    if global.verbose {
        println!(
            "Watching {} every {}s (authenticated: {})",
            widget.config.title(),
            interval.as_secs(),
            widget.is_authenticated()
        );
    }

    loop {
        let outcome = tokio::select! {
            outcome = refresh_with_deadline(&mut widget, &transport, deadline) => outcome,
            _ = tokio::signal::ctrl_c() => CycleOutcome::Interrupted,
        };

        match outcome {
            CycleOutcome::Updated(count) => {
                log::info!("refreshed {}: {count} posts", widget.config.title());
                display(&widget, options.feed.json)?;
            }
            CycleOutcome::Failed(err) if err.is_fatal() => return Err(err.into()),
            CycleOutcome::Failed(err) => {
                eprintln!("{} {}", "Refresh failed:".yellow().bold(), err);
                if !widget.posts.is_empty() {
                    display(&widget, options.feed.json)?;
                }
            }
            CycleOutcome::Interrupted => break,
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}
