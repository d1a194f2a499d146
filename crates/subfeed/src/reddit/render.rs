use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;

use crate::prelude::*;
use subfeed_core::reddit::config::{Style, WidgetConfig};
use subfeed_core::reddit::Post;

/// JSON document printed by `--json`
#[derive(Debug, Serialize)]
pub struct FeedOutput<'a> {
    pub title: String,
    pub title_url: String,
    pub subreddit: &'a str,
    pub posts: &'a [Post],
}

pub fn format_posts_json(config: &WidgetConfig, posts: &[Post]) -> Result<String> {
    let output = FeedOutput {
        title: config.title(),
        title_url: config.title_url(),
        subreddit: &config.subreddit,
        posts,
    };

    serde_json::to_string_pretty(&output).map_err(|e| eyre!("JSON serialization failed: {}", e))
}

/// Compact age, e.g. `45m`, `3h`, `2d`
pub fn format_age(time_posted: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - time_posted).num_minutes().max(0);

    match minutes {
        m if m < 60 => f!("{m}m"),
        m if m < 60 * 24 => f!("{}h", m / 60),
        m => f!("{}d", m / (60 * 24)),
    }
}

fn crosspost_marker(post: &Post) -> &'static str {
    if post.is_crosspost {
        " (crosspost)"
    } else {
        ""
    }
}

fn format_forum_post(result: &mut String, idx: usize, post: &Post, config: &WidgetConfig, now: DateTime<Utc>) {
    result.push_str(&f!(
        "\n{} {}\n",
        f!("[{}]", idx + 1).yellow().bold(),
        post.title.white().bold()
    ));

    if let Some(url) = &post.target_url {
        result.push_str(&f!(
            "    {}: {} ({}{})\n",
            "Link".green(),
            url.cyan().underline(),
            post.target_url_domain.bright_black(),
            crosspost_marker(post)
        ));
    }

    result.push_str(&f!(
        "    {}: {} | {}: {} | {}: {}\n",
        "Score".green(),
        post.score.to_string().bright_yellow(),
        "Comments".green(),
        post.comment_count.to_string().bright_magenta(),
        "Age".green(),
        format_age(post.time_posted, now).bright_black()
    ));

    if !post.tags.is_empty() {
        result.push_str(&f!(
            "    {}: {}\n",
            "Tags".green(),
            post.tags.join(", ").bright_white()
        ));
    }

    result.push_str(&f!(
        "    {}: {}\n",
        "Discussion".green(),
        post.discussion_url.cyan()
    ));

    if config.show_thumbnails {
        if let Some(thumbnail) = &post.thumbnail_url {
            result.push_str(&f!("    {}: {}\n", "Thumbnail".green(), thumbnail.bright_black()));
        }
    }
}

fn format_vertical_card(result: &mut String, post: &Post, config: &WidgetConfig, now: DateTime<Utc>) {
    let border = "-".repeat(78);

    result.push_str(&f!("\n+{}+\n", border.bright_black()));
    result.push_str(&f!("| {}\n", post.title.white().bold()));

    if config.show_thumbnails {
        if let Some(thumbnail) = &post.thumbnail_url {
            result.push_str(&f!("| {}\n", thumbnail.bright_black()));
        }
    }

    result.push_str(&f!(
        "| {} points · {} comments · {}{}\n",
        post.score.to_string().bright_yellow(),
        post.comment_count.to_string().bright_magenta(),
        format_age(post.time_posted, now),
        crosspost_marker(post)
    ));

    for tag in &post.tags {
        result.push_str(&f!("| #{}\n", tag.bright_white()));
    }

    result.push_str(&f!(
        "| {}\n",
        post.target_url.as_deref().unwrap_or(&post.discussion_url).cyan()
    ));
    result.push_str(&f!("+{}+\n", border.bright_black()));
}

fn format_horizontal_cards(posts: &[Post], config: &WidgetConfig, now: DateTime<Utc>) -> String {
    let mut table = new_table();

    let mut header = prettytable::row!["#", "Title", "Score", "Comments", "Age", "Domain"];
    if config.show_thumbnails {
        header.add_cell(prettytable::Cell::new("Thumbnail"));
    }
    table.set_titles(header);

    for (idx, post) in posts.iter().enumerate() {
        let mut row = prettytable::row![
            idx + 1,
            post.title,
            post.score,
            post.comment_count,
            format_age(post.time_posted, now),
            post.target_url_domain
        ];
        if config.show_thumbnails {
            row.add_cell(prettytable::Cell::new(
                post.thumbnail_url.as_deref().unwrap_or("-"),
            ));
        }
        table.add_row(row);
    }

    table.to_string()
}

/// Render a post batch as colored terminal text
pub fn format_posts_text(config: &WidgetConfig, posts: &[Post], now: DateTime<Utc>) -> String {
    let mut result = String::new();

    result.push_str(&f!("\n{}\n", "=".repeat(80).bright_cyan()));
    result.push_str(&f!(
        "{} {}\n",
        config.title().bright_cyan().bold(),
        config.title_url().bright_black()
    ));
    result.push_str(&f!("{}\n", "=".repeat(80).bright_cyan()));

    if posts.is_empty() {
        result.push_str(&f!("\n{}\n", "No posts to show.".yellow()));
        return result;
    }

    let visible = config.visible_before_collapse(posts.len());
    let shown = &posts[..visible];

    match config.style {
        Style::ForumPosts => {
            for (idx, post) in shown.iter().enumerate() {
                format_forum_post(&mut result, idx, post, config, now);
            }
        }
        Style::VerticalCards => {
            for post in shown {
                format_vertical_card(&mut result, post, config, now);
            }
        }
        Style::HorizontalCards => {
            result.push('\n');
            result.push_str(&format_horizontal_cards(shown, config, now));
        }
    }

    let hidden = posts.len() - visible;
    if hidden > 0 {
        result.push_str(&f!(
            "\n{}\n",
            f!("... {hidden} more posts (use --collapse-after -1 to show all)").bright_black()
        ));
    }

    result.push('\n');
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use subfeed_core::reddit::config::RawWidgetConfig;

    fn now() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_100_000, 0).unwrap()
    }

    fn create_test_post(n: i64) -> Post {
        Post {
            title: f!("Test Post {n}"),
            discussion_url: f!("https://www.reddit.com/r/rust/comments/{n}/"),
            target_url: Some(f!("https://example.com/{n}")),
            target_url_domain: "example.com".to_string(),
            thumbnail_url: Some(f!("https://thumbs.example/{n}.jpg")),
            tags: vec!["news".to_string()],
            comment_count: 7,
            score: 42,
            time_posted: now() - Duration::hours(3),
            is_crosspost: false,
            engagement: 0.0,
        }
    }

    fn create_test_config(style: &str, collapse_after: i64, show_thumbnails: bool) -> WidgetConfig {
        WidgetConfig::from_raw(RawWidgetConfig {
            subreddit: "rust".to_string(),
            style: style.to_string(),
            collapse_after,
            show_thumbnails,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(now() - Duration::minutes(5), now()), "5m");
        assert_eq!(format_age(now() - Duration::hours(3), now()), "3h");
        assert_eq!(format_age(now() - Duration::days(2), now()), "2d");
        assert_eq!(format_age(now() + Duration::minutes(5), now()), "0m");
    }

    #[test]
    fn test_format_posts_text_forum_posts() {
        let config = create_test_config("", 5, false);

        let formatted = format_posts_text(&config, &[create_test_post(1)], now());

        assert!(formatted.contains("r/rust"));
        assert!(formatted.contains("Test Post 1"));
        assert!(formatted.contains("[1]"));
        assert!(formatted.contains("https://example.com/1"));
        assert!(formatted.contains("https://www.reddit.com/r/rust/comments/1/"));
        assert!(formatted.contains("news"));
        assert!(formatted.contains("3h"));
        assert!(!formatted.contains("Thumbnail"));
    }

    #[test]
    fn test_format_posts_text_thumbnails_when_enabled() {
        let config = create_test_config("", 5, true);

        let formatted = format_posts_text(&config, &[create_test_post(1)], now());

        assert!(formatted.contains("https://thumbs.example/1.jpg"));
    }

    #[test]
    fn test_format_posts_text_collapses() {
        let config = create_test_config("", 2, false);
        let posts: Vec<Post> = (1..=5).map(create_test_post).collect();

        let formatted = format_posts_text(&config, &posts, now());

        assert!(formatted.contains("Test Post 2"));
        assert!(!formatted.contains("Test Post 3"));
        assert!(formatted.contains("3 more posts"));
    }

    #[test]
    fn test_format_posts_text_never_collapses() {
        let config = create_test_config("", -1, false);
        let posts: Vec<Post> = (1..=8).map(create_test_post).collect();

        let formatted = format_posts_text(&config, &posts, now());

        assert!(formatted.contains("Test Post 8"));
        assert!(!formatted.contains("more posts"));
    }

    #[test]
    fn test_format_posts_text_crosspost_marker() {
        let config = create_test_config("", 5, false);
        let mut post = create_test_post(1);
        post.is_crosspost = true;
        post.target_url_domain = "r/programming".to_string();

        let formatted = format_posts_text(&config, &[post], now());

        assert!(formatted.contains("r/programming"));
        assert!(formatted.contains("(crosspost)"));
    }

    #[test]
    fn test_format_posts_text_vertical_cards() {
        let config = create_test_config("vertical-cards", 5, false);
        let mut self_post = create_test_post(2);
        self_post.target_url = None;

        let formatted = format_posts_text(&config, &[create_test_post(1), self_post], now());

        assert!(formatted.contains("points"));
        assert!(formatted.contains("42"));
        assert!(formatted.contains("#news"));
        assert!(formatted.contains("https://www.reddit.com/r/rust/comments/2/"));
    }

    #[test]
    fn test_format_posts_text_horizontal_cards() {
        let config = create_test_config("horizontal-cards", 5, true);

        let formatted = format_posts_text(&config, &[create_test_post(1)], now());

        assert!(formatted.contains("Title"));
        assert!(formatted.contains("Test Post 1"));
        assert!(formatted.contains("example.com"));
        assert!(formatted.contains("https://thumbs.example/1.jpg"));
    }

    #[test]
    fn test_format_posts_text_empty() {
        let config = create_test_config("", 5, false);

        let formatted = format_posts_text(&config, &[], now());

        assert!(formatted.contains("No posts to show"));
    }

    #[test]
    fn test_format_posts_json_structure() {
        let config = create_test_config("", 5, false);

        let json = format_posts_json(&config, &[create_test_post(1)]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["title"], "r/rust");
        assert_eq!(parsed["title_url"], "https://www.reddit.com/r/rust/");
        assert_eq!(parsed["posts"].as_array().unwrap().len(), 1);
        assert_eq!(parsed["posts"][0]["score"], 42);
        assert!(parsed["posts"][0].get("engagement").is_none());
    }
}
