//! Engagement ranking
//!
//! Scores each post of an already truncated batch and re-orders the batch by
//! descending score. The scoring function is pluggable through
//! [`EngagementScorer`]; the sort is stable, so equal scores keep their
//! relative order.

use chrono::{DateTime, Utc};

use crate::reddit::Post;

/// Exponent of the recency decay applied by [`RelativeEngagement`]
pub const RECENCY_DECAY_EXPONENT: f64 = 0.85;

/// Computes one engagement value per post of a batch
pub trait EngagementScorer {
    /// Returns exactly one score per post, in the same order
    fn scores(&self, posts: &[Post], now: DateTime<Utc>) -> Vec<f64>;
}

/// Ranks by raw score only
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreOnly;

impl EngagementScorer for ScoreOnly {
    fn scores(&self, posts: &[Post], _now: DateTime<Utc>) -> Vec<f64> {
        posts.iter().map(|p| p.score as f64).collect()
    }
}

/// Comments and score relative to the batch averages, decayed by age in hours
#[derive(Debug, Clone, Copy, Default)]
pub struct RelativeEngagement;

fn relative(value: i64, average: f64) -> f64 {
    if average > 0.0 {
        value as f64 / average
    } else {
        0.0
    }
}

impl EngagementScorer for RelativeEngagement {
    fn scores(&self, posts: &[Post], now: DateTime<Utc>) -> Vec<f64> {
        if posts.is_empty() {
            return Vec::new();
        }

        let count = posts.len() as f64;
        let average_comments = posts.iter().map(|p| p.comment_count as f64).sum::<f64>() / count;
        let average_score = posts.iter().map(|p| p.score as f64).sum::<f64>() / count;

        posts
            .iter()
            .map(|p| {
                let hours = (now - p.time_posted).num_seconds().max(0) as f64 / 3600.0;
                let decay = hours.powf(RECENCY_DECAY_EXPONENT) + 1.0;

                (relative(p.comment_count, average_comments) + relative(p.score, average_score))
                    / decay
            })
            .collect()
    }
}

/// Score every post and sort by descending engagement
pub fn rank_by_engagement(
    mut posts: Vec<Post>,
    scorer: &dyn EngagementScorer,
    now: DateTime<Utc>,
) -> Vec<Post> {
    let scores = scorer.scores(&posts, now);

    for (post, score) in posts.iter_mut().zip(scores) {
        post.engagement = if score.is_nan() { 0.0 } else { score };
    }

    posts.sort_by(|a, b| b.engagement.total_cmp(&a.engagement));
    posts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_100_000, 0).unwrap()
    }

    fn post(title: &str, score: i64, comments: i64, hours_ago: i64) -> Post {
        Post {
            title: title.to_string(),
            discussion_url: format!("https://www.reddit.com/r/rust/comments/{title}/"),
            target_url: None,
            target_url_domain: "self.rust".to_string(),
            thumbnail_url: None,
            tags: Vec::new(),
            comment_count: comments,
            score,
            time_posted: now() - Duration::hours(hours_ago),
            is_crosspost: false,
            engagement: 0.0,
        }
    }

    fn titles(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.title.as_str()).collect()
    }

    #[test]
    fn test_rank_keeps_length_and_orders_descending() {
        let posts = vec![
            post("a", 10, 1, 1),
            post("b", 50, 2, 1),
            post("c", 5, 30, 1),
            post("d", 0, 0, 1),
        ];

        let ranked = rank_by_engagement(posts, &RelativeEngagement, now());

        assert_eq!(ranked.len(), 4);
        assert!(ranked
            .windows(2)
            .all(|pair| pair[0].engagement >= pair[1].engagement));
    }

    #[test]
    fn test_rank_is_stable_for_equal_scores() {
        let posts = vec![
            post("first", 7, 0, 2),
            post("top", 9, 0, 2),
            post("second", 7, 0, 2),
            post("third", 7, 0, 2),
        ];

        let ranked = rank_by_engagement(posts, &ScoreOnly, now());

        assert_eq!(titles(&ranked), vec!["top", "first", "second", "third"]);
    }

    #[test]
    fn test_rank_score_only() {
        let posts = vec![post("a", 10, 0, 0), post("b", 50, 0, 0)];

        let ranked = rank_by_engagement(posts, &ScoreOnly, now());

        assert_eq!(titles(&ranked), vec!["b", "a"]);
        assert_eq!(ranked[0].engagement, 50.0);
    }

    #[test]
    fn test_relative_engagement_prefers_recent() {
        let posts = vec![post("old", 100, 10, 48), post("fresh", 100, 10, 1)];

        let ranked = rank_by_engagement(posts, &RelativeEngagement, now());

        assert_eq!(titles(&ranked), vec!["fresh", "old"]);
    }

    #[test]
    fn test_relative_engagement_zero_averages() {
        let posts = vec![post("a", 0, 0, 1), post("b", 0, 0, 1)];

        let scores = RelativeEngagement.scores(&posts, now());

        assert_eq!(scores, vec![0.0, 0.0]);
    }

    #[test]
    fn test_relative_engagement_brand_new_post_not_divided_by_zero() {
        let scores = RelativeEngagement.scores(&[post("now", 10, 4, 0)], now());

        assert_eq!(scores, vec![2.0]);
    }

    #[test]
    fn test_relative_engagement_empty_batch() {
        assert!(RelativeEngagement.scores(&[], now()).is_empty());
        assert!(rank_by_engagement(Vec::new(), &RelativeEngagement, now()).is_empty());
    }
}
