//! Additive relevance scoring
//!
//! Every comparison is case-insensitive on trimmed text. The point values
//! encode the ranking preferences: exact beats prefix beats substring, and
//! title beats tags, which beat body, then place, then mood.

use chrono::{DateTime, Utc};
use regex::RegexBuilder;

use crate::types::ContentItem;

/// Scores one item against a query.
///
/// Implementations must be pure: the same item, query and `now` always
/// produce the same score, and a blank query scores 0.
pub trait RelevanceScorer: Send + Sync {
    fn score(&self, item: &ContentItem, query: &str, now: DateTime<Utc>) -> i64;
}

impl<F> RelevanceScorer for F
where
    F: Fn(&ContentItem, &str, DateTime<Utc>) -> i64 + Send + Sync,
{
    fn score(&self, item: &ContentItem, query: &str, now: DateTime<Utc>) -> i64 {
        self(item, query, now)
    }
}

/// Point values used by [`WeightedScorer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreWeights {
    pub title_exact: i64,
    pub title_contains: i64,
    pub title_prefix: i64,
    pub tag_exact: i64,
    pub tag_contains: i64,
    pub body_per_occurrence: i64,
    pub body_cap: i64,
    pub body_present: i64,
    /// Album and location
    pub place_exact: i64,
    pub place_contains: i64,
    pub mood_exact: i64,
    pub mood_contains: i64,
    /// Created less than 7 days ago
    pub recent_week: i64,
    /// Created less than 30 days ago
    pub recent_month: i64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            title_exact: 20,
            title_contains: 10,
            title_prefix: 5,
            tag_exact: 12,
            tag_contains: 8,
            body_per_occurrence: 3,
            body_cap: 15,
            body_present: 2,
            place_exact: 8,
            place_contains: 4,
            mood_exact: 6,
            mood_contains: 3,
            recent_week: 2,
            recent_month: 1,
        }
    }
}

/// Fixed-weight additive scorer
#[derive(Debug, Clone, Default)]
pub struct WeightedScorer {
    weights: ScoreWeights,
}

impl WeightedScorer {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    fn title_score(&self, title: Option<&str>, query: &str) -> i64 {
        let Some(title) = title.map(normalize) else {
            return 0;
        };

        if title == query {
            self.weights.title_exact
        } else if title.contains(query) {
            let mut score = self.weights.title_contains;
            if title.starts_with(query) {
                score += self.weights.title_prefix;
            }
            score
        } else {
            0
        }
    }

    fn tags_score(&self, tags: &[String], query: &str) -> i64 {
        tags.iter()
            .map(|tag| {
                let tag = normalize(tag);
                if tag == query {
                    self.weights.tag_exact
                } else if tag.contains(query) {
                    self.weights.tag_contains
                } else {
                    0
                }
            })
            .sum()
    }

    fn body_score(&self, body: Option<&str>, query: &str) -> i64 {
        let Some(body) = body else {
            return 0;
        };

        let occurrences = RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build()
            .map(|re| re.find_iter(body).count() as i64)
            .unwrap_or(0);

        if occurrences == 0 {
            return 0;
        }

        (occurrences * self.weights.body_per_occurrence).min(self.weights.body_cap)
            + self.weights.body_present
    }

    fn field_score(value: Option<&str>, query: &str, exact: i64, contains: i64) -> i64 {
        match value.map(normalize) {
            Some(value) if value == query => exact,
            Some(value) if value.contains(query) => contains,
            _ => 0,
        }
    }

    fn place_score(&self, value: Option<&str>, query: &str) -> i64 {
        Self::field_score(
            value,
            query,
            self.weights.place_exact,
            self.weights.place_contains,
        )
    }

    fn recency_bonus(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
        let age_days = (now - created_at).num_days().max(0);
        if age_days < 7 {
            self.weights.recent_week
        } else if age_days < 30 {
            self.weights.recent_month
        } else {
            0
        }
    }
}

impl RelevanceScorer for WeightedScorer {
    fn score(&self, item: &ContentItem, query: &str, now: DateTime<Utc>) -> i64 {
        let query = normalize(query);
        if query.is_empty() {
            return 0;
        }

        let mut score = self.title_score(item.title(), &query)
            + self.tags_score(item.tags(), &query)
            + self.body_score(item.body(), &query);

        match item {
            ContentItem::Photo(photo) => {
                score += self.place_score(photo.album.as_deref(), &query);
                score += self.place_score(photo.location.as_deref(), &query);
            }
            ContentItem::Video(_) => {}
            ContentItem::Journal(journal) => {
                score += self.place_score(journal.location.as_deref(), &query);
                score += Self::field_score(
                    journal.mood.as_deref(),
                    &query,
                    self.weights.mood_exact,
                    self.weights.mood_contains,
                );
            }
        }

        score + self.recency_bonus(item.created_at(), now)
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{JournalDoc, PhotoDoc, VideoDoc};
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn photo(title: &str, tags: &[&str], age_days: i64) -> PhotoDoc {
        PhotoDoc {
            id: Uuid::new_v4(),
            title: Some(title.to_string()),
            description: None,
            url: None,
            thumbnail_url: None,
            uploader: None,
            album: None,
            location: None,
            tags: Some(tags.iter().map(|t| t.to_string()).collect()),
            is_public: true,
            created_at: now() - Duration::days(age_days),
        }
    }

    fn journal(title: &str, age_days: i64) -> JournalDoc {
        JournalDoc {
            id: Uuid::new_v4(),
            title: Some(title.to_string()),
            content: None,
            author: None,
            mood: None,
            location: None,
            tags: None,
            attachments: None,
            is_public: true,
            created_at: now() - Duration::days(age_days),
        }
    }

    fn score(item: &ContentItem, query: &str) -> i64 {
        WeightedScorer::default().score(item, query, now())
    }

    #[test]
    fn test_blank_query_scores_zero() {
        let item = ContentItem::Photo(photo("sunset", &["sunset"], 0));
        assert_eq!(score(&item, ""), 0);
        assert_eq!(score(&item, "   "), 0);

        let journal = ContentItem::Journal(journal("", 0));
        assert_eq!(score(&journal, "\t"), 0);
    }

    #[test]
    fn test_photo_title_contains_and_exact_tag() {
        // "Beautiful Sunset": substring (10), not a prefix; tag exact (12); recency (2)
        let item = ContentItem::Photo(photo("Beautiful Sunset", &["sunset"], 0));
        assert_eq!(score(&item, "sunset"), 24);
    }

    #[test]
    fn test_title_prefix_and_exact() {
        let prefix = ContentItem::Photo(photo("Sunset over the bay", &[], 100));
        assert_eq!(score(&prefix, "sunset"), 15);

        let exact = ContentItem::Photo(photo("  SUNSET ", &[], 100));
        assert_eq!(score(&exact, "Sunset"), 20);
    }

    #[test]
    fn test_exact_title_beats_containing_title() {
        for title in ["a sunset", "sunsets", "the sunset walk"] {
            let exact = ContentItem::Photo(photo("sunset", &["beach"], 3));
            let partial = ContentItem::Photo(photo(title, &["beach"], 3));
            assert!(score(&exact, "sunset") >= score(&partial, "sunset"));
        }
    }

    #[test]
    fn test_each_matching_tag_contributes() {
        let one = ContentItem::Photo(photo("x", &["paris", "food"], 60));
        let two = ContentItem::Photo(photo("x", &["paris", "paris trip"], 60));
        assert_eq!(score(&one, "paris"), 12);
        assert_eq!(score(&two, "paris"), 20);
        assert!(score(&two, "paris") > score(&one, "paris"));
    }

    #[test]
    fn test_body_occurrences_are_capped() {
        let mut doc = journal("notes", 60);
        doc.content = Some("Rain. rain, RAIN and more rain".to_string());
        assert_eq!(score(&ContentItem::Journal(doc.clone()), "rain"), 4 * 3 + 2);

        doc.content = Some("rain ".repeat(9));
        assert_eq!(score(&ContentItem::Journal(doc), "rain"), 15 + 2);
    }

    #[test]
    fn test_body_query_is_matched_literally() {
        let mut doc = journal("notes", 60);
        doc.content = Some("cost was $5.00 (approx) not 5x00".to_string());
        assert_eq!(score(&ContentItem::Journal(doc.clone()), "5.00"), 3 + 2);
        assert_eq!(score(&ContentItem::Journal(doc), "(approx"), 3 + 2);
    }

    #[test]
    fn test_journal_location_exact() {
        let mut doc = journal("Day one", 60);
        doc.location = Some("Paris".to_string());
        assert_eq!(score(&ContentItem::Journal(doc.clone()), "paris"), 8);

        doc.created_at = now() - Duration::days(2);
        assert_eq!(score(&ContentItem::Journal(doc), "paris"), 8 + 2);
    }

    #[test]
    fn test_album_and_location_both_fire() {
        let mut doc = photo("x", &[], 60);
        doc.album = Some("Paris".to_string());
        doc.location = Some("Paris, France".to_string());
        assert_eq!(score(&ContentItem::Photo(doc), "paris"), 8 + 4);
    }

    #[test]
    fn test_mood_only_counts_for_journals() {
        let mut doc = journal("x", 60);
        doc.mood = Some("Happy".to_string());
        assert_eq!(score(&ContentItem::Journal(doc.clone()), "happy"), 6);
        doc.mood = Some("unhappy".to_string());
        assert_eq!(score(&ContentItem::Journal(doc), "happy"), 3);
    }

    #[test]
    fn test_video_ignores_place_fields() {
        let video = VideoDoc {
            id: Uuid::new_v4(),
            title: Some("Tour".to_string()),
            description: Some("Walking tour of Lisbon".to_string()),
            video_url: None,
            thumbnail_url: None,
            uploader: None,
            category: Some("lisbon".to_string()),
            tags: None,
            is_public: true,
            duration: Some(120.0),
            size: Some(1024),
            created_at: now() - Duration::days(45),
        };
        assert_eq!(score(&ContentItem::Video(video), "lisbon"), 3 + 2);
    }

    #[test]
    fn test_recency_bonus_steps() {
        let at = |days| score(&ContentItem::Photo(photo("unrelated", &[], days)), "zzz");
        assert_eq!(at(0), 2);
        assert_eq!(at(6), 2);
        assert_eq!(at(7), 1);
        assert_eq!(at(29), 1);
        assert_eq!(at(30), 0);
        assert_eq!(at(-3), 2);
        assert!(at(1) >= at(40));
    }

    #[test]
    fn test_custom_strategy_via_closure() {
        let by_title_len = |item: &ContentItem, _q: &str, _now: DateTime<Utc>| {
            item.title().map(|t| t.len() as i64).unwrap_or(0)
        };
        let item = ContentItem::Photo(photo("four", &[], 0));
        assert_eq!(by_title_len.score(&item, "q", now()), 4);
    }

    #[test]
    fn test_custom_weights() {
        let scorer = WeightedScorer::new(ScoreWeights {
            recent_week: 0,
            recent_month: 0,
            ..ScoreWeights::default()
        });
        let item = ContentItem::Photo(photo("Sunset", &[], 0));
        assert_eq!(scorer.score(&item, "sunset", now()), 20);
    }
}
