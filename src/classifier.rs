//! Viral classification and ranking

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::info;
use viral_core::VideoRecord;

use crate::config::ClassifierConfig;
use crate::scoring::{ScoreCard, ScoreComponents, VideoMetrics};

/// A scored and classified video. Built once by the classifier, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredVideo {
    pub record: VideoRecord,
    pub metrics: VideoMetrics,
    pub components: ScoreComponents,
    pub total_score: f64,
    pub is_viral: bool,
}

impl ScoredVideo {
    fn from_card(card: ScoreCard, threshold: u32) -> Self {
        let is_viral = card.total_score >= f64::from(threshold);
        Self {
            record: card.record,
            metrics: card.metrics,
            components: card.components,
            total_score: card.total_score,
            is_viral,
        }
    }
}

/// Deterministic rank order: score descending, then views descending, then
/// earlier publish time, then video id.
pub fn rank_order(a: &ScoredVideo, b: &ScoredVideo) -> Ordering {
    b.total_score
        .total_cmp(&a.total_score)
        .then_with(|| b.record.view_count.cmp(&a.record.view_count))
        .then_with(|| a.record.published_at.cmp(&b.record.published_at))
        .then_with(|| a.record.video_id.cmp(&b.record.video_id))
}

/// Ranked, flagged videos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    threshold: u32,
    ranked: Vec<ScoredVideo>,
}

impl Ranking {
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// All videos in rank order
    pub fn ranked(&self) -> &[ScoredVideo] {
        &self.ranked
    }

    /// Viral videos only, in rank order
    pub fn viral_only(&self) -> impl Iterator<Item = &ScoredVideo> {
        self.ranked.iter().filter(|video| video.is_viral)
    }

    pub fn viral_count(&self) -> usize {
        self.viral_only().count()
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    /// `(ranked, viral_only)`, both in rank order
    pub fn into_parts(self) -> (Vec<ScoredVideo>, Vec<ScoredVideo>) {
        let viral = self.ranked.iter().filter(|v| v.is_viral).cloned().collect();
        (self.ranked, viral)
    }
}

/// Applies the viral threshold and ranks
#[derive(Debug, Clone)]
pub struct Classifier {
    threshold: u32,
}

impl Classifier {
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(config.viral_threshold)
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Flag and sort. Sorting happens after every card is flagged, so the
    /// order of the input never affects the result.
    pub fn classify(&self, cards: Vec<ScoreCard>) -> Ranking {
        let mut ranked: Vec<ScoredVideo> = cards
            .into_iter()
            .map(|card| ScoredVideo::from_card(card, self.threshold))
            .collect();
        ranked.sort_by(rank_order);

        let ranking = Ranking {
            threshold: self.threshold,
            ranked,
        };

        info!(
            "🏆 Ranked {} videos, {} at or above threshold {}",
            ranking.len(),
            ranking.viral_count(),
            self.threshold
        );

        ranking
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::from_config(&ClassifierConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn card(id: &str, score: f64, views: u64, published_offset_days: i64) -> ScoreCard {
        let record = VideoRecord::new(
            id.to_string(),
            base_time() + Duration::days(published_offset_days),
            views,
            0,
        );
        ScoreCard {
            record,
            metrics: VideoMetrics {
                days_since_published: 1,
                views_per_day: views as f64,
                like_ratio: 0.0,
                comment_ratio: 0.0,
                engagement_ratio: 0.0,
                channel_performance_ratio: None,
            },
            components: ScoreComponents::default(),
            total_score: score,
        }
    }

    fn ids(videos: &[ScoredVideo]) -> Vec<&str> {
        videos.iter().map(|v| v.record.video_id.as_str()).collect()
    }

    #[test]
    fn test_threshold_splits_72_and_65() {
        let ranking = Classifier::new(70)
            .classify(vec![card("low", 65.0, 10, 0), card("high", 72.0, 10, 0)]);
        let (ranked, viral) = ranking.into_parts();

        assert_eq!(ids(&ranked), vec!["high", "low"]);
        assert_eq!(ids(&viral), vec!["high"]);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let ranking = Classifier::new(70).classify(vec![card("edge", 70.0, 10, 0)]);
        assert_eq!(ranking.viral_count(), 1);
    }

    #[test]
    fn test_ties_broken_by_views_then_publish_time() {
        let ranking = Classifier::default().classify(vec![
            card("late", 50.0, 100, 5),
            card("more-views", 50.0, 200, 9),
            card("early", 50.0, 100, 1),
        ]);

        assert_eq!(ids(ranking.ranked()), vec!["more-views", "early", "late"]);
    }

    #[test]
    fn test_full_tie_broken_by_id() {
        let ranking =
            Classifier::default().classify(vec![card("b", 10.0, 1, 0), card("a", 10.0, 1, 0)]);
        assert_eq!(ids(ranking.ranked()), vec!["a", "b"]);
    }

    #[test]
    fn test_extreme_thresholds() {
        let cards = vec![card("a", 0.0, 1, 0), card("b", 100.0, 1, 0)];

        let all = Classifier::new(0).classify(cards.clone());
        assert_eq!(all.viral_count(), 2);

        let none = Classifier::new(101).classify(cards);
        assert_eq!(none.viral_count(), 0);
    }
}
