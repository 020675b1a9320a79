//! Virality score engine
//!
//! Four sub-scores of up to [`SUB_SCORE_WEIGHT`] points each (daily views,
//! like ratio, comment ratio, engagement) plus an additive channel bonus,
//! clamped to `0..=MAX_SCORE`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use viral_core::VideoRecord;

use crate::config::ScoringConfig;

/// Maximum points a single sub-score contributes
pub const SUB_SCORE_WEIGHT: f64 = 25.0;

/// Upper bound of the total score
pub const MAX_SCORE: f64 = 100.0;

/// Raw performance metrics the sub-scores are derived from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetrics {
    /// Whole days since publish, at least 1
    pub days_since_published: i64,
    pub views_per_day: f64,
    pub like_ratio: f64,
    pub comment_ratio: f64,
    pub engagement_ratio: f64,

    /// Views relative to the channel's expected views, when known
    pub channel_performance_ratio: Option<f64>,
}

/// Points awarded per component
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreComponents {
    pub daily_views: f64,
    pub like_ratio: f64,
    pub comment_ratio: f64,
    pub engagement: f64,
    pub channel_bonus: f64,
}

impl ScoreComponents {
    /// Sum of the four weighted sub-scores, without the bonus
    pub fn base(&self) -> f64 {
        self.daily_views + self.like_ratio + self.comment_ratio + self.engagement
    }

    /// Base plus bonus, clamped to the score range
    pub fn total(&self) -> f64 {
        let total = self.base() + self.channel_bonus;
        if total.is_nan() {
            0.0
        } else {
            total.clamp(0.0, MAX_SCORE)
        }
    }
}

/// Score of one record before classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub record: VideoRecord,
    pub metrics: VideoMetrics,
    pub components: ScoreComponents,
    pub total_score: f64,
}

/// Pure scoring over `(record, now, config)`
#[derive(Debug, Clone, Default)]
pub struct ScoreEngine {
    config: ScoringConfig,
}

impl ScoreEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Compute the raw metrics of a record.
    ///
    /// Records reaching this point have a positive view count; the `max(1)`
    /// keeps the ratios finite should a zero-view record slip through.
    pub fn metrics(&self, record: &VideoRecord, now: DateTime<Utc>) -> VideoMetrics {
        let days = record.age_in_days(now);
        let views = record.view_count.max(1) as f64;
        let likes = record.like_count as f64;
        let comments = record.comment_count as f64;

        let channel_performance_ratio = record
            .channel_average_views
            .filter(|avg| avg.is_finite() && *avg > 0.0)
            .map(|avg| record.view_count as f64 / avg);

        VideoMetrics {
            days_since_published: days,
            views_per_day: record.view_count as f64 / days as f64,
            like_ratio: likes / views,
            comment_ratio: comments / views,
            engagement_ratio: (likes + comments * self.config.engagement_comment_weight) / views,
            channel_performance_ratio,
        }
    }

    /// Convert metrics into points
    pub fn components(&self, metrics: &VideoMetrics) -> ScoreComponents {
        ScoreComponents {
            daily_views: saturating_score(
                metrics.views_per_day,
                self.config.daily_views_saturation,
            ),
            like_ratio: saturating_score(metrics.like_ratio, self.config.like_ratio_ceiling),
            comment_ratio: saturating_score(
                metrics.comment_ratio,
                self.config.comment_ratio_ceiling,
            ),
            engagement: saturating_score(metrics.engagement_ratio, self.config.engagement_ceiling),
            channel_bonus: self.channel_bonus(metrics.channel_performance_ratio),
        }
    }

    /// Channel-performance bonus for a views/channel-average ratio.
    /// Unknown history earns nothing. A cap that is negative or not finite
    /// allows no bonus at all.
    pub fn channel_bonus(&self, ratio: Option<f64>) -> f64 {
        let cap = self.config.channel_bonus_cap;
        if !(cap.is_finite() && cap > 0.0) {
            return 0.0;
        }

        match ratio {
            Some(ratio) if ratio.is_finite() && ratio > self.config.channel_bonus_min_ratio => {
                let bonus = (ratio - 1.0) * self.config.channel_bonus_scale;
                if bonus.is_nan() {
                    0.0
                } else {
                    bonus.min(cap).max(0.0)
                }
            }
            _ => 0.0,
        }
    }

    /// Score one record
    pub fn score(&self, record: &VideoRecord, now: DateTime<Utc>) -> ScoreCard {
        let metrics = self.metrics(record, now);
        let components = self.components(&metrics);
        let total_score = components.total();

        debug!(
            "Scored {}: {:.2} (views/day {:.1}, likes {:.4}, comments {:.4}, bonus {:.1})",
            record.video_id,
            total_score,
            metrics.views_per_day,
            metrics.like_ratio,
            metrics.comment_ratio,
            components.channel_bonus
        );

        ScoreCard {
            record: record.clone(),
            metrics,
            components,
            total_score,
        }
    }

    /// Score every record independently
    pub fn score_batch(&self, records: &[VideoRecord], now: DateTime<Utc>) -> Vec<ScoreCard> {
        records.iter().map(|record| self.score(record, now)).collect()
    }
}

/// Linear score reaching [`SUB_SCORE_WEIGHT`] at `ceiling` and capped there
fn saturating_score(value: f64, ceiling: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 || ceiling <= 0.0 {
        return 0.0;
    }
    (value / ceiling * SUB_SCORE_WEIGHT).min(SUB_SCORE_WEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn record(views: u64, likes: u64, comments: u64, days_ago: i64) -> VideoRecord {
        VideoRecord::new("v".to_string(), now() - Duration::days(days_ago), views, likes)
            .with_comment_count(comments)
    }

    #[test]
    fn test_saturating_score() {
        assert_eq!(saturating_score(0.0, 10.0), 0.0);
        assert_eq!(saturating_score(5.0, 10.0), 12.5);
        assert_eq!(saturating_score(10.0, 10.0), 25.0);
        assert_eq!(saturating_score(1_000.0, 10.0), 25.0);
        assert_eq!(saturating_score(f64::INFINITY, 10.0), 0.0);
    }

    #[test]
    fn test_ten_thousand_daily_views_saturate() {
        let engine = ScoreEngine::default();
        let card = engine.score(&record(10_000, 500, 50, 1), now());

        assert_eq!(card.metrics.days_since_published, 1);
        assert_eq!(card.metrics.views_per_day, 10_000.0);
        assert_eq!(card.metrics.like_ratio, 0.05);
        assert_eq!(card.components.daily_views, 25.0);
        assert_eq!(card.components.like_ratio, 25.0);
        assert_eq!(card.components.channel_bonus, 0.0);
        assert_eq!(card.total_score, 100.0);
    }

    #[test]
    fn test_partial_scores() {
        let engine = ScoreEngine::default();
        // 5000 views over 10 days -> 500/day; 1% likes; 0.05% comments
        let card = engine.score(&record(5_000, 50, 2, 10), now());

        assert!((card.components.daily_views - 1.25).abs() < 1e-9);
        assert!((card.components.like_ratio - 12.5).abs() < 1e-9);
        assert!((card.components.comment_ratio - 10.0).abs() < 1e-9);
        // (50 + 2) / 5000 = 0.0104 of 0.03
        assert!((card.components.engagement - 0.0104 / 0.03 * 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_same_day_video_uses_one_day() {
        let engine = ScoreEngine::default();
        let video = VideoRecord::new("v".to_string(), now() - Duration::hours(3), 2_000, 10);

        assert_eq!(engine.metrics(&video, now()).views_per_day, 2_000.0);
    }

    #[test]
    fn test_channel_bonus_rules() {
        let engine = ScoreEngine::default();

        assert_eq!(engine.channel_bonus(None), 0.0);
        assert_eq!(engine.channel_bonus(Some(1.5)), 0.0);
        assert_eq!(engine.channel_bonus(Some(2.0)), 0.0);
        assert_eq!(engine.channel_bonus(Some(3.0)), 10.0);
        assert_eq!(engine.channel_bonus(Some(50.0)), 20.0);
    }

    #[test]
    fn test_unusable_channel_bonus_settings_give_no_bonus() {
        for cap in [-1.0, f64::NAN, f64::INFINITY] {
            let engine = ScoreEngine::new(ScoringConfig {
                channel_bonus_cap: cap,
                ..ScoringConfig::default()
            });
            assert_eq!(engine.channel_bonus(Some(10.0)), 0.0, "cap {}", cap);
        }

        let engine = ScoreEngine::new(ScoringConfig {
            channel_bonus_scale: f64::NAN,
            ..ScoringConfig::default()
        });
        assert_eq!(engine.channel_bonus(Some(10.0)), 0.0);

        let engine = ScoreEngine::new(ScoringConfig {
            channel_bonus_cap: -1.0,
            ..ScoringConfig::default()
        });
        let video = record(10_000, 50, 5, 2).with_channel_average_views(1_000.0);
        let card = engine.score(&video, now());
        assert_eq!(card.components.channel_bonus, 0.0);
        assert!((0.0..=100.0).contains(&card.total_score));
    }

    #[test]
    fn test_channel_bonus_from_record() {
        let engine = ScoreEngine::default();
        let video = record(4_000, 0, 0, 30).with_channel_average_views(1_000.0);
        let card = engine.score(&video, now());

        assert_eq!(card.metrics.channel_performance_ratio, Some(4.0));
        assert_eq!(card.components.channel_bonus, 15.0);
    }

    #[test]
    fn test_total_is_clamped() {
        let components = ScoreComponents {
            daily_views: 25.0,
            like_ratio: 25.0,
            comment_ratio: 25.0,
            engagement: 25.0,
            channel_bonus: 20.0,
        };
        assert_eq!(components.base(), 100.0);
        assert_eq!(components.total(), 100.0);
    }

    #[test]
    fn test_comment_weight_changes_engagement() {
        let config = ScoringConfig {
            engagement_comment_weight: 5.0,
            ..ScoringConfig::default()
        };
        let engine = ScoreEngine::new(config);
        let metrics = engine.metrics(&record(1_000, 10, 2, 5), now());

        assert!((metrics.engagement_ratio - 0.02).abs() < 1e-12);
    }
}
