//! Human-readable insights and early growth prediction

use serde::{Deserialize, Serialize};
use viral_core::VideoRecord;

use crate::classifier::ScoredVideo;
use crate::config::ScoringConfig;
use crate::keywords::KeywordReport;

/// Projected engagement above which the strong engagement points apply
const HIGH_ENGAGEMENT: f64 = 1_000.0;
const MODERATE_ENGAGEMENT: f64 = 500.0;

/// Comments count this many times a like when projecting engagement
const COMMENT_ENGAGEMENT_WEIGHT: f64 = 5.0;

/// Uploads younger than this with fast hourly growth earn early points
const EARLY_WINDOW_HOURS: f64 = 6.0;
const EARLY_VIEWS_PER_HOUR: f64 = 1_000.0;

/// Describe why a scored video did or did not perform
pub fn viral_insights(video: &ScoredVideo, config: &ScoringConfig) -> Vec<String> {
    let mut insights = Vec::new();
    let metrics = &video.metrics;

    if video.is_viral {
        insights.push("🔥 This video is classified as viral".to_string());
    } else {
        insights.push("📊 This video shows typical performance".to_string());
    }

    let saturation = config.daily_views_saturation;
    if metrics.views_per_day > saturation {
        insights.push(format!(
            "👀 Very high daily views: {:.0} per day",
            metrics.views_per_day
        ));
    } else if metrics.views_per_day > saturation * 0.5 {
        insights.push(format!(
            "📈 Solid daily views: {:.0} per day",
            metrics.views_per_day
        ));
    } else {
        insights.push(format!(
            "📉 Daily views need improvement: {:.0} per day",
            metrics.views_per_day
        ));
    }

    if metrics.like_ratio > config.like_ratio_ceiling {
        insights.push(format!(
            "👍 Strong audience response with a {:.2}% like ratio",
            metrics.like_ratio * 100.0
        ));
    }

    if metrics.comment_ratio > config.comment_ratio_ceiling {
        insights.push(format!(
            "💬 Active discussion with a {:.2}% comment ratio",
            metrics.comment_ratio * 100.0
        ));
    }

    match metrics.channel_performance_ratio {
        Some(ratio) if ratio > 2.0 => insights.push(format!(
            "🚀 Performing {:.1}x above the channel average",
            ratio
        )),
        Some(ratio) if ratio < 0.5 => insights.push(
            "💡 Below the channel average; consider a better title or thumbnail".to_string(),
        ),
        _ => {}
    }

    insights
}

/// Growth outlook bucket of a potential score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthTier {
    Explosive,
    Strong,
    Moderate,
    Slow,
}

impl GrowthTier {
    pub fn from_score(score: u32) -> Self {
        if score >= 80 {
            GrowthTier::Explosive
        } else if score >= 60 {
            GrowthTier::Strong
        } else if score >= 40 {
            GrowthTier::Moderate
        } else {
            GrowthTier::Slow
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            GrowthTier::Explosive => "🚀 Very high viral potential, consider extra promotion",
            GrowthTier::Strong => "📈 Good momentum, share it more on social media",
            GrowthTier::Moderate => "💡 Average traction, try optimizing the title or thumbnail",
            GrowthTier::Slow => "📊 Slow growth, the content strategy may need a review",
        }
    }
}

/// Projection of the first 24 hours from early performance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthPrediction {
    pub potential_score: u32,
    pub predicted_24h_views: u64,
    pub predicted_24h_engagement: u64,
    pub views_per_hour: f64,
    pub tier: GrowthTier,
    pub recommendation: String,
}

/// Project 24-hour performance from the hourly rate so far.
///
/// Returns `None` for uploads younger than one hour.
pub fn predict_growth(
    record: &VideoRecord,
    hours_since_upload: f64,
    config: &ScoringConfig,
) -> Option<GrowthPrediction> {
    if !hours_since_upload.is_finite() || hours_since_upload < 1.0 {
        return None;
    }

    let views_per_hour = record.view_count as f64 / hours_since_upload;
    let likes_per_hour = record.like_count as f64 / hours_since_upload;
    let comments_per_hour = record.comment_count as f64 / hours_since_upload;

    let predicted_views = views_per_hour * 24.0;
    let predicted_engagement =
        (likes_per_hour + comments_per_hour * COMMENT_ENGAGEMENT_WEIGHT) * 24.0;

    let mut score = 0u32;

    let saturation = config.daily_views_saturation;
    if predicted_views > saturation {
        score += 40;
    } else if predicted_views > saturation * 0.5 {
        score += 20;
    }

    if predicted_engagement > HIGH_ENGAGEMENT {
        score += 30;
    } else if predicted_engagement > MODERATE_ENGAGEMENT {
        score += 15;
    }

    if hours_since_upload <= EARLY_WINDOW_HOURS && views_per_hour > EARLY_VIEWS_PER_HOUR {
        score += 30;
    }

    let potential_score = score.min(100);
    let tier = GrowthTier::from_score(potential_score);

    Some(GrowthPrediction {
        potential_score,
        predicted_24h_views: predicted_views.round() as u64,
        predicted_24h_engagement: predicted_engagement.round() as u64,
        views_per_hour: (views_per_hour * 100.0).round() / 100.0,
        tier,
        recommendation: tier.recommendation().to_string(),
    })
}

/// Summarise a keyword field report
pub fn keyword_insights(report: &KeywordReport) -> Vec<String> {
    if report.combined.is_empty() {
        return vec!["No keywords to analyze".to_string()];
    }

    let mut insights = Vec::new();

    let top: Vec<&str> = report
        .combined
        .iter()
        .take(5)
        .map(|entry| entry.keyword.as_str())
        .collect();
    insights.push(format!("🔍 Most popular keywords: {}", top.join(", ")));

    let description_top: Vec<&str> = report
        .description_keywords
        .iter()
        .take(10)
        .map(|entry| entry.keyword.as_str())
        .collect();
    let shared: Vec<&str> = report
        .title_keywords
        .iter()
        .take(10)
        .map(|entry| entry.keyword.as_str())
        .filter(|keyword| description_top.contains(keyword))
        .take(3)
        .collect();
    if !shared.is_empty() {
        insights.push(format!(
            "💡 Core keywords used in both titles and descriptions: {}",
            shared.join(", ")
        ));
    }

    if !report.top_tags.is_empty() {
        let total: usize = report.top_tags.iter().map(|tag| tag.count).sum();
        let average = total as f64 / report.top_tags.len() as f64;
        insights.push(format!("🏷️ Average tag frequency: {:.1}", average));
    }

    insights
}
