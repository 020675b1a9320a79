use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::info;
use viral_core::{ChannelDirectory, Normalizer, RawVideoRecord, RejectedRecord, VideoRecord};

use crate::classifier::{Classifier, Ranking, ScoredVideo};
use crate::config::Config;
use crate::insights::{keyword_insights, predict_growth, viral_insights, GrowthPrediction};
use crate::keywords::{KeywordEntry, KeywordExtractor, KeywordReport};
use crate::scoring::ScoreEngine;
use crate::trends::{analyze_upload_trends, keyword_trends, KeywordTrend, TrendPeriod, UploadTrends};

/// Score every record and rank the batch
pub fn score_and_rank(records: &[VideoRecord], now: DateTime<Utc>, config: &Config) -> Ranking {
    let engine = ScoreEngine::new(config.scoring.clone());
    Classifier::from_config(&config.classifier).classify(engine.score_batch(records, now))
}

/// Top `top_n` keywords across the batch
pub fn extract_keywords(
    records: &[VideoRecord],
    top_n: usize,
    config: &Config,
) -> Vec<KeywordEntry> {
    KeywordExtractor::new(config.keywords.clone()).extract(records, top_n)
}

/// One ranked video with its explanations
#[derive(Debug, Clone, Serialize)]
pub struct VideoAnalysis {
    #[serde(flatten)]
    pub scored: ScoredVideo,
    pub insights: Vec<String>,
    pub growth: Option<GrowthPrediction>,
}

/// Full result of analysing one batch
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub viral_threshold: u32,
    pub total_records: usize,
    pub rejected: Vec<RejectedRecord>,

    /// Every accepted video in rank order
    pub ranked: Vec<VideoAnalysis>,

    /// Ids of the viral videos in rank order
    pub viral_videos: Vec<String>,
    pub keywords: Vec<KeywordEntry>,
    pub field_report: KeywordReport,
    pub keyword_insights: Vec<String>,
    pub upload_trends: Option<UploadTrends>,
    pub trend_period: TrendPeriod,
    pub keyword_trends: Vec<KeywordTrend>,
    pub processing_time: Duration,
}

impl AnalysisReport {
    /// Drop the non-viral videos from the ranked list
    pub fn retain_viral(&mut self) {
        self.ranked.retain(|video| video.scored.is_viral);
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Write the report as JSON
    pub async fn save<P: AsRef<Path>>(&self, path: P, pretty: bool) -> Result<()> {
        tokio::fs::write(path.as_ref(), self.to_json(pretty)?).await?;
        info!("💾 Report saved to: {}", path.as_ref().display());
        Ok(())
    }
}

/// Normalization, scoring, classification, keywords and trends over one batch
pub struct ViralAnalyzer {
    config: Config,
    engine: ScoreEngine,
    classifier: Classifier,
    extractor: KeywordExtractor,
    trend_period: TrendPeriod,
}

impl ViralAnalyzer {
    pub fn new(config: Config) -> Self {
        info!("🔧 Initializing ViralAnalyzer (threshold {})", config.classifier.viral_threshold);

        let extractor = KeywordExtractor::new(config.keywords.clone());
        info!("🔤 Keyword segmentation: {}", extractor.segmenter_name());

        Self {
            engine: ScoreEngine::new(config.scoring.clone()),
            classifier: Classifier::from_config(&config.classifier),
            extractor,
            trend_period: TrendPeriod::default(),
            config,
        }
    }

    pub fn with_trend_period(mut self, period: TrendPeriod) -> Self {
        self.trend_period = period;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn extractor(&self) -> &KeywordExtractor {
        &self.extractor
    }

    /// Analyse a raw batch as of `now`. Invalid records are reported, never fatal.
    pub fn analyze(
        &self,
        raw: &[RawVideoRecord],
        channels: &ChannelDirectory,
        now: DateTime<Utc>,
    ) -> AnalysisReport {
        let start_time = Instant::now();
        info!("🚀 Analyzing {} videos...", raw.len());

        let batch = Normalizer::new(now)
            .with_channels(channels)
            .with_subscriber_share(self.config.scoring.subscriber_view_share)
            .normalize_batch(raw);
        info!(
            "✅ {} videos accepted, {} rejected",
            batch.records.len(),
            batch.rejected.len()
        );

        let records = batch.records;
        let ranking = self
            .classifier
            .classify(self.engine.score_batch(&records, now));
        let viral_threshold = ranking.threshold();
        let viral_videos = ranking
            .viral_only()
            .map(|video| video.record.video_id.clone())
            .collect();

        let (ranked, _) = ranking.into_parts();
        let ranked = ranked
            .into_iter()
            .map(|scored| self.explain(scored, now))
            .collect();

        let keywords = self
            .extractor
            .extract(&records, self.config.keywords.top_n_keywords);
        let field_report = self.extractor.analyze_fields(&records);
        let keyword_insights = keyword_insights(&field_report);
        info!("🔤 Extracted {} keywords", keywords.len());

        let upload_trends = analyze_upload_trends(&records);
        let keyword_trends = keyword_trends(&records, self.trend_period, &self.extractor);

        let processing_time = start_time.elapsed();
        info!("🎉 Analysis completed in {:.2}s", processing_time.as_secs_f64());

        AnalysisReport {
            generated_at: now,
            viral_threshold,
            total_records: raw.len(),
            rejected: batch.rejected,
            ranked,
            viral_videos,
            keywords,
            field_report,
            keyword_insights,
            upload_trends,
            trend_period: self.trend_period,
            keyword_trends,
            processing_time,
        }
    }

    fn explain(&self, scored: ScoredVideo, now: DateTime<Utc>) -> VideoAnalysis {
        let insights = viral_insights(&scored, &self.config.scoring);
        let growth = predict_growth(
            &scored.record,
            scored.record.hours_since_published(now),
            &self.config.scoring,
        );
        VideoAnalysis {
            scored,
            insights,
            growth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use chrono::{Duration as ChronoDuration, TimeZone};
    use viral_core::RawCount;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn raw(id: &str, views: i64, likes: i64, hours_ago: i64) -> RawVideoRecord {
        RawVideoRecord {
            video_id: Some(id.to_string()),
            title: Some(format!("{} cooking recipe", id)),
            published_at: Some((now() - ChronoDuration::hours(hours_ago)).to_rfc3339()),
            view_count: Some(RawCount::from(views)),
            like_count: Some(RawCount::from(likes)),
            ..RawVideoRecord::default()
        }
    }

    #[test]
    fn test_score_and_rank_entry_point() {
        let records = vec![
            VideoRecord::new("slow".to_string(), now() - ChronoDuration::days(30), 1_000, 5),
            VideoRecord::new("hit".to_string(), now() - ChronoDuration::days(1), 50_000, 2_500)
                .with_comment_count(100),
        ];

        let (ranked, viral) = score_and_rank(&records, now(), &Config::default()).into_parts();
        assert_eq!(ranked[0].record.video_id, "hit");
        assert_eq!(viral.len(), 1);
        assert_eq!(viral[0].record.video_id, "hit");
    }

    #[test]
    fn test_extract_keywords_entry_point() {
        let records = vec![VideoRecord::new("a".to_string(), now(), 10, 1)
            .with_title("Garlic noodles, garlic butter".to_string())];

        let keywords = extract_keywords(&records, 1, &Config::default());
        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords[0].keyword, "garlic");
        assert_eq!(keywords[0].count, 2);
    }

    #[test]
    fn test_analyze_batch() {
        let analyzer = ViralAnalyzer::new(ConfigBuilder::new().with_viral_threshold(50).build());
        let batch = vec![
            raw("hit", 40_000, 2_000, 3),
            raw("quiet", 500, 2, 24 * 40),
            raw("broken", 0, 0, 5),
        ];

        let report = analyzer.analyze(&batch, &ChannelDirectory::new(), now());

        assert_eq!(report.total_records, 3);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].index, 2);
        assert_eq!(report.ranked.len(), 2);
        assert_eq!(report.ranked[0].scored.record.video_id, "hit");
        assert_eq!(report.viral_videos, vec!["hit".to_string()]);
        assert!(report.ranked[0].growth.is_some());
        assert!(report.keywords.iter().any(|k| k.keyword == "cooking"));
        assert!(report.upload_trends.is_some());
    }

    #[test]
    fn test_retain_viral_and_json() {
        let analyzer = ViralAnalyzer::new(Config::default());
        let batch = vec![raw("quiet", 500, 2, 24 * 40)];

        let mut report = analyzer.analyze(&batch, &ChannelDirectory::new(), now());
        report.retain_viral();
        assert!(report.ranked.is_empty());

        let json: serde_json::Value =
            serde_json::from_str(&report.to_json(false).unwrap()).unwrap();
        assert_eq!(json["viral_threshold"], 70);
        assert_eq!(json["trend_period"], "daily");
    }
}
