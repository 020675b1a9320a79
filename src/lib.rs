/// Viral Analyzer - Rust Implementation
///
/// Virality scoring, viral classification and keyword extraction over
/// batches of video metadata.

pub mod analysis;
pub mod classifier;
pub mod config;
pub mod insights;
pub mod keywords;
pub mod scoring;
pub mod trends;

// Re-export main types for easy access
pub use crate::analysis::{
    extract_keywords, score_and_rank, AnalysisReport, VideoAnalysis, ViralAnalyzer,
};
pub use crate::classifier::{Classifier, Ranking, ScoredVideo};
pub use crate::config::{Config, ConfigBuilder};
pub use crate::insights::{
    keyword_insights, predict_growth, viral_insights, GrowthPrediction, GrowthTier,
};
pub use crate::keywords::{KeywordEntry, KeywordExtractor, KeywordReport, Language, Segmenter};
pub use crate::scoring::{ScoreCard, ScoreComponents, ScoreEngine, VideoMetrics};
pub use crate::trends::{
    analyze_upload_trends, keyword_trends, KeywordTrend, TrendPeriod, UploadTrends,
};

pub use viral_core::{ChannelDirectory, ChannelStats, RawVideoRecord, ValidationError, VideoRecord};
