use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the Viral Analyzer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Score engine constants
    pub scoring: ScoringConfig,

    /// Viral classification settings
    pub classifier: ClassifierConfig,

    /// Keyword extraction settings
    pub keywords: KeywordConfig,

    /// Output and logging settings
    pub output: OutputConfig,
}

/// Saturation and ceiling constants for the four sub-scores and the channel bonus.
///
/// The defaults work for typical view-count ranges; none of them carries a
/// meaning beyond that.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Views per day that earn the full daily-views sub-score
    pub daily_views_saturation: f64,

    /// Like/view ratio that earns the full like-ratio sub-score
    pub like_ratio_ceiling: f64,

    /// Comment/view ratio that earns the full comment-ratio sub-score
    pub comment_ratio_ceiling: f64,

    /// (likes + weighted comments)/view ratio that earns the full engagement sub-score
    pub engagement_ceiling: f64,

    /// Weight of one comment relative to one like in the engagement ratio
    pub engagement_comment_weight: f64,

    /// Maximum channel-performance bonus
    pub channel_bonus_cap: f64,

    /// Views/channel-average ratio that must be exceeded before any bonus applies
    pub channel_bonus_min_ratio: f64,

    /// Bonus points per unit of ratio above 1
    pub channel_bonus_scale: f64,

    /// Share of subscribers assumed to watch a typical upload when the
    /// channel average has to be estimated from subscribers
    pub subscriber_view_share: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Minimum total score (inclusive) for a video to count as viral
    pub viral_threshold: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    /// Tokens shorter than this many characters are dropped
    pub min_keyword_length: usize,

    /// Tokens longer than this many characters are dropped
    pub max_keyword_length: usize,

    /// Number of keywords reported for display
    pub top_n_keywords: usize,

    /// Hangul share of letters above which text is treated as Korean
    pub korean_ratio_threshold: f64,

    /// Use morphological segmentation for Korean text when available
    pub use_morphology: bool,

    /// Particle/ending lexicon for the morphological segmenter
    pub morphology_dictionary: Option<PathBuf>,

    /// Additional stopwords, `[korean]` / `[english]` sections
    pub stopwords_file: Option<PathBuf>,

    /// Weight of title occurrences in the combined field report
    pub title_weight: usize,

    /// Weight of description occurrences in the combined field report
    pub description_weight: usize,

    /// Weight of tag occurrences in the combined field report
    pub tag_weight: usize,

    /// Keywords kept per field in the field report
    pub field_top_n: usize,

    /// Raw tags kept in the field report
    pub top_tags: usize,

    /// Keywords kept per period in keyword trends
    pub trend_top_n: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Log level
    pub log_level: String,

    /// Pretty-print the JSON report
    pub pretty_json: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            daily_views_saturation: 10_000.0,
            like_ratio_ceiling: 0.02,
            comment_ratio_ceiling: 0.001,
            engagement_ceiling: 0.03,
            engagement_comment_weight: 1.0,
            channel_bonus_cap: 20.0,
            channel_bonus_min_ratio: 2.0,
            channel_bonus_scale: 5.0,
            subscriber_view_share: 0.1,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self { viral_threshold: 70 }
    }
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            min_keyword_length: 2,
            max_keyword_length: 20,
            top_n_keywords: 50,
            korean_ratio_threshold: 0.3,
            use_morphology: true,
            morphology_dictionary: None,
            stopwords_file: None,
            title_weight: 3,
            description_weight: 1,
            tag_weight: 2,
            field_top_n: 30,
            top_tags: 20,
            trend_top_n: 10,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            pretty_json: true,
        }
    }
}

impl Config {
    /// Load configuration from the first readable file on the search path,
    /// falling back to defaults plus environment overrides
    pub fn load() -> Result<Self> {
        for path in Self::search_paths() {
            if let Ok(config_str) = std::fs::read_to_string(&path) {
                match toml::from_str::<Config>(&config_str) {
                    Ok(config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path.display());
                        return Ok(config.with_env_overrides());
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
                    }
                }
            }
        }

        Self::from_env()
    }

    /// Locations `load` tries, in order. The per-user file is only
    /// searched when `HOME` is set.
    pub fn search_paths() -> Vec<PathBuf> {
        search_paths_for(std::env::var_os("HOME").map(PathBuf::from))
    }

    /// Load configuration from an explicit file
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        tracing::info!("📄 Loaded configuration from: {}", path.display());
        Ok(config.with_env_overrides())
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self::default().with_env_overrides())
    }

    /// Apply environment variable overrides on top of this configuration
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(threshold) = std::env::var("VIRAL_ANALYZER_THRESHOLD") {
            self.classifier.viral_threshold =
                threshold.parse().unwrap_or(self.classifier.viral_threshold);
        }

        if let Ok(top_n) = std::env::var("VIRAL_ANALYZER_TOP_KEYWORDS") {
            self.keywords.top_n_keywords = top_n.parse().unwrap_or(self.keywords.top_n_keywords);
        }

        if let Ok(min_len) = std::env::var("VIRAL_ANALYZER_MIN_KEYWORD_LENGTH") {
            self.keywords.min_keyword_length =
                min_len.parse().unwrap_or(self.keywords.min_keyword_length);
        }

        if let Ok(log_level) = std::env::var("VIRAL_ANALYZER_LOG_LEVEL") {
            self.output.log_level = log_level;
        }

        self
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path.as_ref().display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let scoring = &self.scoring;

        let positive = [
            ("daily_views_saturation", scoring.daily_views_saturation),
            ("like_ratio_ceiling", scoring.like_ratio_ceiling),
            ("comment_ratio_ceiling", scoring.comment_ratio_ceiling),
            ("engagement_ceiling", scoring.engagement_ceiling),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(anyhow!("{} must be a positive number, got {}", name, value));
            }
        }

        let non_negative = [
            ("engagement_comment_weight", scoring.engagement_comment_weight),
            ("channel_bonus_cap", scoring.channel_bonus_cap),
            ("channel_bonus_min_ratio", scoring.channel_bonus_min_ratio),
            ("channel_bonus_scale", scoring.channel_bonus_scale),
            ("subscriber_view_share", scoring.subscriber_view_share),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(anyhow!("{} must not be negative, got {}", name, value));
            }
        }

        // Keyword settings
        if self.keywords.min_keyword_length == 0 {
            return Err(anyhow!("min_keyword_length must be greater than 0"));
        }

        if self.keywords.max_keyword_length < self.keywords.min_keyword_length {
            return Err(anyhow!(
                "max_keyword_length ({}) must not be below min_keyword_length ({})",
                self.keywords.max_keyword_length,
                self.keywords.min_keyword_length
            ));
        }

        if self.keywords.top_n_keywords == 0 {
            return Err(anyhow!("top_n_keywords must be greater than 0"));
        }

        if !(0.0..=1.0).contains(&self.keywords.korean_ratio_threshold) {
            return Err(anyhow!(
                "korean_ratio_threshold must be within 0..=1, got {}",
                self.keywords.korean_ratio_threshold
            ));
        }

        tracing::info!("✅ Configuration validation passed");
        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Viral Analyzer Configuration:\n\
            - Viral Threshold: {}\n\
            - Daily Views Saturation: {}\n\
            - Like/Comment/Engagement Ceilings: {} / {} / {}\n\
            - Channel Bonus Cap: {}\n\
            - Keywords: top {} (min length {})\n\
            - Morphology Enabled: {}",
            self.classifier.viral_threshold,
            self.scoring.daily_views_saturation,
            self.scoring.like_ratio_ceiling,
            self.scoring.comment_ratio_ceiling,
            self.scoring.engagement_ceiling,
            self.scoring.channel_bonus_cap,
            self.keywords.top_n_keywords,
            self.keywords.min_keyword_length,
            self.keywords.use_morphology,
        )
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_viral_threshold(mut self, threshold: u32) -> Self {
        self.config.classifier.viral_threshold = threshold;
        self
    }

    pub fn with_daily_views_saturation(mut self, saturation: f64) -> Self {
        self.config.scoring.daily_views_saturation = saturation;
        self
    }

    pub fn with_like_ratio_ceiling(mut self, ceiling: f64) -> Self {
        self.config.scoring.like_ratio_ceiling = ceiling;
        self
    }

    pub fn with_comment_ratio_ceiling(mut self, ceiling: f64) -> Self {
        self.config.scoring.comment_ratio_ceiling = ceiling;
        self
    }

    pub fn with_engagement_ceiling(mut self, ceiling: f64) -> Self {
        self.config.scoring.engagement_ceiling = ceiling;
        self
    }

    pub fn with_channel_bonus_cap(mut self, cap: f64) -> Self {
        self.config.scoring.channel_bonus_cap = cap;
        self
    }

    pub fn with_min_keyword_length(mut self, length: usize) -> Self {
        self.config.keywords.min_keyword_length = length;
        self
    }

    pub fn with_top_n_keywords(mut self, top_n: usize) -> Self {
        self.config.keywords.top_n_keywords = top_n;
        self
    }

    pub fn enable_morphology(mut self, enable: bool) -> Self {
        self.config.keywords.use_morphology = enable;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn search_paths_for(home: Option<PathBuf>) -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("viral-analyzer.toml"),
        PathBuf::from("config/viral-analyzer.toml"),
    ];
    if let Some(home) = home {
        paths.push(home.join(".config/viral-analyzer/config.toml"));
    }
    paths.push(PathBuf::from("/etc/viral-analyzer/config.toml"));
    paths
}
