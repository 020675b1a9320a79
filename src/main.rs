use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Arg, Command};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use viral_analyzer::{Config, TrendPeriod, ViralAnalyzer};
use viral_core::{parse_channels, InputBatch};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("Viral Analyzer")
        .version(env!("CARGO_PKG_VERSION"))
        .author("TigreRoll")
        .about("Virality scoring and keyword extraction for video metadata")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("FILE")
                .help("JSON file with video records")
                .required(true)
        )
        .arg(
            Arg::new("channels")
                .short('c')
                .long("channels")
                .value_name("FILE")
                .help("JSON file with channel statistics")
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("Configuration file (TOML)")
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Write the JSON report here instead of stdout")
        )
        .arg(
            Arg::new("threshold")
                .short('t')
                .long("threshold")
                .value_name("SCORE")
                .help("Minimum score for a video to count as viral")
                .value_parser(clap::value_parser!(u32))
        )
        .arg(
            Arg::new("top-keywords")
                .short('k')
                .long("top-keywords")
                .value_name("NUM")
                .help("Number of keywords to report")
                .value_parser(clap::value_parser!(usize))
        )
        .arg(
            Arg::new("now")
                .long("now")
                .value_name("RFC3339")
                .help("Reference time for video ages (defaults to the current time)")
        )
        .arg(
            Arg::new("trend-period")
                .long("trend-period")
                .value_name("PERIOD")
                .help("Bucket size for keyword trends")
                .value_parser(["daily", "weekly", "monthly"])
                .default_value("daily")
        )
        .arg(
            Arg::new("viral-only")
                .long("viral-only")
                .help("Only include viral videos in the ranked list")
                .action(clap::ArgAction::SetTrue)
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue)
        )
        .get_matches();

    let verbose = matches.get_flag("verbose");

    let mut config = match matches.get_one::<String>("config") {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_default(),
    };

    // Initialize logging
    let level = if verbose { "debug" } else { config.output.log_level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("viral_analyzer={level},viral_core={level},warn"))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if verbose {
        info!("Verbose logging enabled");
    }

    if let Some(threshold) = matches.get_one::<u32>("threshold") {
        config.classifier.viral_threshold = *threshold;
    }
    if let Some(top_n) = matches.get_one::<usize>("top-keywords") {
        config.keywords.top_n_keywords = *top_n;
    }
    config.validate()?;
    debug!("{}", config.summary());

    let now = match matches.get_one::<String>("now") {
        Some(value) => DateTime::parse_from_rfc3339(value)
            .with_context(|| format!("Invalid --now timestamp: {}", value))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let trend_period: TrendPeriod = matches
        .get_one::<String>("trend-period")
        .map(|period| period.parse::<TrendPeriod>())
        .transpose()?
        .unwrap_or_default();

    let input = matches
        .get_one::<String>("input")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("--input is required"))?;

    info!("🚀 Viral Analyzer starting...");
    info!("📁 Input: {}", input.display());

    let mut batch = InputBatch::from_file(&input)
        .await
        .with_context(|| format!("Failed to read input {}", input.display()))?;

    if let Some(path) = matches.get_one::<String>("channels") {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read channel statistics {}", path))?;
        let channels = parse_channels(&content)?;
        info!("📺 Loaded statistics for {} channels", channels.len());
        batch.channels.merge(channels);
    }

    if batch.videos.is_empty() {
        warn!("Input contains no videos");
    }

    let pretty = config.output.pretty_json;
    let analyzer = ViralAnalyzer::new(config).with_trend_period(trend_period);
    let mut report = analyzer.analyze(&batch.videos, &batch.channels, now);

    if matches.get_flag("viral-only") {
        report.retain_viral();
    }

    info!("🔥 Viral videos: {}", report.viral_videos.len());
    info!("❌ Rejected records: {}", report.rejected.len());

    match matches.get_one::<String>("output") {
        Some(path) => report.save(path, pretty).await?,
        None => println!("{}", report.to_json(pretty)?),
    }

    Ok(())
}
