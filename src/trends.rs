//! Upload timing and keyword trends over a batch

use anyhow::{anyhow, Result};
use chrono::{Datelike, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use viral_core::VideoRecord;

use crate::keywords::{KeywordEntry, KeywordExtractor};

const UNKNOWN_CATEGORY: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdayViews {
    pub weekday: Weekday,
    pub average_views: f64,
    pub video_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourViews {
    /// Publish hour in UTC
    pub hour: u32,
    pub average_views: f64,
    pub video_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub category_id: String,
    pub video_count: usize,
    pub average_views: f64,
    pub average_likes: f64,
    pub average_comments: f64,
}

/// When the batch's videos were published and how each slot performed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadTrends {
    /// Highest average views first
    pub weekday_views: Vec<WeekdayViews>,
    /// Highest average views first
    pub hourly_views: Vec<HourViews>,
    pub categories: Vec<CategoryStats>,
    pub overall_average_views: f64,
    pub best_upload_day: Weekday,
    pub best_upload_hour: u32,
}

#[derive(Default)]
struct Totals {
    videos: usize,
    // u128 so sums of u64 counts cannot overflow
    views: u128,
    likes: u128,
    comments: u128,
}

impl Totals {
    fn add(&mut self, record: &VideoRecord) {
        self.videos += 1;
        self.views += u128::from(record.view_count);
        self.likes += u128::from(record.like_count);
        self.comments += u128::from(record.comment_count);
    }

    fn average(&self, sum: u128) -> f64 {
        if self.videos == 0 {
            0.0
        } else {
            sum as f64 / self.videos as f64
        }
    }
}

/// Average views per publish weekday, publish hour and category.
/// `None` for an empty batch.
pub fn analyze_upload_trends(records: &[VideoRecord]) -> Option<UploadTrends> {
    if records.is_empty() {
        return None;
    }

    let mut weekdays: HashMap<Weekday, Totals> = HashMap::new();
    let mut hours: BTreeMap<u32, Totals> = BTreeMap::new();
    let mut categories: BTreeMap<String, Totals> = BTreeMap::new();
    let mut overall = Totals::default();

    for record in records {
        weekdays
            .entry(record.published_at.weekday())
            .or_default()
            .add(record);
        hours.entry(record.published_at.hour()).or_default().add(record);
        categories
            .entry(
                record
                    .category_id
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
            )
            .or_default()
            .add(record);
        overall.add(record);
    }

    let mut weekday_views: Vec<WeekdayViews> = weekdays
        .into_iter()
        .map(|(weekday, totals)| WeekdayViews {
            weekday,
            average_views: totals.average(totals.views),
            video_count: totals.videos,
        })
        .collect();
    weekday_views.sort_by(|a, b| {
        b.average_views.total_cmp(&a.average_views).then_with(|| {
            a.weekday
                .num_days_from_monday()
                .cmp(&b.weekday.num_days_from_monday())
        })
    });

    let mut hourly_views: Vec<HourViews> = hours
        .into_iter()
        .map(|(hour, totals)| HourViews {
            hour,
            average_views: totals.average(totals.views),
            video_count: totals.videos,
        })
        .collect();
    hourly_views.sort_by(|a, b| {
        b.average_views
            .total_cmp(&a.average_views)
            .then_with(|| a.hour.cmp(&b.hour))
    });

    let categories = categories
        .into_iter()
        .map(|(category_id, totals)| CategoryStats {
            category_id,
            video_count: totals.videos,
            average_views: totals.average(totals.views),
            average_likes: totals.average(totals.likes),
            average_comments: totals.average(totals.comments),
        })
        .collect();

    let best_upload_day = weekday_views.first()?.weekday;
    let best_upload_hour = hourly_views.first()?.hour;

    Some(UploadTrends {
        weekday_views,
        hourly_views,
        categories,
        overall_average_views: overall.average(overall.views),
        best_upload_day,
        best_upload_hour,
    })
}

/// Bucket size for keyword trends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendPeriod {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl TrendPeriod {
    /// Sortable bucket key of a record: `2024-05-01`, `2024-W18` (ISO week) or `2024-05`
    pub fn bucket_key(&self, record: &VideoRecord) -> String {
        let published = record.published_at;
        match self {
            TrendPeriod::Daily => published.format("%Y-%m-%d").to_string(),
            TrendPeriod::Weekly => {
                let week = published.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            TrendPeriod::Monthly => published.format("%Y-%m").to_string(),
        }
    }
}

impl fmt::Display for TrendPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TrendPeriod::Daily => "daily",
            TrendPeriod::Weekly => "weekly",
            TrendPeriod::Monthly => "monthly",
        };
        f.write_str(name)
    }
}

impl FromStr for TrendPeriod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "daily" | "day" => Ok(TrendPeriod::Daily),
            "weekly" | "week" => Ok(TrendPeriod::Weekly),
            "monthly" | "month" => Ok(TrendPeriod::Monthly),
            other => Err(anyhow!("Unknown trend period: {}", other)),
        }
    }
}

/// Top keywords of one period bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordTrend {
    pub period: String,
    pub video_count: usize,
    pub keywords: Vec<KeywordEntry>,
}

/// Combined field keywords per period, oldest period first
pub fn keyword_trends(
    records: &[VideoRecord],
    period: TrendPeriod,
    extractor: &KeywordExtractor,
) -> Vec<KeywordTrend> {
    let mut buckets: BTreeMap<String, Vec<&VideoRecord>> = BTreeMap::new();
    for record in records {
        buckets
            .entry(period.bucket_key(record))
            .or_default()
            .push(record);
    }

    let top_n = extractor.config().trend_top_n;
    buckets
        .into_iter()
        .map(|(key, group)| {
            let video_count = group.len();
            let mut keywords = extractor.analyze_fields(group).combined;
            keywords.truncate(top_n);
            KeywordTrend {
                period: key,
                video_count,
                keywords,
            }
        })
        .collect()
}
