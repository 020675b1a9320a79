//! Video record structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// A count as delivered by the platform API. Statistics arrive as JSON
/// numbers or as decimal strings depending on the endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCount {
    Number(serde_json::Number),
    Text(String),
}

impl RawCount {
    /// Interpret the count as a signed integer.
    pub fn to_i64(&self, field: &'static str) -> Result<i64, ValidationError> {
        let invalid = || ValidationError::InvalidCount {
            field,
            value: self.to_string(),
        };

        match self {
            RawCount::Number(n) => {
                if let Some(v) = n.as_i64() {
                    Ok(v)
                } else if let Some(v) = n.as_u64() {
                    i64::try_from(v).map_err(|_| invalid())
                } else {
                    match n.as_f64() {
                        Some(f) if f.is_finite() && f.fract() == 0.0 => Ok(f as i64),
                        _ => Err(invalid()),
                    }
                }
            }
            RawCount::Text(s) => s.trim().parse::<i64>().map_err(|_| invalid()),
        }
    }

    /// Interpret the count as a non-negative integer.
    pub fn to_u64(&self, field: &'static str) -> Result<u64, ValidationError> {
        let value = self.to_i64(field)?;
        u64::try_from(value).map_err(|_| ValidationError::NegativeCount { field, value })
    }
}

impl std::fmt::Display for RawCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawCount::Number(n) => write!(f, "{}", n),
            RawCount::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RawCount {
    fn from(value: i64) -> Self {
        RawCount::Number(value.into())
    }
}

impl From<&str> for RawCount {
    fn from(value: &str) -> Self {
        RawCount::Text(value.to_string())
    }
}

/// Video metadata as fetched, before validation. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawVideoRecord {
    #[serde(alias = "id", alias = "videoId")]
    pub video_id: Option<String>,

    pub title: Option<String>,

    pub description: Option<String>,

    pub tags: Option<Vec<String>>,

    /// RFC 3339 publish timestamp
    #[serde(alias = "publishedAt")]
    pub published_at: Option<String>,

    #[serde(alias = "viewCount")]
    pub view_count: Option<RawCount>,

    #[serde(alias = "likeCount")]
    pub like_count: Option<RawCount>,

    /// Absent when comments are disabled
    #[serde(alias = "commentCount")]
    pub comment_count: Option<RawCount>,

    #[serde(alias = "channelId")]
    pub channel_id: Option<String>,

    #[serde(alias = "categoryId")]
    pub category_id: Option<String>,

    /// Historical average views of the channel, when already known
    #[serde(alias = "channelAverageViews")]
    pub channel_average_views: Option<f64>,
}

/// Canonical video record. Counts are validated and defaults applied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoRecord {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub published_at: DateTime<Utc>,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub channel_id: Option<String>,
    pub category_id: Option<String>,

    /// `None` means the channel history is unknown, which is distinct from zero
    pub channel_average_views: Option<f64>,
}

impl VideoRecord {
    /// Create a record with the required fields; text is empty, comments zero.
    pub fn new(
        video_id: String,
        published_at: DateTime<Utc>,
        view_count: u64,
        like_count: u64,
    ) -> Self {
        Self {
            video_id,
            title: String::new(),
            description: String::new(),
            tags: Vec::new(),
            published_at,
            view_count,
            like_count,
            comment_count: 0,
            channel_id: None,
            category_id: None,
            channel_average_views: None,
        }
    }

    pub fn with_title(mut self, title: String) -> Self {
        self.title = title;
        self
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = description;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_comment_count(mut self, comment_count: u64) -> Self {
        self.comment_count = comment_count;
        self
    }

    pub fn with_channel(mut self, channel_id: String) -> Self {
        self.channel_id = Some(channel_id);
        self
    }

    pub fn with_category(mut self, category_id: String) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_channel_average_views(mut self, average_views: f64) -> Self {
        self.channel_average_views = Some(average_views);
        self
    }

    /// Whole days since publish, floored at 1 so same-day videos count as one day.
    pub fn age_in_days(&self, now: DateTime<Utc>) -> i64 {
        (now - self.published_at).num_days().max(1)
    }

    /// Fractional hours since publish, never negative.
    pub fn hours_since_published(&self, now: DateTime<Utc>) -> f64 {
        let seconds = (now - self.published_at).num_seconds().max(0);
        seconds as f64 / 3600.0
    }

    /// Title, description and tags joined into one text blob.
    pub fn text_blob(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(2 + self.tags.len());
        parts.push(&self.title);
        parts.push(&self.description);
        parts.extend(self.tags.iter().map(String::as_str));
        parts.retain(|p| !p.trim().is_empty());
        parts.join(" ")
    }
}
