//! Raw record validation and normalization

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use tracing::{debug, warn};

use crate::channel::ChannelDirectory;
use crate::record::{RawCount, RawVideoRecord, VideoRecord};
use crate::ValidationError;

/// Default share of subscribers assumed to watch a typical upload
pub const DEFAULT_SUBSCRIBER_VIEW_SHARE: f64 = 0.1;

/// A raw record excluded from scoring, with the reason
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRecord {
    /// Position of the record in the input batch
    pub index: usize,
    pub video_id: Option<String>,
    #[serde(rename = "reason", serialize_with = "display")]
    pub error: ValidationError,
}

fn display<S: Serializer>(error: &ValidationError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Output of normalizing a whole batch
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    pub records: Vec<VideoRecord>,
    pub rejected: Vec<RejectedRecord>,
}

/// Converts raw fetched metadata into validated [`VideoRecord`]s
#[derive(Debug, Clone)]
pub struct Normalizer<'a> {
    fetched_at: DateTime<Utc>,
    channels: Option<&'a ChannelDirectory>,
    subscriber_share: f64,
}

impl<'a> Normalizer<'a> {
    /// `fetched_at` bounds publish timestamps from above
    pub fn new(fetched_at: DateTime<Utc>) -> Self {
        Self {
            fetched_at,
            channels: None,
            subscriber_share: DEFAULT_SUBSCRIBER_VIEW_SHARE,
        }
    }

    /// Resolve missing channel averages through a channel directory
    pub fn with_channels(mut self, channels: &'a ChannelDirectory) -> Self {
        self.channels = Some(channels);
        self
    }

    pub fn with_subscriber_share(mut self, share: f64) -> Self {
        self.subscriber_share = share;
        self
    }

    /// Validate one raw record
    pub fn normalize(&self, raw: &RawVideoRecord) -> Result<VideoRecord, ValidationError> {
        let video_id = raw
            .video_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(ValidationError::MissingField("video_id"))?
            .to_string();

        let view_count = required_count(raw.view_count.as_ref(), "view_count")?;
        let like_count = required_count(raw.like_count.as_ref(), "like_count")?;
        let comment_count = match raw.comment_count.as_ref() {
            Some(count) => count.to_u64("comment_count")?,
            None => 0,
        };

        if view_count == 0 {
            return Err(ValidationError::ZeroViews);
        }

        let published_at = self.parse_published_at(raw.published_at.as_deref())?;

        let channel_average_views = raw
            .channel_average_views
            .filter(|avg| avg.is_finite() && *avg > 0.0)
            .or_else(|| {
                let channel_id = raw.channel_id.as_deref()?;
                self.channels?
                    .expected_views(channel_id, self.subscriber_share)
            });

        Ok(VideoRecord {
            video_id,
            title: raw.title.clone().unwrap_or_default(),
            description: raw.description.clone().unwrap_or_default(),
            tags: raw.tags.clone().unwrap_or_default(),
            published_at,
            view_count,
            like_count,
            comment_count,
            channel_id: raw.channel_id.clone(),
            category_id: raw.category_id.clone(),
            channel_average_views,
        })
    }

    /// Validate a batch. Failures are collected, never fatal.
    pub fn normalize_batch(&self, raws: &[RawVideoRecord]) -> NormalizedBatch {
        let mut batch = NormalizedBatch::default();

        for (index, raw) in raws.iter().enumerate() {
            match self.normalize(raw) {
                Ok(record) => {
                    debug!("Normalized video {}", record.video_id);
                    batch.records.push(record);
                }
                Err(error) => {
                    warn!(
                        "Excluding record #{} ({}): {}",
                        index,
                        raw.video_id.as_deref().unwrap_or("unknown"),
                        error
                    );
                    batch.rejected.push(RejectedRecord {
                        index,
                        video_id: raw.video_id.clone(),
                        error,
                    });
                }
            }
        }

        batch
    }

    fn parse_published_at(&self, value: Option<&str>) -> Result<DateTime<Utc>, ValidationError> {
        let value = value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(ValidationError::MissingField("published_at"))?;

        let published_at = DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| ValidationError::InvalidTimestamp(value.to_string()))?;

        if published_at > self.fetched_at {
            return Err(ValidationError::PublishedInFuture {
                published_at: published_at.to_rfc3339(),
                fetched_at: self.fetched_at.to_rfc3339(),
            });
        }

        Ok(published_at)
    }
}

fn required_count(count: Option<&RawCount>, field: &'static str) -> Result<u64, ValidationError> {
    count
        .ok_or(ValidationError::MissingField(field))?
        .to_u64(field)
}
