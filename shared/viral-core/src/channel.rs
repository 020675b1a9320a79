//! Channel statistics used for the channel-performance bonus

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use crate::record::RawCount;

/// Aggregate statistics for one channel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelStats {
    #[serde(alias = "id", alias = "channelId")]
    pub channel_id: String,

    #[serde(alias = "subscriberCount", deserialize_with = "lenient_count")]
    pub subscriber_count: Option<u64>,

    #[serde(alias = "videoCount", deserialize_with = "lenient_count")]
    pub video_count: Option<u64>,

    /// Lifetime views across all of the channel's videos
    #[serde(alias = "viewCount", alias = "view_count", deserialize_with = "lenient_count")]
    pub total_view_count: Option<u64>,

    /// Historical average views per video, when the collaborator knows it
    #[serde(alias = "averageViews")]
    pub average_views: Option<f64>,
}

impl ChannelStats {
    pub fn new(channel_id: String) -> Self {
        Self {
            channel_id,
            ..Self::default()
        }
    }

    pub fn with_average_views(mut self, average_views: f64) -> Self {
        self.average_views = Some(average_views);
        self
    }

    pub fn with_totals(mut self, total_view_count: u64, video_count: u64) -> Self {
        self.total_view_count = Some(total_view_count);
        self.video_count = Some(video_count);
        self
    }

    pub fn with_subscribers(mut self, subscriber_count: u64) -> Self {
        self.subscriber_count = Some(subscriber_count);
        self
    }

    /// Views a typical video of this channel is expected to reach.
    ///
    /// Resolution order: the explicit average, then lifetime views divided by
    /// video count, then `subscriber_share` of the subscriber count. Returns
    /// `None` when nothing positive is known.
    pub fn expected_views(&self, subscriber_share: f64) -> Option<f64> {
        if let Some(avg) = self.average_views.filter(|a| a.is_finite() && *a > 0.0) {
            return Some(avg);
        }

        if let (Some(total), Some(videos)) = (self.total_view_count, self.video_count) {
            if total > 0 && videos > 0 {
                return Some(total as f64 / videos as f64);
            }
        }

        match self.subscriber_count {
            Some(subs) if subs > 0 && subscriber_share > 0.0 => {
                Some(subs as f64 * subscriber_share)
            }
            _ => None,
        }
    }
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawCount>::deserialize(deserializer)?;
    raw.map(|count| count.to_u64("channel statistic"))
        .transpose()
        .map_err(serde::de::Error::custom)
}

/// Channel statistics keyed by channel identifier
#[derive(Debug, Clone, Default)]
pub struct ChannelDirectory {
    channels: HashMap<String, ChannelStats>,
}

impl ChannelDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, stats: ChannelStats) {
        self.channels.insert(stats.channel_id.clone(), stats);
    }

    /// Add every channel of `other`, replacing entries with the same id
    pub fn merge(&mut self, other: ChannelDirectory) {
        self.channels.extend(other.channels);
    }

    pub fn get(&self, channel_id: &str) -> Option<&ChannelStats> {
        self.channels.get(channel_id)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Expected views for a channel, see [`ChannelStats::expected_views`]
    pub fn expected_views(&self, channel_id: &str, subscriber_share: f64) -> Option<f64> {
        self.get(channel_id)
            .and_then(|stats| stats.expected_views(subscriber_share))
    }
}

impl FromIterator<ChannelStats> for ChannelDirectory {
    fn from_iter<I: IntoIterator<Item = ChannelStats>>(iter: I) -> Self {
        let mut directory = Self::new();
        for stats in iter {
            directory.insert(stats);
        }
        directory
    }
}
