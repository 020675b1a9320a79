//! JSON input documents handed over by the fetching collaborator

use serde::Deserialize;
use std::path::Path;

use crate::channel::{ChannelDirectory, ChannelStats};
use crate::record::RawVideoRecord;
use crate::Result;

/// One search result batch plus whatever channel statistics came with it
#[derive(Debug, Clone, Default)]
pub struct InputBatch {
    pub videos: Vec<RawVideoRecord>,
    pub channels: ChannelDirectory,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BatchDocument {
    Records(Vec<RawVideoRecord>),
    Bundle {
        videos: Vec<RawVideoRecord>,
        #[serde(default)]
        channels: Vec<ChannelStats>,
    },
}

/// Parse either a bare array of video records or an object with `videos`
/// and optional `channels`.
pub fn parse_batch(json: &str) -> Result<InputBatch> {
    let batch = match serde_json::from_str::<BatchDocument>(json)? {
        BatchDocument::Records(videos) => InputBatch {
            videos,
            channels: ChannelDirectory::new(),
        },
        BatchDocument::Bundle { videos, channels } => InputBatch {
            videos,
            channels: channels.into_iter().collect(),
        },
    };

    tracing::debug!(
        "Parsed batch with {} videos and {} channels",
        batch.videos.len(),
        batch.channels.len()
    );

    Ok(batch)
}

/// Parse an array of channel statistics
pub fn parse_channels(json: &str) -> Result<ChannelDirectory> {
    let channels: Vec<ChannelStats> = serde_json::from_str(json)?;
    Ok(channels.into_iter().collect())
}

impl InputBatch {
    /// Read and parse a batch document from disk
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        parse_batch(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_array() {
        let batch = parse_batch(r#"[{"video_id":"a"},{"video_id":"b"}]"#).unwrap();
        assert_eq!(batch.videos.len(), 2);
        assert!(batch.channels.is_empty());
    }

    #[test]
    fn test_parse_bundle_with_channels() {
        let batch = parse_batch(
            r#"{"videos":[{"video_id":"a","channel_id":"c"}],
                "channels":[{"channel_id":"c","average_views":250.0}]}"#,
        )
        .unwrap();

        assert_eq!(batch.videos.len(), 1);
        assert_eq!(batch.channels.expected_views("c", 0.1), Some(250.0));
    }

    #[test]
    fn test_parse_invalid_document() {
        assert!(parse_batch("{\"nothing\": true}").is_err());
        assert!(parse_batch("not json").is_err());
    }

    #[test]
    fn test_parse_channels() {
        let channels = parse_channels(r#"[{"id":"x","subscriberCount":"1000"}]"#).unwrap();
        assert_eq!(channels.expected_views("x", 0.1), Some(100.0));
    }
}
