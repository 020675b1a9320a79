use chrono::{TimeZone, Utc};
use tempfile::TempDir;
use tokio::fs;
use viral_core::{
    parse_batch, ChannelStats, InputBatch, Normalizer, RawCount, RawVideoRecord, ValidationError,
    ViralCoreError,
};

const BATCH_JSON: &str = r#"{
    "videos": [
        {
            "videoId": "good",
            "title": "오늘의 요리 레시피",
            "description": "쉬운 김치찌개 만들기",
            "tags": ["요리", "김치찌개"],
            "publishedAt": "2024-05-30T10:00:00Z",
            "viewCount": "25000",
            "likeCount": "1200",
            "commentCount": "80",
            "channelId": "chan-1"
        },
        {
            "videoId": "no-likes",
            "publishedAt": "2024-05-30T10:00:00Z",
            "viewCount": "500"
        },
        {
            "videoId": "comments-off",
            "publishedAt": "2024-05-01T00:00:00Z",
            "viewCount": 900,
            "likeCount": 30
        }
    ],
    "channels": [
        { "channelId": "chan-1", "subscriberCount": "100000" }
    ]
}"#;

#[tokio::test]
async fn test_batch_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("batch.json");
    fs::write(&path, BATCH_JSON).await.unwrap();

    let batch = InputBatch::from_file(&path).await.unwrap();

    assert_eq!(batch.videos.len(), 3);
    assert_eq!(batch.channels.len(), 1);
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = InputBatch::from_file(temp_dir.path().join("absent.json")).await;

    assert!(matches!(result, Err(ViralCoreError::Io(_))));
}

#[test]
fn test_normalize_batch_end_to_end() {
    let batch = parse_batch(BATCH_JSON).unwrap();
    let fetched_at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

    let normalized = Normalizer::new(fetched_at)
        .with_channels(&batch.channels)
        .normalize_batch(&batch.videos);

    assert_eq!(normalized.records.len(), 2);
    assert_eq!(normalized.rejected.len(), 1);
    assert_eq!(
        normalized.rejected[0].error,
        ValidationError::MissingField("like_count")
    );

    let good = &normalized.records[0];
    assert_eq!(good.video_id, "good");
    assert_eq!(good.view_count, 25_000);
    assert_eq!(good.comment_count, 80);
    assert_eq!(good.tags, vec!["요리".to_string(), "김치찌개".to_string()]);
    // 10% of 100k subscribers
    assert_eq!(good.channel_average_views, Some(10_000.0));

    let comments_off = &normalized.records[1];
    assert_eq!(comments_off.comment_count, 0);
    assert_eq!(comments_off.channel_average_views, None);
}

#[test]
fn test_subscriber_share_is_configurable() {
    let batch = parse_batch(BATCH_JSON).unwrap();
    let fetched_at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

    let normalized = Normalizer::new(fetched_at)
        .with_channels(&batch.channels)
        .with_subscriber_share(0.5)
        .normalize_batch(&batch.videos);

    assert_eq!(normalized.records[0].channel_average_views, Some(50_000.0));
}

#[test]
fn test_rejected_record_serializes_reason() {
    let fetched_at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let raw = RawVideoRecord {
        video_id: Some("zero".to_string()),
        published_at: Some("2024-05-01T00:00:00Z".to_string()),
        view_count: Some(RawCount::from(0)),
        like_count: Some(RawCount::from(0)),
        ..RawVideoRecord::default()
    };

    let normalized = Normalizer::new(fetched_at).normalize_batch(&[raw]);
    let json = serde_json::to_value(&normalized.rejected[0]).unwrap();

    assert_eq!(json["index"], 0);
    assert_eq!(json["video_id"], "zero");
    assert_eq!(json["reason"], "video has zero views");
}

#[test]
fn test_channel_stats_builder() {
    let stats = ChannelStats::new("c".to_string()).with_subscribers(0);
    assert_eq!(stats.expected_views(0.1), None);
}
