use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;
use viral_core::VideoRecord;

use super::extractor::{KeywordEntry, KeywordExtractor, KeywordFrequencies};

/// A raw tag and how many videos carry it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Keyword breakdown by metadata field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordReport {
    pub title_keywords: Vec<KeywordEntry>,
    pub description_keywords: Vec<KeywordEntry>,
    pub top_tags: Vec<TagCount>,

    /// Title, description and tag counts merged with per-field weights
    pub combined: Vec<KeywordEntry>,
    pub total_videos_analyzed: usize,
}

impl KeywordExtractor {
    /// Break keyword usage down by title, description and tags
    pub fn analyze_fields<'a, I>(&self, records: I) -> KeywordReport
    where
        I: IntoIterator<Item = &'a VideoRecord>,
    {
        let config = self.config();
        let mut titles = KeywordFrequencies::new();
        let mut descriptions = KeywordFrequencies::new();
        let mut tags: HashMap<String, usize> = HashMap::new();
        let mut total = 0;

        for record in records {
            total += 1;
            titles.merge(&self.text_frequencies(&record.title));
            descriptions.merge(&self.text_frequencies(&record.description));

            for tag in &record.tags {
                let tag = tag.trim().to_lowercase();
                if !tag.is_empty() {
                    *tags.entry(tag).or_insert(0) += 1;
                }
            }
        }

        let title_keywords = titles.top(config.field_top_n);
        let description_keywords = descriptions.top(config.field_top_n);
        let top_tags = rank_tags(tags, config.top_tags);

        let mut combined = KeywordFrequencies::new();
        for entry in &title_keywords {
            combined.add(entry.keyword.clone(), entry.language, entry.count * config.title_weight);
        }
        for entry in &description_keywords {
            combined.add(
                entry.keyword.clone(),
                entry.language,
                entry.count * config.description_weight,
            );
        }
        for tag in &top_tags {
            combined.add(
                tag.tag.clone(),
                self.detect_language(&tag.tag),
                tag.count * config.tag_weight,
            );
        }

        debug!(
            "Field report over {} videos: {} title / {} description keywords, {} tags",
            total,
            title_keywords.len(),
            description_keywords.len(),
            top_tags.len()
        );

        KeywordReport {
            title_keywords,
            description_keywords,
            top_tags,
            combined: combined.top(config.top_n_keywords),
            total_videos_analyzed: total,
        }
    }
}

fn rank_tags(tags: HashMap<String, usize>, limit: usize) -> Vec<TagCount> {
    let mut ranked: Vec<TagCount> = tags
        .into_iter()
        .map(|(tag, count)| TagCount { tag, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeywordConfig;
    use crate::keywords::Language;
    use chrono::{TimeZone, Utc};

    fn video(title: &str, description: &str, tags: &[&str]) -> VideoRecord {
        VideoRecord::new(
            "v".to_string(),
            Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
            100,
            1,
        )
        .with_title(title.to_string())
        .with_description(description.to_string())
        .with_tags(tags.iter().map(|t| t.to_string()).collect())
    }

    #[test]
    fn test_field_weights() {
        let extractor = KeywordExtractor::new(KeywordConfig::default());
        let records = vec![
            video("pasta tutorial", "garlic pasta", &["Garlic", "dinner"]),
            video("garlic bread", "", &["garlic"]),
        ];

        let report = extractor.analyze_fields(&records);
        assert_eq!(report.total_videos_analyzed, 2);
        assert_eq!(report.top_tags[0], TagCount { tag: "garlic".to_string(), count: 2 });

        // garlic: title 1 * 3 + description 1 * 1 + tags 2 * 2
        let garlic = report.combined.iter().find(|e| e.keyword == "garlic").unwrap();
        assert_eq!(garlic.count, 8);
        // pasta: title 1 * 3 + description 1 * 1
        let pasta = report.combined.iter().find(|e| e.keyword == "pasta").unwrap();
        assert_eq!(pasta.count, 4);
        assert_eq!(report.combined[0].keyword, "garlic");
    }

    #[test]
    fn test_tag_merges_with_title_keyword_of_another_language() {
        let extractor = KeywordExtractor::new(KeywordConfig::default());
        let report = extractor.analyze_fields(&[video("먹방 asmr 브이로그", "", &["ASMR"])]);

        let asmr: Vec<&KeywordEntry> =
            report.combined.iter().filter(|e| e.keyword == "asmr").collect();
        assert_eq!(asmr.len(), 1);
        // title 1 * 3 in Korean text + tag 1 * 2 detected as other
        assert_eq!(asmr[0].count, 5);
        assert_eq!(asmr[0].language, Language::Korean);
    }

    #[test]
    fn test_empty_batch() {
        let extractor = KeywordExtractor::new(KeywordConfig::default());
        let report = extractor.analyze_fields(&Vec::<VideoRecord>::new());

        assert_eq!(report, KeywordReport::default());
    }

    #[test]
    fn test_field_limits() {
        let config = KeywordConfig {
            field_top_n: 1,
            top_tags: 1,
            ..KeywordConfig::default()
        };
        let extractor = KeywordExtractor::new(config);
        let report = extractor.analyze_fields(&[video("alpha beta beta", "gamma", &["x1", "x2"])]);

        assert_eq!(report.title_keywords.len(), 1);
        assert_eq!(report.title_keywords[0].keyword, "beta");
        assert_eq!(report.top_tags.len(), 1);
        assert_eq!(report.top_tags[0].tag, "x1");
    }
}
