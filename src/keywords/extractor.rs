use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};
use viral_core::VideoRecord;

use super::language::{detect_language, Language};
use super::segmenter::{select_segmenter, Segmenter, WhitespaceSegmenter};
use super::stopwords::Stopwords;
use crate::config::KeywordConfig;

const URL_PATTERN: &str = r"(?i)(?:https?://|www\.)\S+";

/// A keyword with its language and batch-wide occurrence count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub keyword: String,
    pub language: Language,
    pub count: usize,
}

/// Occurrences of one keyword, split by the language of the text it came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct KeywordTally {
    korean: usize,
    other: usize,
}

impl KeywordTally {
    fn add(&mut self, language: Language, count: usize) {
        match language {
            Language::Korean => self.korean += count,
            Language::Other => self.other += count,
        }
    }

    fn total(&self) -> usize {
        self.korean + self.other
    }

    /// Language with the most occurrences; a tie goes to Korean
    fn language(&self) -> Language {
        if self.korean >= self.other {
            Language::Korean
        } else {
            Language::Other
        }
    }
}

/// Occurrence counts per keyword across a batch.
///
/// A keyword found in both Korean and non-Korean text is one entry. Its
/// reported language is the one it occurred under most often.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordFrequencies {
    counts: HashMap<String, KeywordTally>,
}

impl KeywordFrequencies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, keyword: String, language: Language, count: usize) {
        if count == 0 {
            return;
        }
        self.counts.entry(keyword).or_default().add(language, count);
    }

    /// Add every count of `other`, multiplied by `weight`
    pub fn merge_weighted(&mut self, other: &KeywordFrequencies, weight: usize) {
        if weight == 0 {
            return;
        }
        for (keyword, tally) in &other.counts {
            let entry = self.counts.entry(keyword.clone()).or_default();
            entry.add(Language::Korean, tally.korean * weight);
            entry.add(Language::Other, tally.other * weight);
        }
    }

    pub fn merge(&mut self, other: &KeywordFrequencies) {
        self.merge_weighted(other, 1);
    }

    pub fn count(&self, keyword: &str) -> usize {
        self.counts.get(keyword).map_or(0, KeywordTally::total)
    }

    pub fn language(&self, keyword: &str) -> Option<Language> {
        self.counts.get(keyword).map(KeywordTally::language)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The full, unbounded keyword to count mapping
    pub fn to_map(&self) -> HashMap<String, usize> {
        self.counts
            .iter()
            .map(|(keyword, tally)| (keyword.clone(), tally.total()))
            .collect()
    }

    /// Every entry, count descending, ties by keyword
    pub fn ranked(&self) -> Vec<KeywordEntry> {
        let mut entries: Vec<KeywordEntry> = self
            .counts
            .iter()
            .map(|(keyword, tally)| KeywordEntry {
                keyword: keyword.clone(),
                language: tally.language(),
                count: tally.total(),
            })
            .collect();

        entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.keyword.cmp(&b.keyword)));
        entries
    }

    /// The `n` highest ranked entries
    pub fn top(&self, n: usize) -> Vec<KeywordEntry> {
        let mut entries = self.ranked();
        entries.truncate(n);
        entries
    }
}

/// Tokenizes video text and aggregates keyword frequencies
pub struct KeywordExtractor {
    config: KeywordConfig,
    stopwords: Stopwords,
    /// Used for Korean text; other text always goes through whitespace splitting
    segmenter: Box<dyn Segmenter>,
    url_pattern: Option<Regex>,
}

impl KeywordExtractor {
    /// Build an extractor, picking the richest available segmenter
    pub fn new(config: KeywordConfig) -> Self {
        let segmenter = select_segmenter(&config);
        Self::with_segmenter(config, segmenter)
    }

    /// Build an extractor around an explicit segmenter
    pub fn with_segmenter(config: KeywordConfig, segmenter: Box<dyn Segmenter>) -> Self {
        let stopwords = match &config.stopwords_file {
            Some(path) => Stopwords::from_file(path).unwrap_or_else(|e| {
                warn!(
                    "Failed to load stopwords from {}, using built-in lists: {}",
                    path.display(),
                    e
                );
                Stopwords::new()
            }),
            None => Stopwords::new(),
        };

        debug!("Keyword extractor using {} segmentation", segmenter.name());

        Self {
            config,
            stopwords,
            segmenter,
            url_pattern: Regex::new(URL_PATTERN).ok(),
        }
    }

    pub fn config(&self) -> &KeywordConfig {
        &self.config
    }

    pub fn segmenter_name(&self) -> &'static str {
        self.segmenter.name()
    }

    pub fn detect_language(&self, text: &str) -> Language {
        detect_language(text, self.config.korean_ratio_threshold)
    }

    /// Detect the language of `text` and return its surviving keyword tokens
    pub fn tokenize(&self, text: &str) -> (Language, Vec<String>) {
        let cleaned = match &self.url_pattern {
            Some(re) => re.replace_all(text, " "),
            None => text.into(),
        };

        let language = self.detect_language(&cleaned);
        let tokens = match language {
            Language::Korean => self.segmenter.segment(&cleaned),
            Language::Other => WhitespaceSegmenter.segment(&cleaned),
        };

        let tokens = tokens
            .into_iter()
            .filter(|token| self.keep_token(token, language))
            .collect();

        (language, tokens)
    }

    /// Keyword counts of a single text
    pub fn text_frequencies(&self, text: &str) -> KeywordFrequencies {
        let mut frequencies = KeywordFrequencies::new();
        let (language, tokens) = self.tokenize(text);
        for token in tokens {
            frequencies.add(token, language, 1);
        }
        frequencies
    }

    /// Keyword counts over title, description and tags of every record.
    /// Each record's text is one blob with its own detected language.
    pub fn frequencies<'a, I>(&self, records: I) -> KeywordFrequencies
    where
        I: IntoIterator<Item = &'a VideoRecord>,
    {
        let mut frequencies = KeywordFrequencies::new();
        for record in records {
            frequencies.merge(&self.text_frequencies(&record.text_blob()));
        }
        frequencies
    }

    /// Top `top_n` keywords across the batch
    pub fn extract<'a, I>(&self, records: I, top_n: usize) -> Vec<KeywordEntry>
    where
        I: IntoIterator<Item = &'a VideoRecord>,
    {
        self.frequencies(records).top(top_n)
    }

    fn keep_token(&self, token: &str, language: Language) -> bool {
        let length = token.chars().count();
        if length < self.config.min_keyword_length || length > self.config.max_keyword_length {
            return false;
        }

        !token.chars().all(|c| c.is_ascii_digit())
            && !self.stopwords.is_stopword(token, language)
            && !is_url_fragment(token)
            && !is_meaningless(token)
    }
}

/// Leftovers of links that survive URL stripping
pub fn is_url_fragment(word: &str) -> bool {
    let word = word.to_lowercase();
    word.starts_with("www")
        || word.starts_with("http")
        || [".com", ".net", ".org", ".kr", ".co"]
            .iter()
            .any(|suffix| word.ends_with(suffix))
        || word.contains("youtube")
        || word.contains("youtu.be")
}

/// Runs of one repeated character (ㅋㅋㅋ, !!!) or words without any
/// letter or digit
pub fn is_meaningless(word: &str) -> bool {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return true;
    };

    if word.chars().count() >= 3 && chars.all(|c| c == first) {
        return true;
    }

    !word.chars().any(char::is_alphanumeric)
}
