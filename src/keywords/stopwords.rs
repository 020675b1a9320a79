use anyhow::Result;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use super::language::Language;

/// Korean particles, conjunctions, fillers, web noise and counters
const KOREAN_STOPWORDS: &[&str] = &[
    // Particles and conjunctions
    "그", "를", "을", "에", "의", "가", "이", "은", "는", "와", "과", "로", "으로",
    "에서", "까지", "부터", "보다", "처럼", "같이", "하고", "하지만", "그리고",
    "그런데", "그러나", "따라서", "왜냐하면", "때문에", "입니다", "습니다",
    "해요", "이에요", "예요", "네요", "요", "다", "야", "아", "어", "여",
    // Web and URL fragments
    "www", "http", "https", "com", "net", "org", "kr", "co", "go", "html",
    "php", "asp", "jsp", "url", "link", "site", "page", "web", "blog",
    // Platform and social
    "youtube", "youtu", "be", "watch", "video", "channel", "subscribe",
    "like", "comment", "share", "follow", "instagram", "facebook", "twitter",
    "tiktok", "shorts", "live", "stream", "streaming",
    // Intensifiers and quantifiers
    "더", "많은", "정말", "진짜", "완전", "너무", "아주", "매우", "정말로",
    "이런", "저런", "그런", "어떤", "무슨", "어느", "모든", "전체", "일부",
    "각각", "각자", "서로", "함께", "모두", "전부", "하나", "둘", "셋",
    // Time
    "오늘", "어제", "내일", "지금", "현재", "과거", "미래", "언제", "항상",
    "가끔", "종종", "자주", "때때로", "이제", "벌써", "아직", "still", "already",
    // Interjections
    "오", "우", "워", "음", "으", "흠", "헉", "어머", "세상",
    "대박", "ㅋㅋ", "ㅎㅎ", "ㅠㅠ", "ㅜㅜ", "ㅇㅇ", "ㄷㄷ", "ㅉㅉ",
    // Counters and units
    "개", "명", "번", "회", "차", "등", "위", "순", "째", "년", "월", "일",
    "시", "분", "초", "원", "만", "억", "천", "백", "십",
];

/// English function words, web noise and platform vocabulary
const ENGLISH_STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for",
    "of", "with", "by", "as", "is", "are", "was", "were", "be", "been",
    "have", "has", "had", "do", "does", "did", "will", "would", "could",
    "should", "may", "might", "can", "this", "that", "these", "those",
    "it", "its", "from", "into", "about", "not", "no", "so", "if", "than",
    "you", "your", "we", "our", "they", "their", "he", "she", "his", "her",
    "my", "me", "us", "them", "i",
    // Web and URL fragments
    "www", "http", "https", "com", "net", "org", "html", "php", "asp",
    "url", "link", "site", "page", "web", "blog", "domain", "server",
    // Platform and media
    "youtube", "video", "watch", "channel", "subscribe", "like", "comment",
    "share", "view", "views", "subscriber", "followers", "content",
    "media", "social", "platform", "streaming", "live", "upload",
    // Common fillers
    "more", "most", "very", "really", "just", "only", "also", "even",
    "still", "already", "yet", "now", "then", "here", "there", "where",
    "what", "when", "why", "how", "who", "which", "all", "some", "any",
    "each", "every", "both", "either", "neither", "other", "another",
];

/// Language-specific stopword lists
#[derive(Debug, Clone)]
pub struct Stopwords {
    korean: HashSet<String>,
    english: HashSet<String>,
}

impl Stopwords {
    /// Create stopword lists with the built-in words
    pub fn new() -> Self {
        Self {
            korean: KOREAN_STOPWORDS.iter().map(|w| w.to_string()).collect(),
            english: ENGLISH_STOPWORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Built-in lists extended with the words of a stopwords file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut stopwords = Self::new();
        stopwords.parse_stopwords_file(&content);
        info!("📚 Loaded extra stopwords from: {}", path.as_ref().display());
        Ok(stopwords)
    }

    pub fn add(&mut self, language: Language, word: &str) {
        let word = word.trim().to_lowercase();
        if word.is_empty() {
            return;
        }
        match language {
            Language::Korean => self.korean.insert(word),
            Language::Other => self.english.insert(word),
        };
    }

    /// Korean text commonly mixes in English, so Korean checks both lists.
    pub fn is_stopword(&self, token: &str, language: Language) -> bool {
        match language {
            Language::Korean => self.korean.contains(token) || self.english.contains(token),
            Language::Other => self.english.contains(token),
        }
    }

    /// Parse `[korean]` / `[english]` sections, one word per line, `#` comments
    fn parse_stopwords_file(&mut self, content: &str) {
        let mut current = Language::Other;

        for line in content.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                current = match line[1..line.len() - 1].to_lowercase().as_str() {
                    "korean" | "ko" => Language::Korean,
                    _ => Language::Other,
                };
                continue;
            }

            self.add(current, line);
        }
    }

    pub fn get_stats(&self) -> StopwordStats {
        StopwordStats {
            korean: self.korean.len(),
            english: self.english.len(),
        }
    }
}

impl Default for Stopwords {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopwordStats {
    pub korean: usize,
    pub english: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_lists() {
        let stopwords = Stopwords::new();

        assert!(stopwords.is_stopword("the", Language::Other));
        assert!(stopwords.is_stopword("입니다", Language::Korean));
        assert!(!stopwords.is_stopword("입니다", Language::Other));
        assert!(!stopwords.is_stopword("recipe", Language::Other));
    }

    #[test]
    fn test_korean_checks_english_list() {
        let stopwords = Stopwords::new();
        assert!(stopwords.is_stopword("the", Language::Korean));
    }

    #[test]
    fn test_parse_sections() {
        let mut stopwords = Stopwords::new();
        let before = stopwords.get_stats();

        stopwords.parse_stopwords_file(
            "# extra words\n[korean]\n구독\n좋아요\n\n[english]\nEpisode\n",
        );

        let after = stopwords.get_stats();
        assert_eq!(after.korean, before.korean + 2);
        assert_eq!(after.english, before.english + 1);
        assert!(stopwords.is_stopword("episode", Language::Other));
        assert!(stopwords.is_stopword("구독", Language::Korean));
    }

    #[test]
    fn test_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stopwords.txt");
        std::fs::write(&path, "[english]\nvlog\n").unwrap();

        let stopwords = Stopwords::from_file(&path).unwrap();
        assert!(stopwords.is_stopword("vlog", Language::Other));
    }
}
