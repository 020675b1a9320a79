//! Word segmentation capabilities
//!
//! The keyword extractor only sees the [`Segmenter`] trait. A whitespace
//! segmenter is always available; a morphological one is used for Korean text
//! when its lexicon can be loaded.

use anyhow::Result;
use std::path::Path;
use tracing::{info, warn};
use unicode_segmentation::UnicodeSegmentation;

use super::language::is_hangul_syllable;
use crate::config::KeywordConfig;

/// Splits text into lowercase word tokens
pub trait Segmenter: Send + Sync {
    /// Short name for logging
    fn name(&self) -> &'static str;

    fn segment(&self, text: &str) -> Vec<String>;
}

/// Splits on Unicode word boundaries, dropping whitespace and punctuation
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceSegmenter;

impl Segmenter for WhitespaceSegmenter {
    fn name(&self) -> &'static str {
        "whitespace"
    }

    fn segment(&self, text: &str) -> Vec<String> {
        text.unicode_words().map(str::to_lowercase).collect()
    }
}

/// Particles and verb endings attached to Korean nouns, longest first
const DEFAULT_PARTICLES: &[&str] = &[
    "에서부터", "으로부터", "에서는", "으로는", "에게서", "이라고", "이라는",
    "입니다", "습니다", "에서", "에게", "한테", "께서", "으로", "까지", "부터",
    "보다", "처럼", "마다", "이나", "이랑", "하고", "에는", "에도", "라고",
    "라는", "하는", "했다", "한다", "해요", "은", "는", "이", "가", "을", "를",
    "에", "의", "와", "과", "도", "만", "로", "랑",
];

/// Korean noun extraction by stripping trailing particles and endings
#[derive(Debug, Clone)]
pub struct MorphologicalSegmenter {
    /// Sorted by length descending so the longest ending wins
    particles: Vec<String>,

    /// Minimum Hangul characters that must remain after stripping
    min_stem_chars: usize,
}

impl MorphologicalSegmenter {
    /// Segmenter with the built-in particle lexicon
    pub fn new() -> Self {
        Self::with_particles(DEFAULT_PARTICLES.iter().map(|p| p.to_string()).collect())
    }

    fn with_particles(mut particles: Vec<String>) -> Self {
        particles.retain(|p| !p.is_empty());
        particles.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
        particles.dedup();
        Self {
            particles,
            min_stem_chars: 2,
        }
    }

    /// Load a particle lexicon, one ending per line, `#` comments
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let particles: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(String::from)
            .collect();

        if particles.is_empty() {
            return Err(anyhow::anyhow!(
                "Morphology dictionary {} has no entries",
                path.as_ref().display()
            ));
        }

        info!(
            "📚 Loaded {} particles from: {}",
            particles.len(),
            path.as_ref().display()
        );
        Ok(Self::with_particles(particles))
    }

    /// Resolve the segmenter the configuration asks for, if it is available
    pub fn detect(config: &KeywordConfig) -> Option<Self> {
        if !config.use_morphology {
            return None;
        }

        match &config.morphology_dictionary {
            Some(path) => match Self::from_file(path) {
                Ok(segmenter) => Some(segmenter),
                Err(e) => {
                    warn!(
                        "Morphology dictionary unavailable ({}), using whitespace segmentation",
                        e
                    );
                    None
                }
            },
            None => Some(Self::new()),
        }
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Strip one trailing particle from a Hangul word
    fn stem<'a>(&self, word: &'a str) -> &'a str {
        if !word.chars().last().is_some_and(is_hangul_syllable) {
            return word;
        }

        for particle in &self.particles {
            if let Some(stem) = word.strip_suffix(particle.as_str()) {
                let hangul = stem.chars().filter(|c| is_hangul_syllable(*c)).count();
                if hangul >= self.min_stem_chars {
                    return stem;
                }
            }
        }

        word
    }
}

impl Default for MorphologicalSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Segmenter for MorphologicalSegmenter {
    fn name(&self) -> &'static str {
        "morphological"
    }

    fn segment(&self, text: &str) -> Vec<String> {
        text.unicode_words()
            .map(|word| self.stem(word).to_lowercase())
            .collect()
    }
}

/// Pick the richest segmenter available for Korean text
pub fn select_segmenter(config: &KeywordConfig) -> Box<dyn Segmenter> {
    match MorphologicalSegmenter::detect(config) {
        Some(segmenter) => Box::new(segmenter),
        None => Box::new(WhitespaceSegmenter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_whitespace_segmenter() {
        let tokens = WhitespaceSegmenter.segment("Hello, World! 유튜브에서 봤어요.");
        assert_eq!(tokens, vec!["hello", "world", "유튜브에서", "봤어요"]);
    }

    #[test]
    fn test_morphological_strips_particles() {
        let segmenter = MorphologicalSegmenter::new();
        let tokens = segmenter.segment("유튜브에서 김치찌개를 소개한 영상은 인기");

        assert_eq!(tokens, vec!["유튜브", "김치찌개", "소개한", "영상", "인기"]);
    }

    #[test]
    fn test_short_stems_are_kept_whole() {
        let segmenter = MorphologicalSegmenter::new();
        // stripping 가 would leave a single syllable
        assert_eq!(segmenter.segment("아가"), vec!["아가"]);
    }

    #[test]
    fn test_non_hangul_words_untouched() {
        let segmenter = MorphologicalSegmenter::new();
        assert_eq!(segmenter.segment("Recipe 2024"), vec!["recipe", "2024"]);
    }

    #[test]
    fn test_detect_respects_config() {
        let mut config = KeywordConfig::default();
        assert!(MorphologicalSegmenter::detect(&config).is_some());

        config.use_morphology = false;
        assert!(MorphologicalSegmenter::detect(&config).is_none());
        assert_eq!(select_segmenter(&config).name(), "whitespace");
    }

    #[test]
    fn test_missing_dictionary_falls_back() {
        let config = KeywordConfig {
            morphology_dictionary: Some("/nonexistent/particles.txt".into()),
            ..KeywordConfig::default()
        };

        assert_eq!(select_segmenter(&config).name(), "whitespace");
    }

    #[test]
    fn test_dictionary_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("particles.txt");
        std::fs::write(&path, "# endings\n에서\n를\n").unwrap();

        let segmenter = MorphologicalSegmenter::from_file(&path).unwrap();
        assert_eq!(segmenter.particle_count(), 2);
        assert_eq!(segmenter.segment("서울에서 영상은"), vec!["서울", "영상은"]);
    }
}
