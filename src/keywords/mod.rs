//! Keyword extraction
//!
//! Text of each video is language-tagged, segmented, filtered against
//! stopwords and length limits, and counted per `(keyword, language)`.

pub mod extractor;
pub mod language;
pub mod report;
pub mod segmenter;
pub mod stopwords;

pub use extractor::{KeywordEntry, KeywordExtractor, KeywordFrequencies};
pub use language::{detect_language, korean_ratio, Language};
pub use report::{KeywordReport, TagCount};
pub use segmenter::{select_segmenter, MorphologicalSegmenter, Segmenter, WhitespaceSegmenter};
pub use stopwords::{StopwordStats, Stopwords};
