use serde::{Deserialize, Serialize};
use std::fmt;

/// Dominant script of a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "ko")]
    Korean,
    /// English and anything else without Hangul dominance
    #[serde(rename = "en")]
    Other,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Korean => "ko",
            Language::Other => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Precomposed Hangul syllable block (가..힣)
pub fn is_hangul_syllable(c: char) -> bool {
    ('\u{AC00}'..='\u{D7A3}').contains(&c)
}

/// Share of Hangul syllables among Hangul syllables and ASCII letters.
/// `None` when the text has neither.
pub fn korean_ratio(text: &str) -> Option<f64> {
    let (korean, latin) = text.chars().fold((0usize, 0usize), |(ko, la), c| {
        if is_hangul_syllable(c) {
            (ko + 1, la)
        } else if c.is_ascii_alphabetic() {
            (ko, la + 1)
        } else {
            (ko, la)
        }
    });

    let total = korean + latin;
    if total == 0 {
        None
    } else {
        Some(korean as f64 / total as f64)
    }
}

/// Korean when the Hangul ratio is strictly above `threshold`, otherwise Other
pub fn detect_language(text: &str, threshold: f64) -> Language {
    match korean_ratio(text) {
        Some(ratio) if ratio > threshold => Language::Korean,
        _ => Language::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_korean() {
        assert_eq!(detect_language("오늘의 요리 레시피", 0.3), Language::Korean);
    }

    #[test]
    fn test_detect_english() {
        assert_eq!(detect_language("Best cooking recipes", 0.3), Language::Other);
    }

    #[test]
    fn test_mixed_text_uses_ratio() {
        // 4 Hangul syllables vs 6 latin letters -> 0.4
        assert_eq!(korean_ratio("김치찌개 recipe"), Some(0.4));
        assert_eq!(detect_language("김치찌개 recipe", 0.3), Language::Korean);
        assert_eq!(detect_language("김치찌개 recipe", 0.5), Language::Other);
    }

    #[test]
    fn test_no_letters_falls_back_to_other() {
        assert_eq!(korean_ratio("123 !!! ㅋㅋㅋ"), None);
        assert_eq!(detect_language("", 0.3), Language::Other);
    }

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::Korean.to_string(), "ko");
        assert_eq!(serde_json::to_string(&Language::Other).unwrap(), "\"en\"");
    }
}
