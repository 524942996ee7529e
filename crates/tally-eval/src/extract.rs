//! Answer extraction from raw model output

use once_cell::sync::Lazy;
use regex::Regex;

/// `answer: X` up to the end of the line
static ANSWER_LEAD_IN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)answer:\s*(.+?)(?:\n|$)").expect("valid answer pattern"));

/// `\boxed{X}`
static BOXED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\\boxed\{(.+?)\}").expect("valid boxed pattern"));

static ANSWER_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)answer:").expect("valid marker pattern"));

/// Ordered extraction rules; the first rule that matches wins
#[derive(Debug, Clone)]
pub struct AnswerExtractor {
    rules: Vec<&'static Regex>,
}

impl Default for AnswerExtractor {
    fn default() -> Self {
        Self {
            rules: vec![&ANSWER_LEAD_IN, &BOXED],
        }
    }
}

impl AnswerExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captured answer of the first matching rule, trimmed
    ///
    /// Falls back to the trimmed input when no rule matches.
    pub fn extract(&self, raw: &str) -> String {
        self.rules
            .iter()
            .find_map(|rule| rule.captures(raw))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_else(|| raw.trim().to_string())
    }
}

/// Whether the output carries the `answer:` marker anywhere, in any case
pub fn instruction_followed(raw: &str) -> bool {
    ANSWER_MARKER.is_match(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_lead_in() {
        let extractor = AnswerExtractor::new();
        assert_eq!(extractor.extract("Let me think.\nAnswer:   42  \nDone"), "42");
        assert_eq!(extractor.extract("ANSWER: Paris"), "Paris");
        assert!(instruction_followed("ANSWER: Paris"));
    }

    #[test]
    fn test_lead_in_wins_over_boxed() {
        let extractor = AnswerExtractor::new();
        assert_eq!(extractor.extract("\\boxed{7}\nanswer: 8"), "8");
    }

    #[test]
    fn test_boxed_only() {
        let extractor = AnswerExtractor::new();
        let raw = "So the result is \\boxed{ 3/4 } overall.";
        assert_eq!(extractor.extract(raw), "3/4");
        assert!(!instruction_followed(raw));
    }

    #[test]
    fn test_fallback_is_trimmed_text() {
        let extractor = AnswerExtractor::new();
        assert_eq!(extractor.extract("   just 12\n"), "just 12");
        assert_eq!(extractor.extract(""), "");
    }

    #[test]
    fn test_marker_with_nothing_after_falls_through() {
        // `answer:` at end of text has nothing to capture, so the boxed rule is tried next.
        let extractor = AnswerExtractor::new();
        let raw = "\\boxed{5} answer:";
        assert_eq!(extractor.extract(raw), "5");
        assert!(instruction_followed(raw));
    }

    #[test]
    fn test_failure_strings_fall_back() {
        let extractor = AnswerExtractor::new();
        let raw = "Error: 500 - upstream unavailable";
        assert_eq!(extractor.extract(raw), raw);
        assert!(!instruction_followed(raw));
    }
}
