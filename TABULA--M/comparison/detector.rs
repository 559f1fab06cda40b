use serde::{Deserialize, Serialize};

use crate::error::TabulaError;

/// Threshold used when the caller does not supply one.
pub const DEFAULT_THRESHOLD: f32 = 0.6;

/// Phrases signalling comparison intent, in reporting order.
pub const TRIGGER_PHRASES: [&str; 22] = [
    "compare",
    "comparison",
    "versus",
    "vs",
    "compared to",
    "compared with",
    "difference",
    "differences",
    "different from",
    "distinguish",
    "distinction",
    "contrast",
    "contrasted with",
    "similar",
    "similarities",
    "pros and cons",
    "advantages and disadvantages",
    "benefits vs",
    "which is better",
    "what's the difference",
    "how are they different",
    "like vs",
];

/// Subset of phrases that add a flat boost when present.
pub const STRONG_PHRASES: [&str; 5] = ["compare", "difference", "versus", "vs", "contrast"];

// Confidence is accumulated in tenths so that 0.3 steps stay exact.
const TENTHS_PER_MATCH: u32 = 3;
const STRONG_BOOST_TENTHS: u32 = 3;
const MAX_TENTHS: u32 = 10;

/// Outcome of classifying one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Whether `confidence` cleared the threshold.
    pub is_comparison: bool,
    /// Heuristic score in `[0, 1]`.
    pub confidence: f32,
    /// Trigger phrases found in the question.
    pub matched_phrases: Vec<String>,
}

impl DetectionResult {
    fn none() -> Self {
        Self {
            is_comparison: false,
            confidence: 0.0,
            matched_phrases: Vec::new(),
        }
    }
}

/// Stateless comparison-question classifier with a fixed threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonDetector {
    threshold: f32,
}

impl ComparisonDetector {
    /// Creates a detector; `threshold` must lie in `[0, 1]`.
    pub fn new(threshold: f32) -> Result<Self, TabulaError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(TabulaError::InvalidThreshold(threshold));
        }
        Ok(Self { threshold })
    }

    /// Configured threshold.
    #[must_use]
    pub const fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Classifies `question`.
    #[must_use]
    pub fn detect(&self, question: &str) -> DetectionResult {
        detect(question, self.threshold)
    }

    /// Trigger phrases present in `question`, regardless of threshold.
    #[must_use]
    pub fn detected_keywords(&self, question: &str) -> Vec<String> {
        detected_keywords(question)
    }
}

impl Default for ComparisonDetector {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Classifies `question` against `threshold`.
///
/// Matching is a plain substring scan over the lowercased, trimmed text, so
/// `vs` inside a longer word still counts. Never fails.
#[must_use]
pub fn detect(question: &str, threshold: f32) -> DetectionResult {
    let normalized = normalize(question);
    if normalized.is_empty() {
        return DetectionResult::none();
    }
    let matched = matching_phrases(&normalized);
    if matched.is_empty() {
        return DetectionResult::none();
    }

    let count = u32::try_from(matched.len()).unwrap_or(u32::MAX);
    let mut tenths = count.saturating_mul(TENTHS_PER_MATCH).min(MAX_TENTHS);
    if STRONG_PHRASES.iter().any(|phrase| normalized.contains(phrase)) {
        tenths = (tenths + STRONG_BOOST_TENTHS).min(MAX_TENTHS);
    }
    #[allow(clippy::cast_precision_loss)]
    let confidence = tenths as f32 / MAX_TENTHS as f32;

    DetectionResult {
        is_comparison: confidence >= threshold,
        confidence,
        matched_phrases: matched,
    }
}

/// Every trigger phrase contained in the lowercased `question`.
#[must_use]
pub fn detected_keywords(question: &str) -> Vec<String> {
    matching_phrases(&normalize(question))
}

fn normalize(question: &str) -> String {
    question.trim().to_lowercase()
}

fn matching_phrases(normalized: &str) -> Vec<String> {
    TRIGGER_PHRASES
        .iter()
        .filter(|phrase| normalized.contains(*phrase))
        .map(|phrase| (*phrase).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_question_clears_default_threshold() {
        let result = detect("Compare Python and JavaScript", DEFAULT_THRESHOLD);
        assert!(result.matched_phrases.contains(&"compare".to_string()));
        assert!(result.confidence >= 0.6);
        assert!(result.is_comparison);
    }

    #[test]
    fn unrelated_question_scores_zero() {
        let result = detect("Tell me about artificial intelligence", DEFAULT_THRESHOLD);
        assert!(result.matched_phrases.is_empty());
        assert!(result.confidence.abs() < f32::EPSILON);
        assert!(!result.is_comparison);
    }

    #[test]
    fn pros_and_cons_with_vs_is_comparison() {
        let result = detect("Pros and cons of remote work vs office", DEFAULT_THRESHOLD);
        assert!(result.matched_phrases.contains(&"pros and cons".to_string()));
        assert!(result.matched_phrases.contains(&"vs".to_string()));
        assert!((result.confidence - 0.9).abs() < 1e-6);
        assert!(result.is_comparison);
    }

    #[test]
    fn empty_and_whitespace_are_not_comparisons() {
        for input in ["", "   ", "\n\t"] {
            let result = detect(input, DEFAULT_THRESHOLD);
            assert_eq!(result, DetectionResult::none());
        }
    }

    #[test]
    fn weak_single_match_stays_below_threshold() {
        let result = detect("Are cats similar to dogs?", DEFAULT_THRESHOLD);
        assert_eq!(result.matched_phrases, vec!["similar".to_string()]);
        assert!((result.confidence - 0.3).abs() < 1e-6);
        assert!(!result.is_comparison);
    }

    #[test]
    fn confidence_is_capped_at_one() {
        let result = detect(
            "Compare and contrast: what's the difference, differences, similarities, pros and cons versus vs",
            DEFAULT_THRESHOLD,
        );
        assert!(result.matched_phrases.len() > 4);
        assert!((result.confidence - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn substring_match_inside_words_is_accepted() {
        let keywords = detected_keywords("obvs the better one");
        assert_eq!(keywords, vec!["vs".to_string()]);
    }

    #[test]
    fn case_insensitive_and_deterministic() {
        let questions = [
            "Compare Python and JavaScript",
            "What's the difference between iOS and Android?",
            "Compare machine learning vs deep learning",
            "Tell me about artificial intelligence",
        ];
        for q in questions {
            let lower = detect(q, DEFAULT_THRESHOLD);
            assert_eq!(lower, detect(&q.to_uppercase(), DEFAULT_THRESHOLD));
            assert_eq!(lower, detect(q, DEFAULT_THRESHOLD));
        }
    }

    #[test]
    fn keywords_are_substrings_of_normalized_input() {
        let question = "  Which is better: Rust VERSUS Go, compared with C? ";
        let normalized = question.trim().to_lowercase();
        let keywords = detected_keywords(question);
        assert!(!keywords.is_empty());
        for keyword in keywords {
            assert!(normalized.contains(&keyword));
        }
    }

    #[test]
    fn confidence_always_in_unit_interval() {
        let long = "compare vs versus ".repeat(10_000);
        for input in ["", "x", "difference", long.as_str(), "ÄÖÜ vs ß"] {
            let c = detect(input, DEFAULT_THRESHOLD).confidence;
            assert!((0.0..=1.0).contains(&c));
        }
    }

    #[test]
    fn threshold_gates_result() {
        let strict = ComparisonDetector::new(1.0).unwrap();
        let lenient = ComparisonDetector::new(0.3).unwrap();
        let question = "Compare Python and JavaScript";
        assert!(!strict.detect(question).is_comparison);
        assert!(lenient.detect(question).is_comparison);
        assert_eq!(
            strict.detected_keywords(question),
            lenient.detected_keywords(question)
        );
    }

    #[test]
    fn rejects_out_of_range_thresholds() {
        assert_eq!(
            ComparisonDetector::new(1.5),
            Err(TabulaError::InvalidThreshold(1.5))
        );
        assert!(ComparisonDetector::new(f32::NAN).is_err());
        assert!((ComparisonDetector::default().threshold() - 0.6).abs() < f32::EPSILON);
    }
}
