//! Lexical risk scorer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::dataset::field_value::FieldValue;
use crate::scoring::tier::Tier;
use crate::scoring::vocabulary::Vocabulary;

/// Outcome of scoring one text against a vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringResult {
    /// Sum of the weights of every matched term.
    pub score: u32,
    /// Tier derived from the score.
    pub tier: Tier,
    /// Matched terms as declared, in vocabulary order.
    pub evidence: Vec<String>,
}

impl ScoringResult {
    /// The result for absent or empty input.
    pub fn empty() -> Self {
        ScoringResult {
            score: 0,
            tier: Tier::Safe,
            evidence: Vec::new(),
        }
    }

    /// Evidence joined with `", "`, as written to the output dataset.
    pub fn evidence_string(&self) -> String {
        self.evidence.join(", ")
    }
}

/// Scores free text by summing the weights of vocabulary terms it contains.
///
/// Matching is case-insensitive and whole-word. A term contributes its weight
/// once no matter how often it occurs. The scorer holds no mutable state, so
/// the same text always produces the same result.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use comment_risk::scoring::{LexicalScorer, Tier, Vocabulary};
///
/// let vocabulary = Vocabulary::from_pairs(vec![("kill", 5), ("please", 1)]).unwrap();
/// let scorer = LexicalScorer::new(Arc::new(vocabulary));
///
/// let result = scorer.score_text("Please don't kill me");
/// assert_eq!(result.score, 6);
/// assert_eq!(result.tier, Tier::Suspicious);
/// assert_eq!(result.evidence, vec!["kill", "please"]);
/// ```
#[derive(Debug, Clone)]
pub struct LexicalScorer {
    vocabulary: Arc<Vocabulary>,
}

impl LexicalScorer {
    /// Create a scorer over the given vocabulary.
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        LexicalScorer { vocabulary }
    }

    /// The vocabulary used by this scorer.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Score optional text. `None` scores as empty input.
    pub fn score(&self, text: Option<&str>) -> ScoringResult {
        match text {
            Some(text) => self.score_text(text),
            None => ScoringResult::empty(),
        }
    }

    /// Score a text string.
    pub fn score_text(&self, text: &str) -> ScoringResult {
        if text.is_empty() {
            return ScoringResult::empty();
        }

        let lowered = text.to_lowercase();
        let mut score = 0u32;
        let mut evidence = Vec::new();

        for (entry, matcher) in self.vocabulary.matchers() {
            if matcher.is_match(&lowered) {
                score = score.saturating_add(entry.weight);
                evidence.push(entry.term.clone());
            }
        }

        ScoringResult {
            score,
            tier: Tier::from_score(score),
            evidence,
        }
    }

    /// Score a dataset cell. Non-text values are treated as absent input.
    pub fn score_value(&self, value: &FieldValue) -> ScoringResult {
        self.score(value.as_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer(pairs: Vec<(&str, u32)>) -> LexicalScorer {
        LexicalScorer::new(Arc::new(Vocabulary::from_pairs(pairs).unwrap()))
    }

    fn default_scorer() -> LexicalScorer {
        LexicalScorer::new(Arc::new(Vocabulary::default_keywords().unwrap()))
    }

    #[test]
    fn test_evidence_in_vocabulary_order() {
        let scorer = scorer(vec![("kill", 5), ("please", 1)]);
        let result = scorer.score_text("Please don't kill me");

        assert_eq!(result.score, 6);
        assert_eq!(result.tier, Tier::Suspicious);
        assert_eq!(result.evidence, vec!["kill", "please"]);
        assert_eq!(result.evidence_string(), "kill, please");
    }

    #[test]
    fn test_empty_and_absent_input() {
        let scorer = scorer(vec![("kill", 5)]);
        assert_eq!(scorer.score_text(""), ScoringResult::empty());
        assert_eq!(scorer.score(None), ScoringResult::empty());
        assert_eq!(scorer.score_value(&FieldValue::Null), ScoringResult::empty());
        assert_eq!(
            scorer.score_value(&FieldValue::Integer(42)),
            ScoringResult::empty()
        );
    }

    #[test]
    fn test_binary_presence() {
        let scorer = scorer(vec![("kill", 5)]);
        let result = scorer.score_text("kill kill KILL");
        assert_eq!(result.score, 5);
        assert_eq!(result.evidence, vec!["kill"]);
    }

    #[test]
    fn test_case_insensitive() {
        let scorer = default_scorer();
        let text = "Add me on Discord, cutie";
        assert_eq!(
            scorer.score_text(&text.to_uppercase()),
            scorer.score_text(&text.to_lowercase())
        );
        assert_eq!(scorer.score_text(text).score, 19);
    }

    #[test]
    fn test_whole_word_matching() {
        let scorer = scorer(vec![("cam", 4), ("mutt", 15)]);
        assert_eq!(scorer.score_text("camgirl amerimutt").score, 0);
        assert_eq!(scorer.score_text("turn on your cam").score, 4);
        assert_eq!(scorer.score_text("mutt!").score, 15);
    }

    #[test]
    fn test_phrase_terms() {
        let scorer = scorer(vec![("daddy", 4), ("daddy's", 8), ("hook up", 6)]);

        let result = scorer.score_text("Daddy's home");
        assert_eq!(result.score, 12);
        assert_eq!(result.evidence, vec!["daddy", "daddy's"]);

        assert_eq!(scorer.score_text("want to HOOK UP?").score, 6);
        assert_eq!(scorer.score_text("hook-up").score, 0);
    }

    #[test]
    fn test_uppercase_declared_terms_report_declared_casing() {
        let scorer = scorer(vec![("KYS", 15), ("kys", 15)]);
        let result = scorer.score_text("just kys");
        assert_eq!(result.score, 30);
        assert_eq!(result.evidence, vec!["KYS", "kys"]);
    }

    #[test]
    fn test_threshold_boundaries() {
        let scorer = scorer(vec![("five", 5), ("ten", 10), ("four", 4)]);
        assert_eq!(scorer.score_text("four").tier, Tier::Safe);
        assert_eq!(scorer.score_text("five").tier, Tier::Suspicious);
        assert_eq!(scorer.score_text("ten").tier, Tier::Dangerous);
        assert_eq!(scorer.score_text("five four").tier, Tier::Suspicious);
    }

    #[test]
    fn test_repeated_calls_are_deterministic() {
        let scorer = default_scorer();
        let text = "send nudes on snapchat, I'm alone";
        let first = scorer.score_text(text);
        let _ = scorer.score_text("something else entirely");
        assert_eq!(scorer.score_text(text), first);
    }
}
