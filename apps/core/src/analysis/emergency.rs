//! Emergency Detection.
//!
//! Whole-word matching of the input against the emergency lexicon. Any hit
//! marks the text as an emergency; signals are reported in lexicon order.

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::lexicon::Lexicon;
use super::normalize::{normalize, phrase_matcher};
use crate::error::AppError;

/// Outcome of the emergency scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyCheck {
    pub is_emergency: bool,
    /// Identifiers of the matched signals, in lexicon order.
    pub matched_signals: Vec<String>,
    /// Immediate-action advice; empty unless `is_emergency`.
    pub advice: String,
}

impl EmergencyCheck {
    pub fn clear() -> Self {
        Self {
            is_emergency: false,
            matched_signals: vec![],
            advice: String::new(),
        }
    }
}

/// Compiled signal: identifier plus its alternatives.
struct SignalMatcher {
    id: &'static str,
    patterns: Vec<Regex>,
}

/// Emergency detector compiled from a [`Lexicon`].
pub struct EmergencyDetector {
    signals: Vec<SignalMatcher>,
    advice: &'static str,
}

impl EmergencyDetector {
    /// Compiles every emergency pattern of the lexicon.
    pub fn new(lexicon: &Lexicon) -> Result<Self, AppError> {
        let signals = lexicon
            .emergency_signals
            .iter()
            .map(|signal| {
                let patterns = signal
                    .patterns
                    .iter()
                    .map(|p| phrase_matcher(p))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(SignalMatcher {
                    id: signal.id,
                    patterns,
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        Ok(Self {
            signals,
            advice: lexicon.emergency_advice,
        })
    }

    /// Scans raw text.
    pub fn detect(&self, text: &str) -> EmergencyCheck {
        self.detect_normalized(&normalize(text))
    }

    /// Scans text that already went through [`normalize`].
    pub fn detect_normalized(&self, normalized: &str) -> EmergencyCheck {
        let matched_signals: Vec<String> = self
            .signals
            .iter()
            .filter(|signal| signal.patterns.iter().any(|p| p.is_match(normalized)))
            .map(|signal| signal.id.to_string())
            .collect();

        if matched_signals.is_empty() {
            return EmergencyCheck::clear();
        }

        EmergencyCheck {
            is_emergency: true,
            matched_signals,
            advice: self.advice.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> EmergencyDetector {
        EmergencyDetector::new(&Lexicon::builtin()).expect("builtin lexicon compiles")
    }

    #[test]
    fn test_chest_pain_and_breathing() {
        let check = detector().detect("I have chest pain and can't breathe");
        assert!(check.is_emergency);
        assert_eq!(
            check.matched_signals,
            vec!["chest_pain".to_string(), "breathing_difficulty".to_string()]
        );
        assert!(!check.advice.is_empty());
    }

    #[test]
    fn test_signals_follow_lexicon_order() {
        // Text order is reversed relative to the lexicon.
        let check = detector().detect("Choking!! and also CHEST PAIN");
        assert_eq!(check.matched_signals[0], "chest_pain");
        assert_eq!(check.matched_signals[1], "breathing_difficulty");
    }

    #[test]
    fn test_no_emergency_has_empty_advice() {
        let check = detector().detect("I have a mild headache");
        assert!(!check.is_emergency);
        assert!(check.matched_signals.is_empty());
        assert!(check.advice.is_empty());
    }

    #[test]
    fn test_requires_word_boundaries() {
        // "strokes" of a brush, "poisonous" snake: neither is a whole-word match.
        let check = detector().detect("I practiced brushstrokes near a poisonous plant");
        assert!(!check.is_emergency);
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        let d = detector();
        assert_eq!(
            d.detect("he PASSED-OUT... unresponsive"),
            d.detect("he passed out unresponsive")
        );
    }
}
