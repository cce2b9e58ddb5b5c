//! Lexicon-based sentiment scoring (fallback strategy).
//!
//! Each sentiment word contributes its signed valence. An intensifier right
//! before the word scales it; a negation within the previous
//! [`NEGATION_WINDOW`] tokens flips and dampens it. The sum is squashed
//! into [-1, 1] with `x / sqrt(x^2 + ALPHA)`.

use std::collections::{HashMap, HashSet};

use super::{SentimentLabel, SentimentMethod, SentimentResult};
use crate::analysis::lexicon::Lexicon;
use crate::analysis::normalize::{normalize, tokens};

/// Smoothing constant of the squashing function.
const ALPHA: f32 = 15.0;
/// Factor applied to a negated word.
const NEGATION_SCALAR: f32 = -0.74;
/// How many preceding tokens a negation reaches.
const NEGATION_WINDOW: usize = 3;

/// Deterministic rule-based sentiment scorer.
#[derive(Debug, Clone)]
pub struct RuleBasedSentiment {
    valence: HashMap<&'static str, f32>,
    intensifiers: HashMap<&'static str, f32>,
    negations: HashSet<&'static str>,
    label_threshold: f32,
}

impl RuleBasedSentiment {
    /// `label_threshold` is the half-width of the neutral band.
    pub fn new(lexicon: &Lexicon, label_threshold: f32) -> Self {
        Self {
            valence: lexicon.sentiment.valence.iter().copied().collect(),
            intensifiers: lexicon.sentiment.intensifiers.iter().copied().collect(),
            negations: lexicon.sentiment.negations.iter().copied().collect(),
            label_threshold,
        }
    }

    /// Scores raw text.
    pub fn analyze(&self, text: &str) -> SentimentResult {
        self.analyze_normalized(&normalize(text))
    }

    /// Scores text that already went through `normalize`.
    pub fn analyze_normalized(&self, normalized: &str) -> SentimentResult {
        let score = squash(self.raw_sum(&tokens(normalized)));
        SentimentResult {
            label: self.label_for(score),
            score,
            method: SentimentMethod::RuleBased,
        }
    }

    fn raw_sum(&self, words: &[&str]) -> f32 {
        let mut sum = 0.0;
        for (i, word) in words.iter().enumerate() {
            let Some(&valence) = self.valence.get(word) else {
                continue;
            };
            let mut weight = valence;

            if i > 0 {
                if let Some(&factor) = self.intensifiers.get(words[i - 1]) {
                    weight *= factor;
                }
            }

            let window_start = i.saturating_sub(NEGATION_WINDOW);
            if words[window_start..i]
                .iter()
                .any(|w| self.negations.contains(w))
            {
                weight *= NEGATION_SCALAR;
            }

            sum += weight;
        }
        sum
    }

    fn label_for(&self, score: f32) -> SentimentLabel {
        if score > self.label_threshold {
            SentimentLabel::Positive
        } else if score < -self.label_threshold {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

fn squash(sum: f32) -> f32 {
    if sum == 0.0 {
        return 0.0;
    }
    (sum / (sum * sum + ALPHA).sqrt()).clamp(-1.0, 1.0)
}
