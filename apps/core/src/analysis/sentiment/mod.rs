//! Sentiment Analysis.
//!
//! Two interchangeable strategies produce the same [`SentimentResult`]:
//! - an ML model behind the [`SentimentModel`] capability (loaded lazily,
//!   at most once per process, see [`backend::MlBackend`]);
//! - a deterministic lexicon scorer ([`rule_based::RuleBasedSentiment`]).
//!
//! The strategy is resolved once when the [`SentimentAnalyzer`] is built and
//! never re-checked per call.

pub mod backend;
pub mod embedding;
pub mod rule_based;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

use crate::error::AppError;
use backend::MlBackend;
use rule_based::RuleBasedSentiment;

/// Sentiment polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Negative,
    Neutral,
    Positive,
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Positive => "positive",
        };
        write!(f, "{}", label)
    }
}

/// Which strategy produced a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentMethod {
    #[serde(rename = "ml-backend")]
    MlBackend,
    #[serde(rename = "rule-based")]
    RuleBased,
}

/// Uniform sentiment output, whatever the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    /// Signed compound score in [-1.0, 1.0].
    pub score: f32,
    pub method: SentimentMethod,
}

impl SentimentResult {
    pub fn is_negative(&self) -> bool {
        self.label == SentimentLabel::Negative
    }
}

/// Probability distribution over the three classes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    pub negative: f32,
    pub neutral: f32,
    pub positive: f32,
}

impl ClassProbabilities {
    /// Rescales so the three values sum to 1.0 (uniform if they sum to 0).
    pub fn normalized(&self) -> Self {
        let n = self.negative.max(0.0);
        let u = self.neutral.max(0.0);
        let p = self.positive.max(0.0);
        let total = n + u + p;
        if total <= f32::EPSILON {
            return Self {
                negative: 1.0 / 3.0,
                neutral: 1.0 / 3.0,
                positive: 1.0 / 3.0,
            };
        }
        Self {
            negative: n / total,
            neutral: u / total,
            positive: p / total,
        }
    }

    /// Most probable class; ties resolve toward neutral, then negative.
    pub fn argmax(&self) -> SentimentLabel {
        if self.neutral >= self.negative && self.neutral >= self.positive {
            SentimentLabel::Neutral
        } else if self.negative >= self.positive {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Positive
        }
    }

    /// `P(positive) - P(negative)`.
    pub fn compound(&self) -> f32 {
        (self.positive - self.negative).clamp(-1.0, 1.0)
    }
}

/// Raw output of an ML sentiment model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPrediction {
    pub label: SentimentLabel,
    pub probabilities: ClassProbabilities,
}

/// Capability interface of a pretrained sentiment classifier.
pub trait SentimentModel: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Scores one text.
    fn score_sentiment(&self, text: &str) -> Result<ModelPrediction, AppError>;
}

enum Strategy {
    Ml(Arc<dyn SentimentModel>),
    RuleBased,
}

/// Sentiment analyzer with its strategy fixed at construction.
pub struct SentimentAnalyzer {
    strategy: Strategy,
    fallback: RuleBasedSentiment,
}

impl SentimentAnalyzer {
    /// Resolves the strategy: the ML model if `backend` initializes, the
    /// rule-based scorer otherwise.
    pub fn resolve(backend: &MlBackend, fallback: RuleBasedSentiment) -> Self {
        let strategy = match backend.model() {
            Some(model) => Strategy::Ml(model),
            None => Strategy::RuleBased,
        };
        Self { strategy, fallback }
    }

    /// Analyzer that never consults an ML model.
    pub fn rule_based(fallback: RuleBasedSentiment) -> Self {
        Self {
            strategy: Strategy::RuleBased,
            fallback,
        }
    }

    /// Whether the ML strategy was selected.
    pub fn ml_available(&self) -> bool {
        matches!(self.strategy, Strategy::Ml(_))
    }

    /// Scores text with the resolved strategy.
    ///
    /// The ML label is the argmax of the normalized distribution, so label and
    /// score never disagree whatever the model reports as its own label.
    /// A model error on a single text falls back to the rule-based scorer
    /// for that call only; `method` reports the scorer actually used.
    pub fn analyze(&self, text: &str) -> SentimentResult {
        match &self.strategy {
            Strategy::Ml(model) => match model.score_sentiment(text) {
                Ok(prediction) => {
                    let probabilities = prediction.probabilities.normalized();
                    SentimentResult {
                        label: probabilities.argmax(),
                        score: probabilities.compound(),
                        method: SentimentMethod::MlBackend,
                    }
                }
                Err(e) => {
                    warn!(
                        "Sentiment model '{}' failed, using rule-based scoring for this text: {}",
                        model.name(),
                        e
                    );
                    self.fallback.analyze(text)
                }
            },
            Strategy::RuleBased => self.fallback.analyze(text),
        }
    }
}
