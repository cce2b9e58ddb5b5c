//! # Analysis Module
//!
//! Rule-driven health text analysis with an optional ML sentiment model.
//!
//! ## Components
//! - `lexicon`: static keyword, phrase and advice tables
//! - `normalize`: text normalization and whole-word matchers
//! - `emergency`: emergency phrase detection
//! - `categories`: health category scoring
//! - `sentiment`: ML / rule-based sentiment with a one-shot backend
//! - `urgency`: urgency level decision
//! - `advice`: advice list and recommendation
//! - `result`: output records
//! - `analyzer`: main orchestrator

pub mod advice;
pub mod analyzer;
pub mod categories;
pub mod emergency;
pub mod lexicon;
pub mod normalize;
pub mod result;
pub mod sentiment;
pub mod urgency;

pub use analyzer::{detect_text_column, HealthAnalyzer, TEXT_COLUMN_CANDIDATES};
pub use categories::{CategoryScores, HealthCategory, MatchedTerms};
pub use emergency::EmergencyCheck;
pub use lexicon::Lexicon;
pub use result::{AnalysisMethod, AnalysisResult, BatchSummary, ItemError, ItemOutcome};
pub use sentiment::backend::MlBackend;
pub use sentiment::{SentimentLabel, SentimentMethod, SentimentModel, SentimentResult};
pub use urgency::UrgencyLevel;
