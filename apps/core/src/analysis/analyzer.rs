//! Health Analyzer - Main orchestrator of the analysis pipeline.
//!
//! text -> emergency detector | category classifier | sentiment analyzer
//!      -> urgency assessor -> advice generator -> [`AnalysisResult`]
//!
//! The three first stages are independent of each other; urgency consumes
//! all three and advice consumes categories, urgency and sentiment.

use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::advice::AdviceGenerator;
use super::categories::CategoryClassifier;
use super::emergency::EmergencyDetector;
use super::lexicon::Lexicon;
use super::normalize::normalize;
use super::result::{AnalysisMethod, AnalysisResult, BatchSummary, ItemError, ItemOutcome};
use super::sentiment::backend::MlBackend;
use super::sentiment::rule_based::RuleBasedSentiment;
use super::sentiment::SentimentAnalyzer;
use super::urgency::UrgencyAssessor;
use crate::config::AnalyzerConfig;
use crate::error::AppError;

/// Column names tried, in order, when a row input names no text column.
pub const TEXT_COLUMN_CANDIDATES: &[&str] = &["text", "symptoms", "issue", "concern", "description"];

/// Cell values treated as missing.
const MISSING_CELL: &str = "nan";

/// Main analyzer: owns one instance of every pipeline component.
pub struct HealthAnalyzer {
    config: AnalyzerConfig,
    lexicon: Arc<Lexicon>,
    emergency: EmergencyDetector,
    categories: CategoryClassifier,
    sentiment: SentimentAnalyzer,
    urgency: UrgencyAssessor,
    advice: AdviceGenerator,
}

impl HealthAnalyzer {
    /// Builds an analyzer on the process-wide ML backend (loading it if
    /// this is the first analyzer and `ml_enabled` is set).
    pub fn new(config: AnalyzerConfig) -> Result<Self, AppError> {
        let backend = if config.ml_enabled {
            MlBackend::global(&config)
        } else {
            Arc::new(MlBackend::disabled())
        };
        Self::with_backend(config, &backend)
    }

    /// Analyzer that never loads a model.
    pub fn rule_based() -> Result<Self, AppError> {
        Self::with_backend(AnalyzerConfig::rule_based(), &MlBackend::disabled())
    }

    /// Builds an analyzer with an explicit backend and the built-in lexicon.
    pub fn with_backend(config: AnalyzerConfig, backend: &MlBackend) -> Result<Self, AppError> {
        Self::with_lexicon(config, Arc::new(Lexicon::builtin()), backend)
    }

    pub fn with_lexicon(
        config: AnalyzerConfig,
        lexicon: Arc<Lexicon>,
        backend: &MlBackend,
    ) -> Result<Self, AppError> {
        config.check()?;

        let fallback = RuleBasedSentiment::new(&lexicon, config.sentiment_label_threshold);
        let sentiment = SentimentAnalyzer::resolve(backend, fallback);
        info!(
            "Health analyzer ready (lexicon v{}, sentiment: {})",
            lexicon.version,
            if sentiment.ml_available() { "ml" } else { "rule-based" }
        );

        Ok(Self {
            emergency: EmergencyDetector::new(&lexicon)?,
            categories: CategoryClassifier::new(&lexicon, config.category_normalization)?,
            sentiment,
            urgency: UrgencyAssessor::from_config(&config),
            advice: AdviceGenerator::new(lexicon.clone(), &config),
            lexicon,
            config,
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Whether the ML sentiment strategy was selected for this analyzer.
    pub fn ml_available(&self) -> bool {
        self.sentiment.ml_available()
    }

    /// Analyzes one text. Empty or whitespace-only text is a validation error.
    pub fn analyze_one(&self, text: &str) -> Result<AnalysisResult, AppError> {
        if text.trim().is_empty() {
            return Err(AppError::Validation("Text must not be empty".to_string()));
        }

        let normalized = normalize(text);
        let emergency_check = self.emergency.detect_normalized(&normalized);
        let (health_categories, matched_terms) = self.categories.classify_normalized(&normalized);
        let sentiment_analysis = self.sentiment.analyze(text);

        let urgency_level =
            self.urgency
                .assess(&emergency_check, &health_categories, &sentiment_analysis);
        let (health_advice, recommendation) = self.advice.generate(
            &health_categories,
            &matched_terms,
            urgency_level,
            &sentiment_analysis,
        );

        let result = AnalysisResult {
            analysis_method: AnalysisMethod::from(sentiment_analysis.method),
            ml_available: self.ml_available(),
            emergency_check,
            health_categories,
            sentiment_analysis,
            urgency_level,
            health_advice,
            recommendation,
            matched_terms,
        };
        debug!("Analysis: {}", result.summary());
        Ok(result)
    }

    /// Analyzes each text independently; output order matches input order.
    /// Fails as a whole only when more than `max_batch_items` are submitted.
    #[instrument(skip(self, texts), fields(batch_id = %Uuid::new_v4(), items = texts.len()))]
    pub fn analyze_batch<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<ItemOutcome>, AppError> {
        check_limit(self.config.max_batch_items, texts.len())?;

        let outcomes: Vec<ItemOutcome> = texts
            .iter()
            .enumerate()
            .map(|(index, text)| ItemOutcome::from_result(index, self.analyze_one(text.as_ref())))
            .collect();
        self.log_summary(&outcomes);
        Ok(outcomes)
    }

    /// Analyzes the `text_column` cell of every row.
    ///
    /// Fails as a whole when more than `max_rows` rows are submitted or when
    /// a row lacks the column. Empty and `nan` cells are per-row validation
    /// errors.
    #[instrument(skip(self, rows), fields(batch_id = %Uuid::new_v4(), rows = rows.len()))]
    pub fn analyze_rows(
        &self,
        rows: &[HashMap<String, String>],
        text_column: &str,
    ) -> Result<Vec<ItemOutcome>, AppError> {
        check_limit(self.config.max_rows, rows.len())?;

        if let Some(row) = rows.iter().find(|row| !row.contains_key(text_column)) {
            let mut available: Vec<&str> = row.keys().map(String::as_str).collect();
            available.sort_unstable();
            return Err(AppError::Schema(format!(
                "Column '{}' not found. Available columns: {}",
                text_column,
                available.join(", ")
            )));
        }

        let outcomes: Vec<ItemOutcome> = rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let cell = row.get(text_column).map(String::as_str).unwrap_or("");
                let result = if cell.trim().eq_ignore_ascii_case(MISSING_CELL) {
                    Err(AppError::Validation(format!("Row {} has no text", index)))
                } else {
                    self.analyze_one(cell)
                };
                ItemOutcome::from_result(index, result)
            })
            .collect();
        self.log_summary(&outcomes);
        Ok(outcomes)
    }

    /// Same as [`HealthAnalyzer::analyze_batch`], with items running on the
    /// blocking pool. Each item is bounded by `item_timeout_ms` when set; a
    /// timed out item becomes a `timeout_error` slot and its siblings carry on.
    #[instrument(skip(self, texts), fields(batch_id = %Uuid::new_v4(), items = texts.len()))]
    pub async fn analyze_batch_concurrent(
        self: &Arc<Self>,
        texts: Vec<String>,
    ) -> Result<Vec<ItemOutcome>, AppError> {
        check_limit(self.config.max_batch_items, texts.len())?;
        let deadline = self.config.item_timeout_ms.map(Duration::from_millis);

        let tasks = texts.into_iter().enumerate().map(|(index, text)| {
            let analyzer = Arc::clone(self);
            async move {
                let handle = tokio::task::spawn_blocking(move || analyzer.analyze_one(&text));
                let joined = match deadline {
                    Some(limit) => match tokio::time::timeout(limit, handle).await {
                        Ok(joined) => joined,
                        Err(elapsed) => {
                            warn!("Item {} exceeded {:?}", index, limit);
                            return ItemOutcome::Error(ItemError::new(index, &AppError::from(elapsed)));
                        }
                    },
                    None => handle.await,
                };
                let result = joined.map_err(AppError::from).and_then(|r| r);
                ItemOutcome::from_result(index, result)
            }
        });

        let outcomes = join_all(tasks).await;
        self.log_summary(&outcomes);
        Ok(outcomes)
    }

    /// Aggregate counters over a batch output.
    pub fn summarize(&self, outcomes: &[ItemOutcome]) -> BatchSummary {
        BatchSummary::from_outcomes(outcomes, self.config.relevance_threshold)
    }

    fn log_summary(&self, outcomes: &[ItemOutcome]) {
        let summary = self.summarize(outcomes);
        info!(
            "Batch done: {} items, {} valid, {} errors, {} emergencies",
            summary.total, summary.valid, summary.errors, summary.urgency.emergency
        );
    }
}

/// First candidate column present in the rows (case-insensitive), returned
/// with the casing used by the rows.
pub fn detect_text_column(rows: &[HashMap<String, String>]) -> Option<String> {
    let first = rows.first()?;
    TEXT_COLUMN_CANDIDATES.iter().find_map(|candidate| {
        first
            .keys()
            .find(|key| key.trim().eq_ignore_ascii_case(candidate))
            .cloned()
    })
}

fn check_limit(limit: usize, actual: usize) -> Result<(), AppError> {
    if actual > limit {
        return Err(AppError::LimitExceeded { limit, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::urgency::UrgencyLevel;

    fn analyzer() -> HealthAnalyzer {
        HealthAnalyzer::rule_based().expect("rule-based analyzer builds")
    }

    fn row(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_text_rejected() {
        let a = analyzer();
        assert!(matches!(a.analyze_one(""), Err(AppError::Validation(_))));
        assert!(matches!(a.analyze_one(" \n\t "), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_emergency_example() {
        let result = analyzer()
            .analyze_one("I have chest pain and can't breathe")
            .unwrap();
        assert!(result.emergency_check.is_emergency);
        assert_eq!(result.urgency_level, UrgencyLevel::Emergency);
        assert_eq!(
            result.recommendation,
            "Seek immediate medical attention or call emergency services"
        );
    }

    #[test]
    fn test_rule_based_flags() {
        let result = analyzer().analyze_one("I feel a little tired").unwrap();
        assert_eq!(result.analysis_method, AnalysisMethod::RuleBased);
        assert!(!result.ml_available);
    }

    #[test]
    fn test_batch_limit() {
        let texts = vec!["headache"; 21];
        match analyzer().analyze_batch(&texts) {
            Err(AppError::LimitExceeded { limit, actual }) => {
                assert_eq!(limit, 20);
                assert_eq!(actual, 21);
            }
            other => panic!("expected limit error, got {:?}", other),
        }
    }

    #[test]
    fn test_rows_missing_column_is_schema_error() {
        let rows = vec![row(&[("symptoms", "fever")]), row(&[("notes", "cough")])];
        match analyzer().analyze_rows(&rows, "symptoms") {
            Err(AppError::Schema(msg)) => assert!(msg.contains("notes")),
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_rows_nan_cell_is_item_error() {
        let rows = vec![row(&[("text", "I have a fever")]), row(&[("text", "nan")])];
        let outcomes = analyzer().analyze_rows(&rows, "text").unwrap();
        assert!(outcomes[0].is_ok());
        assert_eq!(outcomes[1].as_error().unwrap().kind, "validation_error");
    }

    #[test]
    fn test_detect_text_column() {
        let rows = vec![row(&[("ID", "1"), ("Symptoms", "fever")])];
        assert_eq!(detect_text_column(&rows), Some("Symptoms".to_string()));
        assert_eq!(detect_text_column(&[row(&[("id", "1")])]), None);
        assert_eq!(detect_text_column(&[]), None);
    }
}
