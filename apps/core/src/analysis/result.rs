//! Output records of the analysis engine.

use serde::{Deserialize, Serialize};

use super::categories::{CategoryScores, HealthCategory, MatchedTerms};
use super::emergency::EmergencyCheck;
use super::sentiment::{SentimentMethod, SentimentResult};
use super::urgency::UrgencyLevel;
use crate::error::AppError;

/// Which sentiment path produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisMethod {
    #[serde(rename = "ml-enhanced")]
    MlEnhanced,
    #[serde(rename = "rule-based")]
    RuleBased,
}

impl From<SentimentMethod> for AnalysisMethod {
    fn from(method: SentimentMethod) -> Self {
        match method {
            SentimentMethod::MlBackend => AnalysisMethod::MlEnhanced,
            SentimentMethod::RuleBased => AnalysisMethod::RuleBased,
        }
    }
}

/// Full analysis of one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub emergency_check: EmergencyCheck,
    pub health_categories: CategoryScores,
    pub sentiment_analysis: SentimentResult,
    pub urgency_level: UrgencyLevel,
    pub health_advice: Vec<String>,
    pub recommendation: String,
    pub analysis_method: AnalysisMethod,
    pub ml_available: bool,
    pub matched_terms: MatchedTerms,
}

impl AnalysisResult {
    /// One-line digest for logs.
    pub fn summary(&self) -> String {
        let top = self
            .health_categories
            .top()
            .map(|c| c.label())
            .unwrap_or("none");
        format!(
            "urgency={} top_category={} sentiment={}({:.2}) emergency_signals={} advice={} method={:?}",
            self.urgency_level,
            top,
            self.sentiment_analysis.label,
            self.sentiment_analysis.score,
            self.emergency_check.matched_signals.len(),
            self.health_advice.len(),
            self.analysis_method,
        )
    }
}

/// Failure of one item inside a batch or row call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemError {
    /// Position of the item in the input.
    pub index: usize,
    /// Machine-readable error kind, e.g. `validation_error`.
    pub kind: String,
    pub message: String,
}

impl ItemError {
    pub fn new(index: usize, err: &AppError) -> Self {
        Self {
            index,
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

/// Result-or-error slot of a batch output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "lowercase")]
pub enum ItemOutcome {
    Ok(Box<AnalysisResult>),
    Error(ItemError),
}

impl ItemOutcome {
    pub fn from_result(index: usize, result: Result<AnalysisResult, AppError>) -> Self {
        match result {
            Ok(analysis) => ItemOutcome::Ok(Box::new(analysis)),
            Err(e) => ItemOutcome::Error(ItemError::new(index, &e)),
        }
    }

    pub fn as_result(&self) -> Option<&AnalysisResult> {
        match self {
            ItemOutcome::Ok(result) => Some(&**result),
            ItemOutcome::Error(_) => None,
        }
    }

    pub fn as_error(&self) -> Option<&ItemError> {
        match self {
            ItemOutcome::Ok(_) => None,
            ItemOutcome::Error(e) => Some(e),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ItemOutcome::Ok(_))
    }
}

/// Counters over a batch output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub valid: usize,
    pub errors: usize,
    pub urgency: UrgencyDistribution,
    /// Results whose category score exceeds the relevance threshold.
    pub categories: CategoryDistribution,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrgencyDistribution {
    pub low: usize,
    pub medium: usize,
    pub emergency: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDistribution {
    pub physical_symptoms: usize,
    pub mental_health: usize,
    pub chronic_conditions: usize,
    pub lifestyle: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[ItemOutcome], relevance_threshold: f32) -> Self {
        let mut summary = BatchSummary {
            total: outcomes.len(),
            ..Default::default()
        };

        for result in outcomes.iter().filter_map(ItemOutcome::as_result) {
            summary.valid += 1;
            match result.urgency_level {
                UrgencyLevel::Low => summary.urgency.low += 1,
                UrgencyLevel::Medium => summary.urgency.medium += 1,
                UrgencyLevel::Emergency => summary.urgency.emergency += 1,
            }
            for (category, score) in result.health_categories.iter() {
                if score <= relevance_threshold {
                    continue;
                }
                let slot = match category {
                    HealthCategory::PhysicalSymptoms => &mut summary.categories.physical_symptoms,
                    HealthCategory::MentalHealth => &mut summary.categories.mental_health,
                    HealthCategory::ChronicConditions => &mut summary.categories.chronic_conditions,
                    HealthCategory::Lifestyle => &mut summary.categories.lifestyle,
                };
                *slot += 1;
            }
        }
        summary.errors = summary.total - summary.valid;
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_error_carries_kind() {
        let err = ItemError::new(3, &AppError::Validation("Text is empty".to_string()));
        assert_eq!(err.index, 3);
        assert_eq!(err.kind, "validation_error");
        assert!(err.message.contains("Text is empty"));
    }

    #[test]
    fn test_outcome_serialization_is_tagged() {
        let outcome = ItemOutcome::from_result(0, Err(AppError::Validation("empty".into())));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["data"]["kind"], "validation_error");
    }

    #[test]
    fn test_method_mapping() {
        assert_eq!(
            AnalysisMethod::from(SentimentMethod::MlBackend),
            AnalysisMethod::MlEnhanced
        );
        assert_eq!(
            serde_json::to_string(&AnalysisMethod::RuleBased).unwrap(),
            "\"rule-based\""
        );
    }

    #[test]
    fn test_summary_of_errors_only() {
        let outcomes = vec![
            ItemOutcome::from_result(0, Err(AppError::Validation("empty".into()))),
            ItemOutcome::from_result(1, Err(AppError::Timeout("slow".into()))),
        ];
        let summary = BatchSummary::from_outcomes(&outcomes, 0.3);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.valid, 0);
        assert_eq!(summary.errors, 2);
    }
}
