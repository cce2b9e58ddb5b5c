//! Sentiment Tests
//!
//! Strategy selection as seen through the analyzer: a loaded model yields
//! ml-enhanced results, an unavailable or failing one yields rule-based
//! results with the right flags.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::analysis::sentiment::{ClassProbabilities, ModelPrediction};
use crate::analysis::{
    AnalysisMethod, HealthAnalyzer, MlBackend, SentimentLabel, SentimentMethod, SentimentModel,
    UrgencyLevel,
};
use crate::config::AnalyzerConfig;
use crate::error::AppError;

/// Model answering with fixed probabilities and counting its calls.
struct MockModel {
    probabilities: ClassProbabilities,
    calls: AtomicUsize,
}

impl MockModel {
    fn new(negative: f32, neutral: f32, positive: f32) -> Self {
        Self {
            probabilities: ClassProbabilities {
                negative,
                neutral,
                positive,
            },
            calls: AtomicUsize::new(0),
        }
    }
}

impl SentimentModel for MockModel {
    fn name(&self) -> &str {
        "mock"
    }

    fn score_sentiment(&self, _text: &str) -> Result<ModelPrediction, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ModelPrediction {
            label: self.probabilities.argmax(),
            probabilities: self.probabilities,
        })
    }
}

/// Model that fails on texts containing "boom".
struct FlakyModel;

impl SentimentModel for FlakyModel {
    fn name(&self) -> &str {
        "flaky"
    }

    fn score_sentiment(&self, text: &str) -> Result<ModelPrediction, AppError> {
        if text.contains("boom") {
            return Err(AppError::BackendUnavailable("inference crashed".to_string()));
        }
        let probabilities = ClassProbabilities {
            negative: 0.1,
            neutral: 0.8,
            positive: 0.1,
        };
        Ok(ModelPrediction {
            label: SentimentLabel::Neutral,
            probabilities,
        })
    }
}

/// Claims a positive label while its probabilities say negative.
struct ContradictoryModel;

impl SentimentModel for ContradictoryModel {
    fn name(&self) -> &str {
        "contradictory"
    }

    fn score_sentiment(&self, _text: &str) -> Result<ModelPrediction, AppError> {
        Ok(ModelPrediction {
            label: SentimentLabel::Positive,
            probabilities: ClassProbabilities {
                negative: 0.8,
                neutral: 0.1,
                positive: 0.1,
            },
        })
    }
}

fn with_model(model: Arc<dyn SentimentModel>) -> HealthAnalyzer {
    HealthAnalyzer::with_backend(AnalyzerConfig::rule_based(), &MlBackend::from_model(model))
        .expect("analyzer builds")
}

#[cfg(test)]
mod strategy_tests {
    use super::*;

    #[test]
    fn test_loaded_model_gives_ml_enhanced() {
        let model = Arc::new(MockModel::new(0.05, 0.15, 0.8));
        let a = with_model(model.clone());
        assert!(a.ml_available());

        let result = a.analyze_one("I feel okay").unwrap();
        assert_eq!(result.analysis_method, AnalysisMethod::MlEnhanced);
        assert_eq!(result.sentiment_analysis.method, SentimentMethod::MlBackend);
        assert_eq!(result.sentiment_analysis.label, SentimentLabel::Positive);
        assert!(result.ml_available);
        assert!((result.sentiment_analysis.score - 0.75).abs() < 1e-5);
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_model_negativity_drives_urgency() {
        let a = with_model(Arc::new(MockModel::new(0.9, 0.05, 0.05)));
        let result = a.analyze_one("Today was a day").unwrap();
        assert_eq!(result.sentiment_analysis.label, SentimentLabel::Negative);
        assert_eq!(result.urgency_level, UrgencyLevel::Medium);
    }

    #[test]
    fn test_contradictory_label_does_not_hide_negativity() {
        let a = with_model(Arc::new(ContradictoryModel));
        let result = a.analyze_one("Today was a day").unwrap();
        assert_eq!(result.sentiment_analysis.label, SentimentLabel::Negative);
        assert!((result.sentiment_analysis.score + 0.7).abs() < 1e-5);
        assert_eq!(result.urgency_level, UrgencyLevel::Medium);
    }

    #[test]
    fn test_unnormalized_probabilities_are_rescaled() {
        let a = with_model(Arc::new(MockModel::new(2.0, 1.0, 1.0)));
        let score = a.analyze_one("anything").unwrap().sentiment_analysis.score;
        assert!((score + 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_failing_item_falls_back_alone() {
        let a = with_model(Arc::new(FlakyModel));
        let outcomes = a
            .analyze_batch(&["boom, I feel terrible", "I feel terrible"])
            .unwrap();

        let failed = outcomes[0].as_result().unwrap();
        assert_eq!(failed.analysis_method, AnalysisMethod::RuleBased);
        assert_eq!(failed.sentiment_analysis.method, SentimentMethod::RuleBased);
        assert_eq!(failed.sentiment_analysis.label, SentimentLabel::Negative);
        assert!(failed.ml_available);

        let ok = outcomes[1].as_result().unwrap();
        assert_eq!(ok.analysis_method, AnalysisMethod::MlEnhanced);
        assert_eq!(ok.sentiment_analysis.label, SentimentLabel::Neutral);
    }

    #[test]
    fn test_failed_load_means_rule_based_everywhere() {
        let backend =
            MlBackend::new(|| Err(AppError::BackendUnavailable("model files missing".into())));
        let a = HealthAnalyzer::with_backend(AnalyzerConfig::default(), &backend).unwrap();
        assert!(!a.ml_available());
        assert!(!backend.is_ready());

        for text in ["I feel great", "I have a fever", "I feel awful"] {
            let result = a.analyze_one(text).unwrap();
            assert_eq!(result.analysis_method, AnalysisMethod::RuleBased);
            assert!(!result.ml_available);
        }
    }

    #[test]
    fn test_backend_shared_between_analyzers_loads_once() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = loads.clone();
        let backend = MlBackend::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(MockModel::new(0.1, 0.8, 0.1)) as Arc<dyn SentimentModel>)
        });

        let first = HealthAnalyzer::with_backend(AnalyzerConfig::rule_based(), &backend).unwrap();
        let second = HealthAnalyzer::with_backend(AnalyzerConfig::rule_based(), &backend).unwrap();
        assert!(first.ml_available() && second.ml_available());
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_scores_comparable_across_strategies() {
        let ml = with_model(Arc::new(MockModel::new(0.0, 0.0, 1.0)));
        let rules = HealthAnalyzer::rule_based().unwrap();
        for text in ["I feel great and happy", "terrible awful pain"] {
            for a in [&ml, &rules] {
                let score = a.analyze_one(text).unwrap().sentiment_analysis.score;
                assert!((-1.0..=1.0).contains(&score));
            }
        }
    }
}
