//! Urgency Assessment.
//!
//! First match wins: emergency signals, then strong chronic / mental-health
//! scores or strongly negative sentiment, then low.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::categories::CategoryScores;
use super::emergency::EmergencyCheck;
use super::sentiment::SentimentResult;
use crate::config::AnalyzerConfig;

/// Ordinal urgency, `Low < Medium < Emergency`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Low,
    Medium,
    Emergency,
}

impl UrgencyLevel {
    pub fn label(&self) -> &'static str {
        match self {
            UrgencyLevel::Low => "low",
            UrgencyLevel::Medium => "medium",
            UrgencyLevel::Emergency => "emergency",
        }
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct UrgencyAssessor {
    chronic_threshold: f32,
    mental_threshold: f32,
    negative_score: f32,
}

impl Default for UrgencyAssessor {
    fn default() -> Self {
        Self::from_config(&AnalyzerConfig::default())
    }
}

impl UrgencyAssessor {
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self {
            chronic_threshold: config.chronic_medium_threshold,
            mental_threshold: config.mental_medium_threshold,
            negative_score: config.negative_medium_score,
        }
    }

    pub fn assess(
        &self,
        emergency: &EmergencyCheck,
        categories: &CategoryScores,
        sentiment: &SentimentResult,
    ) -> UrgencyLevel {
        if emergency.is_emergency {
            return UrgencyLevel::Emergency;
        }

        let strongly_negative =
            sentiment.is_negative() && sentiment.score <= self.negative_score;
        if categories.chronic_conditions >= self.chronic_threshold
            || categories.mental_health >= self.mental_threshold
            || strongly_negative
        {
            return UrgencyLevel::Medium;
        }

        UrgencyLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::sentiment::{SentimentLabel, SentimentMethod};

    fn sentiment(label: SentimentLabel, score: f32) -> SentimentResult {
        SentimentResult {
            label,
            score,
            method: SentimentMethod::RuleBased,
        }
    }

    fn emergency() -> EmergencyCheck {
        EmergencyCheck {
            is_emergency: true,
            matched_signals: vec!["chest_pain".to_string()],
            advice: "call".to_string(),
        }
    }

    #[test]
    fn test_ordering() {
        assert!(UrgencyLevel::Low < UrgencyLevel::Medium);
        assert!(UrgencyLevel::Medium < UrgencyLevel::Emergency);
    }

    #[test]
    fn test_emergency_dominates() {
        let level = UrgencyAssessor::default().assess(
            &emergency(),
            &CategoryScores::default(),
            &sentiment(SentimentLabel::Positive, 0.9),
        );
        assert_eq!(level, UrgencyLevel::Emergency);
    }

    #[test]
    fn test_medium_triggers() {
        let a = UrgencyAssessor::default();
        let neutral = sentiment(SentimentLabel::Neutral, 0.0);

        let chronic = CategoryScores {
            chronic_conditions: 0.5,
            ..Default::default()
        };
        assert_eq!(a.assess(&EmergencyCheck::clear(), &chronic, &neutral), UrgencyLevel::Medium);

        let mental = CategoryScores {
            mental_health: 0.67,
            ..Default::default()
        };
        assert_eq!(a.assess(&EmergencyCheck::clear(), &mental, &neutral), UrgencyLevel::Medium);

        let sad = sentiment(SentimentLabel::Negative, -0.5);
        assert_eq!(
            a.assess(&EmergencyCheck::clear(), &CategoryScores::default(), &sad),
            UrgencyLevel::Medium
        );
    }

    #[test]
    fn test_mildly_negative_stays_low() {
        let level = UrgencyAssessor::default().assess(
            &EmergencyCheck::clear(),
            &CategoryScores {
                mental_health: 0.34,
                ..Default::default()
            },
            &sentiment(SentimentLabel::Negative, -0.49),
        );
        assert_eq!(level, UrgencyLevel::Low);
    }

    #[test]
    fn test_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&UrgencyLevel::Emergency).unwrap(),
            "\"emergency\""
        );
    }
}
