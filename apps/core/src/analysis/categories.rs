//! Health Category Classification.
//!
//! Counts distinct lexicon terms per category and normalizes the count:
//! `score = min(1.0, hits / normalization)`. Repeating a term does not
//! raise its category's score.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::lexicon::Lexicon;
use super::normalize::{normalize, term_matcher};
use crate::error::AppError;

/// The four fixed health-concern groupings, in tie-break priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthCategory {
    PhysicalSymptoms,
    MentalHealth,
    ChronicConditions,
    Lifestyle,
}

impl HealthCategory {
    /// All categories, highest priority first.
    pub const ALL: [HealthCategory; 4] = [
        HealthCategory::PhysicalSymptoms,
        HealthCategory::MentalHealth,
        HealthCategory::ChronicConditions,
        HealthCategory::Lifestyle,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            HealthCategory::PhysicalSymptoms => "physical_symptoms",
            HealthCategory::MentalHealth => "mental_health",
            HealthCategory::ChronicConditions => "chronic_conditions",
            HealthCategory::Lifestyle => "lifestyle",
        }
    }

    fn index(&self) -> usize {
        match self {
            HealthCategory::PhysicalSymptoms => 0,
            HealthCategory::MentalHealth => 1,
            HealthCategory::ChronicConditions => 2,
            HealthCategory::Lifestyle => 3,
        }
    }
}

impl fmt::Display for HealthCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Score per category. Every category is always present.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryScores {
    pub physical_symptoms: f32,
    pub mental_health: f32,
    pub chronic_conditions: f32,
    pub lifestyle: f32,
}

impl CategoryScores {
    pub fn get(&self, category: HealthCategory) -> f32 {
        match category {
            HealthCategory::PhysicalSymptoms => self.physical_symptoms,
            HealthCategory::MentalHealth => self.mental_health,
            HealthCategory::ChronicConditions => self.chronic_conditions,
            HealthCategory::Lifestyle => self.lifestyle,
        }
    }

    pub fn set(&mut self, category: HealthCategory, score: f32) {
        let slot = match category {
            HealthCategory::PhysicalSymptoms => &mut self.physical_symptoms,
            HealthCategory::MentalHealth => &mut self.mental_health,
            HealthCategory::ChronicConditions => &mut self.chronic_conditions,
            HealthCategory::Lifestyle => &mut self.lifestyle,
        };
        *slot = score.clamp(0.0, 1.0);
    }

    /// `(category, score)` pairs in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (HealthCategory, f32)> + '_ {
        HealthCategory::ALL.into_iter().map(|c| (c, self.get(c)))
    }

    /// Categories sorted by descending score, ties broken by priority order.
    pub fn ranked(&self) -> Vec<(HealthCategory, f32)> {
        let mut ranked: Vec<(HealthCategory, f32)> = self.iter().collect();
        // Stable sort keeps priority order among equal scores.
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }

    /// Highest scoring category, `None` if every score is zero.
    pub fn top(&self) -> Option<HealthCategory> {
        self.ranked()
            .first()
            .filter(|(_, score)| *score > 0.0)
            .map(|(c, _)| *c)
    }
}

/// Lexicon terms found in the text, grouped by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedTerms {
    pub physical_symptoms: Vec<String>,
    pub mental_health: Vec<String>,
    pub chronic_conditions: Vec<String>,
    pub lifestyle: Vec<String>,
}

impl MatchedTerms {
    pub fn get(&self, category: HealthCategory) -> &[String] {
        match category {
            HealthCategory::PhysicalSymptoms => &self.physical_symptoms,
            HealthCategory::MentalHealth => &self.mental_health,
            HealthCategory::ChronicConditions => &self.chronic_conditions,
            HealthCategory::Lifestyle => &self.lifestyle,
        }
    }

    fn get_mut(&mut self, category: HealthCategory) -> &mut Vec<String> {
        match category {
            HealthCategory::PhysicalSymptoms => &mut self.physical_symptoms,
            HealthCategory::MentalHealth => &mut self.mental_health,
            HealthCategory::ChronicConditions => &mut self.chronic_conditions,
            HealthCategory::Lifestyle => &mut self.lifestyle,
        }
    }

    pub fn contains(&self, category: HealthCategory, term: &str) -> bool {
        self.get(category).iter().any(|t| t == term)
    }
}

struct TermMatcher {
    term: &'static str,
    regex: Regex,
}

/// Keyword-based category classifier.
pub struct CategoryClassifier {
    lexicons: [Vec<TermMatcher>; 4],
    normalization: f32,
}

impl CategoryClassifier {
    /// Compiles the category lexicons. `normalization` is the number of
    /// distinct hits that saturates a category at 1.0.
    pub fn new(lexicon: &Lexicon, normalization: f32) -> Result<Self, AppError> {
        if normalization < 1.0 {
            return Err(AppError::Config(format!(
                "Category normalization must be >= 1.0, got {}",
                normalization
            )));
        }

        let mut lexicons: [Vec<TermMatcher>; 4] = Default::default();
        for category in HealthCategory::ALL {
            lexicons[category.index()] = lexicon
                .terms_for(category)
                .iter()
                .map(|term| {
                    Ok(TermMatcher {
                        term: *term,
                        regex: term_matcher(term)?,
                    })
                })
                .collect::<Result<Vec<_>, AppError>>()?;
        }

        Ok(Self {
            lexicons,
            normalization,
        })
    }

    /// Scores raw text.
    pub fn classify(&self, text: &str) -> CategoryScores {
        self.classify_normalized(&normalize(text)).0
    }

    /// Scores normalized text and reports which terms produced the score.
    pub fn classify_normalized(&self, normalized: &str) -> (CategoryScores, MatchedTerms) {
        let mut scores = CategoryScores::default();
        let mut matched = MatchedTerms::default();

        for category in HealthCategory::ALL {
            let hits: Vec<String> = self.lexicons[category.index()]
                .iter()
                .filter(|m| m.regex.is_match(normalized))
                .map(|m| m.term.to_string())
                .collect();

            scores.set(category, (hits.len() as f32 / self.normalization).min(1.0));
            *matched.get_mut(category) = hits;
        }

        (scores, matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> CategoryClassifier {
        CategoryClassifier::new(&Lexicon::builtin(), 3.0).expect("builtin lexicon compiles")
    }

    #[test]
    fn test_all_keys_present_for_unrelated_text() {
        let scores = classifier().classify("The weather in Lisbon was lovely");
        for (_, score) in scores.iter() {
            assert_eq!(score, 0.0);
        }
        assert_eq!(scores.top(), None);

        let json = serde_json::to_value(scores).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 4);
        for category in HealthCategory::ALL {
            assert!(obj.contains_key(category.label()));
        }
    }

    #[test]
    fn test_lifestyle_text() {
        let scores = classifier().classify("I want to eat healthier and exercise more");
        assert_eq!(scores.top(), Some(HealthCategory::Lifestyle));
        assert_eq!(scores.lifestyle, 1.0);
    }

    #[test]
    fn test_repetition_does_not_inflate() {
        let c = classifier();
        let once = c.classify("I feel anxious");
        let many = c.classify("anxious anxious anxious, so anxious");
        assert_eq!(once.mental_health, many.mental_health);
        assert!((once.mental_health - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_saturates_at_one() {
        let scores = classifier()
            .classify("headache, fever, cough, nausea and dizziness all week");
        assert_eq!(scores.physical_symptoms, 1.0);
    }

    #[test]
    fn test_multiple_categories_score_independently() {
        let (scores, matched) = classifier().classify_normalized(&normalize(
            "My diabetes medication makes me anxious and stressed",
        ));
        assert!(scores.chronic_conditions > 0.5);
        assert!(scores.mental_health > 0.5);
        assert!(matched.contains(HealthCategory::ChronicConditions, "diabetes"));
        assert!(matched.contains(HealthCategory::MentalHealth, "stressed"));
    }

    #[test]
    fn test_ranked_ties_follow_priority() {
        let scores = CategoryScores {
            physical_symptoms: 0.0,
            mental_health: 0.5,
            chronic_conditions: 0.0,
            lifestyle: 0.5,
        };
        let ranked = scores.ranked();
        assert_eq!(ranked[0].0, HealthCategory::MentalHealth);
        assert_eq!(ranked[1].0, HealthCategory::Lifestyle);
        assert_eq!(ranked[2].0, HealthCategory::PhysicalSymptoms);
    }

    #[test]
    fn test_rejects_bad_normalization() {
        assert!(CategoryClassifier::new(&Lexicon::builtin(), 0.5).is_err());
    }
}
