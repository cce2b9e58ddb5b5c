//! Advice Generation.
//!
//! Relevant categories (score above the relevance threshold) contribute
//! advice in descending score order, ties following category priority.
//! A category whose matched terms hit one of its focus groups contributes
//! that group's first two items; otherwise its general advice. The list is
//! de-duplicated and capped. Negative sentiment appends one supportive
//! line when there is advice and room under the cap.

use std::sync::Arc;

use super::categories::{CategoryScores, HealthCategory, MatchedTerms};
use super::lexicon::{CategoryAdvice, Lexicon};
use super::sentiment::SentimentResult;
use super::urgency::UrgencyLevel;
use crate::config::AnalyzerConfig;

/// Items taken from a matched focus group.
const FOCUS_ITEMS: usize = 2;

pub struct AdviceGenerator {
    lexicon: Arc<Lexicon>,
    relevance_threshold: f32,
    mental_recommendation_threshold: f32,
    max_items: usize,
}

impl AdviceGenerator {
    pub fn new(lexicon: Arc<Lexicon>, config: &AnalyzerConfig) -> Self {
        Self {
            lexicon,
            relevance_threshold: config.relevance_threshold,
            mental_recommendation_threshold: config.mental_recommendation_threshold,
            max_items: config.max_advice_items,
        }
    }

    /// Returns the advice list and the recommendation sentence.
    pub fn generate(
        &self,
        categories: &CategoryScores,
        matched: &MatchedTerms,
        urgency: UrgencyLevel,
        sentiment: &SentimentResult,
    ) -> (Vec<String>, String) {
        let relevant: Vec<HealthCategory> = categories
            .ranked()
            .into_iter()
            .filter(|(_, score)| *score > self.relevance_threshold)
            .map(|(category, _)| category)
            .collect();

        let mut advice: Vec<String> = Vec::new();
        for category in &relevant {
            let Some(templates) = self.lexicon.advice_for(*category) else {
                continue;
            };
            for item in select_items(templates, matched) {
                if advice.len() >= self.max_items {
                    break;
                }
                if !advice.iter().any(|a| a == item) {
                    advice.push(item.to_string());
                }
            }
        }

        let supportive = self.lexicon.recommendations.supportive;
        if sentiment.is_negative() && !advice.is_empty() && advice.len() < self.max_items {
            advice.push(supportive.to_string());
        }

        let recommendation = self.recommendation(categories, urgency, relevant.is_empty());
        (advice, recommendation)
    }

    fn recommendation(
        &self,
        categories: &CategoryScores,
        urgency: UrgencyLevel,
        nothing_relevant: bool,
    ) -> String {
        let r = &self.lexicon.recommendations;
        let sentence = match urgency {
            UrgencyLevel::Emergency => r.emergency,
            UrgencyLevel::Medium
                if categories.mental_health > self.mental_recommendation_threshold =>
            {
                r.medium_mental
            }
            UrgencyLevel::Medium => r.medium,
            UrgencyLevel::Low if nothing_relevant => r.fallback,
            UrgencyLevel::Low if categories.mental_health > self.relevance_threshold => {
                r.low_mental
            }
            UrgencyLevel::Low if categories.physical_symptoms > self.relevance_threshold => {
                r.low_physical
            }
            UrgencyLevel::Low => r.low,
        };
        sentence.to_string()
    }
}

/// Focus advice of the first focus group with a matched term, or the
/// category's general advice.
fn select_items<'a>(templates: &'a CategoryAdvice, matched: &MatchedTerms) -> &'a [&'static str] {
    templates
        .focus
        .iter()
        .find(|focus| {
            focus
                .terms
                .iter()
                .any(|term| matched.contains(templates.category, term))
        })
        .map(|focus| &focus.advice[..FOCUS_ITEMS.min(focus.advice.len())])
        .unwrap_or(templates.general)
}
