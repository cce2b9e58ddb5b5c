//! Embedding-based sentiment model using FastEmbed.
//!
//! Uses the AllMiniLML6V2 model to compare the input with one prototype
//! embedding per sentiment class. Cosine similarities are turned into a
//! probability distribution with a temperature softmax.

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::path::Path;
use tracing::{debug, info};

use super::{ClassProbabilities, ModelPrediction, SentimentLabel, SentimentModel};
use crate::error::AppError;

/// Softmax temperature over cosine similarities.
const TEMPERATURE: f32 = 0.05;

/// Descriptions embedded into one prototype per class.
struct SentimentPrototype {
    label: SentimentLabel,
    descriptions: &'static [&'static str],
}

const PROTOTYPES: &[SentimentPrototype] = &[
    SentimentPrototype {
        label: SentimentLabel::Negative,
        descriptions: &[
            "I feel terrible and everything is getting worse",
            "I am scared, worried and in a lot of pain",
            "I feel hopeless, sad and miserable",
            "this is awful and unbearable",
        ],
    },
    SentimentPrototype {
        label: SentimentLabel::Neutral,
        descriptions: &[
            "I have a question about my health",
            "I would like some information about a symptom",
            "describing a situation in plain factual terms",
            "I went to the doctor last week",
        ],
    },
    SentimentPrototype {
        label: SentimentLabel::Positive,
        descriptions: &[
            "I feel great and much better today",
            "I am happy, hopeful and grateful",
            "things are improving and I am recovering well",
            "I want to build healthy habits and feel good",
        ],
    },
];

/// Sentiment model backed by a local text embedding model.
pub struct EmbeddingSentimentModel {
    model: TextEmbedding,
    prototypes: Vec<(SentimentLabel, Vec<f32>)>,
}

impl EmbeddingSentimentModel {
    /// Loads the embedding model from `models_dir/embeddings` (downloading
    /// it there on first use) and pre-computes the class prototypes.
    pub fn load(models_dir: &Path) -> Result<Self, AppError> {
        let mut options = InitOptions::new(EmbeddingModel::AllMiniLML6V2);
        options.show_download_progress = false;
        options.cache_dir = models_dir.join("embeddings");

        let model = TextEmbedding::try_new(options).map_err(|e| {
            AppError::BackendUnavailable(format!("Failed to load embedding model: {}", e))
        })?;

        info!("Pre-computing sentiment prototypes...");
        let mut prototypes = Vec::with_capacity(PROTOTYPES.len());
        for prototype in PROTOTYPES {
            let combined = prototype.descriptions.join(". ");
            let embedding = embed_one(&model, combined)?;
            prototypes.push((prototype.label, embedding));
        }
        info!("Pre-computed {} sentiment prototypes", prototypes.len());

        Ok(Self { model, prototypes })
    }
}

impl SentimentModel for EmbeddingSentimentModel {
    fn name(&self) -> &str {
        "all-minilm-l6-v2-prototypes"
    }

    fn score_sentiment(&self, text: &str) -> Result<ModelPrediction, AppError> {
        let query = embed_one(&self.model, text.to_string())?;

        let similarities: Vec<(SentimentLabel, f32)> = self
            .prototypes
            .iter()
            .map(|(label, proto)| (*label, cosine_similarity(&query, proto)))
            .collect();
        debug!("Sentiment similarities: {:?}", similarities);

        let probabilities = softmax(&similarities);
        Ok(ModelPrediction {
            label: probabilities.argmax(),
            probabilities,
        })
    }
}

fn embed_one(model: &TextEmbedding, text: String) -> Result<Vec<f32>, AppError> {
    let mut embeddings = model
        .embed(vec![text], None)
        .map_err(|e| AppError::BackendUnavailable(format!("Embedding failed: {}", e)))?;
    embeddings
        .pop()
        .ok_or_else(|| AppError::BackendUnavailable("Empty embedding".to_string()))
}

fn softmax(similarities: &[(SentimentLabel, f32)]) -> ClassProbabilities {
    let max = similarities
        .iter()
        .map(|(_, s)| *s)
        .fold(f32::NEG_INFINITY, f32::max);

    let mut probs = ClassProbabilities {
        negative: 0.0,
        neutral: 0.0,
        positive: 0.0,
    };
    for (label, similarity) in similarities {
        let weight = ((similarity - max) / TEMPERATURE).exp();
        match label {
            SentimentLabel::Negative => probs.negative = weight,
            SentimentLabel::Neutral => probs.neutral = weight,
            SentimentLabel::Positive => probs.positive = weight,
        }
    }
    probs.normalized()
}

/// Calculate cosine similarity between two vectors
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs_manager::PortablePathManager;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &[1.0, 0.0, 0.0]) - 1.0).abs() < 0.001);
        assert!(cosine_similarity(&a, &[0.0, 1.0, 0.0]).abs() < 0.001);
        assert_eq!(cosine_similarity(&a, &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_softmax_sums_to_one_and_prefers_closest() {
        let probs = softmax(&[
            (SentimentLabel::Negative, 0.62),
            (SentimentLabel::Neutral, 0.40),
            (SentimentLabel::Positive, 0.35),
        ]);
        assert!((probs.negative + probs.neutral + probs.positive - 1.0).abs() < 1e-5);
        assert_eq!(probs.argmax(), SentimentLabel::Negative);
        assert!(probs.compound() < -0.9);
    }

    #[test]
    fn test_embedding_model_scores_when_available() {
        // Requires the model files; skipped when they cannot be loaded.
        if let Ok(model) = EmbeddingSentimentModel::load(&PortablePathManager::models_dir()) {
            let prediction = model
                .score_sentiment("I feel awful and hopeless")
                .expect("scoring works once loaded");
            let p = prediction.probabilities;
            assert!((p.negative + p.neutral + p.positive - 1.0).abs() < 1e-4);
        }
    }
}
