//! Analyzer configuration.
//!
//! Every numeric threshold used by the pipeline lives here so it can be tuned
//! without touching the components. Values are validated once at load time.

use crate::error::AppError;
use crate::fs_manager::PortablePathManager;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use validator::Validate;

const ENV_PREFIX: &str = "HEALTHSCAN_";

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" | "bunyan" => Ok(LogFormat::Json),
            other => Err(AppError::Config(format!("Unknown log format: {}", other))),
        }
    }
}

/// Tunable parameters of the analysis engine.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnalyzerConfig {
    /// Minimum category score for that category to contribute advice.
    #[validate(range(min = 0.0, max = 1.0))]
    pub relevance_threshold: f32,
    /// `chronic_conditions` score at which urgency escalates to medium.
    #[validate(range(min = 0.0, max = 1.0))]
    pub chronic_medium_threshold: f32,
    /// `mental_health` score at which urgency escalates to medium.
    #[validate(range(min = 0.0, max = 1.0))]
    pub mental_medium_threshold: f32,
    /// `mental_health` score above which a medium-urgency recommendation
    /// points to a mental-health professional.
    #[validate(range(min = 0.0, max = 1.0))]
    pub mental_recommendation_threshold: f32,
    /// Negative compound sentiment at or below which urgency escalates to medium.
    /// Must lie in [-1.0, 0.0]; checked by [`AnalyzerConfig::check`].
    pub negative_medium_score: f32,
    /// Half-width of the neutral band for rule-based sentiment labels.
    #[validate(range(min = 0.0, max = 1.0))]
    pub sentiment_label_threshold: f32,
    /// Distinct term hits needed for a category to saturate at 1.0.
    #[validate(range(min = 1.0, max = 20.0))]
    pub category_normalization: f32,
    /// Maximum number of texts accepted by one batch call.
    #[validate(range(min = 1))]
    pub max_batch_items: usize,
    /// Maximum number of rows accepted by one tabular call.
    #[validate(range(min = 1))]
    pub max_rows: usize,
    /// Maximum number of advice items in a result.
    #[validate(range(min = 1))]
    pub max_advice_items: usize,
    /// Per-item deadline for concurrent batch analysis.
    pub item_timeout_ms: Option<u64>,
    /// Whether the ML sentiment backend may be loaded at all.
    pub ml_enabled: bool,
    /// Cache directory for the embedding model.
    pub models_dir: PathBuf,
    pub log_format: LogFormat,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            relevance_threshold: 0.3,
            chronic_medium_threshold: 0.5,
            mental_medium_threshold: 0.6,
            mental_recommendation_threshold: 0.4,
            negative_medium_score: -0.5,
            sentiment_label_threshold: 0.15,
            category_normalization: 3.0,
            max_batch_items: 20,
            max_rows: 50,
            max_advice_items: 4,
            item_timeout_ms: None,
            ml_enabled: true,
            models_dir: PortablePathManager::models_dir(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl AnalyzerConfig {
    /// Default configuration with the ML backend switched off.
    pub fn rule_based() -> Self {
        Self {
            ml_enabled: false,
            ..Self::default()
        }
    }

    /// Builds the configuration from defaults overlaid with `HEALTHSCAN_*` variables.
    pub fn from_env() -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Some(v) = env_parse("RELEVANCE_THRESHOLD")? {
            config.relevance_threshold = v;
        }
        if let Some(v) = env_parse("CHRONIC_MEDIUM_THRESHOLD")? {
            config.chronic_medium_threshold = v;
        }
        if let Some(v) = env_parse("MENTAL_MEDIUM_THRESHOLD")? {
            config.mental_medium_threshold = v;
        }
        if let Some(v) = env_parse("MENTAL_RECOMMENDATION_THRESHOLD")? {
            config.mental_recommendation_threshold = v;
        }
        if let Some(v) = env_parse("NEGATIVE_MEDIUM_SCORE")? {
            config.negative_medium_score = v;
        }
        if let Some(v) = env_parse("SENTIMENT_LABEL_THRESHOLD")? {
            config.sentiment_label_threshold = v;
        }
        if let Some(v) = env_parse("CATEGORY_NORMALIZATION")? {
            config.category_normalization = v;
        }
        if let Some(v) = env_parse("MAX_BATCH_ITEMS")? {
            config.max_batch_items = v;
        }
        if let Some(v) = env_parse("MAX_ROWS")? {
            config.max_rows = v;
        }
        if let Some(v) = env_parse("MAX_ADVICE_ITEMS")? {
            config.max_advice_items = v;
        }
        if let Some(v) = env_parse("ITEM_TIMEOUT_MS")? {
            config.item_timeout_ms = Some(v);
        }
        if let Some(v) = env_parse("ML_ENABLED")? {
            config.ml_enabled = v;
        }
        if let Some(v) = env_parse::<String>("MODELS_DIR")? {
            config.models_dir = PathBuf::from(v);
        }
        if let Some(v) = env_parse("LOG_FORMAT")? {
            config.log_format = v;
        }

        config.check()?;
        Ok(config)
    }

    /// Validates every field, including the ones the derive cannot express.
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()?;
        if !(-1.0..=0.0).contains(&self.negative_medium_score) {
            return Err(AppError::Config(format!(
                "negative_medium_score must be within [-1.0, 0.0], got {}",
                self.negative_medium_score
            )));
        }
        Ok(())
    }
}

/// Reads and parses `HEALTHSCAN_<key>`; unset or blank variables yield `None`.
fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>, AppError> {
    let name = format!("{}{}", ENV_PREFIX, key);
    match std::env::var(&name) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::Config(format!("Invalid value for {}: {}", name, raw))),
        Err(_) => Ok(None),
    }
}
