//! HealthScan core: turns free-text health concerns into structured analysis
//! results (emergency status, categories, sentiment, urgency, advice).

pub mod analysis;
pub mod config;
pub mod error;
pub mod fs_manager;
pub mod telemetry;

pub use analysis::{AnalysisResult, HealthAnalyzer, ItemOutcome};
pub use config::AnalyzerConfig;
pub use error::AppError;

#[cfg(test)]
mod tests;
