//! Lazily initialized ML sentiment backend.
//!
//! The model is loaded on first use, at most once per [`MlBackend`]; callers
//! racing on the first load block until it finishes and then share the
//! outcome. A failed load is remembered and never retried: build a new
//! backend to try again.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use tracing::{info, warn};

use super::embedding::EmbeddingSentimentModel;
use super::SentimentModel;
use crate::config::AnalyzerConfig;
use crate::error::AppError;

type ModelLoader = Box<dyn Fn() -> Result<Arc<dyn SentimentModel>, AppError> + Send + Sync>;

/// Process-wide backend shared by analyzers built with [`MlBackend::global`].
static GLOBAL_BACKEND: OnceLock<(BackendSource, Arc<MlBackend>)> = OnceLock::new();

/// The configuration fields that decide what a backend loads.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BackendSource {
    ml_enabled: bool,
    models_dir: PathBuf,
}

impl BackendSource {
    fn of(config: &AnalyzerConfig) -> Self {
        Self {
            ml_enabled: config.ml_enabled,
            models_dir: config.models_dir.clone(),
        }
    }

    fn build(&self) -> MlBackend {
        if self.ml_enabled {
            MlBackend::embedding(self.models_dir.clone())
        } else {
            MlBackend::disabled()
        }
    }
}

/// Handle to an optionally available sentiment model.
pub struct MlBackend {
    loader: Option<ModelLoader>,
    model: OnceLock<Option<Arc<dyn SentimentModel>>>,
}

impl MlBackend {
    /// Backend that runs `loader` on first use.
    pub fn new<F>(loader: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn SentimentModel>, AppError> + Send + Sync + 'static,
    {
        Self {
            loader: Some(Box::new(loader)),
            model: OnceLock::new(),
        }
    }

    /// Backend backed by the local embedding model cached under `models_dir`.
    pub fn embedding(models_dir: PathBuf) -> Self {
        Self::new(move || {
            let model = EmbeddingSentimentModel::load(&models_dir)?;
            Ok(Arc::new(model) as Arc<dyn SentimentModel>)
        })
    }

    /// Backend that is never available.
    pub fn disabled() -> Self {
        Self {
            loader: None,
            model: OnceLock::new(),
        }
    }

    /// Backend wrapping an already loaded model.
    pub fn from_model(model: Arc<dyn SentimentModel>) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(Some(model));
        Self {
            loader: None,
            model: cell,
        }
    }

    /// Shared process-wide backend. The first call decides its kind: the
    /// embedding backend over `config.models_dir` if `config.ml_enabled`, a
    /// disabled one otherwise.
    ///
    /// Later calls get that same backend whatever their `config`; a call whose
    /// `ml_enabled` or `models_dir` differs logs a warning. Use
    /// [`HealthAnalyzer::with_backend`](crate::HealthAnalyzer::with_backend)
    /// for a backend of its own.
    pub fn global(config: &AnalyzerConfig) -> Arc<MlBackend> {
        let requested = BackendSource::of(config);
        let (source, backend) =
            GLOBAL_BACKEND.get_or_init(|| (requested.clone(), Arc::new(requested.build())));
        if *source != requested {
            warn!(
                "Shared ML backend already initialized with {:?}; ignoring {:?}",
                source, requested
            );
        }
        backend.clone()
    }

    /// Loads the model if that has not been attempted yet. Returns whether
    /// a model is available.
    pub fn try_initialize(&self) -> bool {
        self.model
            .get_or_init(|| {
                let loader = self.loader.as_ref()?;
                info!("Initializing ML sentiment backend...");
                match loader() {
                    Ok(model) => {
                        info!("ML sentiment backend ready ({})", model.name());
                        Some(model)
                    }
                    Err(e) => {
                        warn!("ML sentiment backend unavailable, using rule-based scoring: {}", e);
                        None
                    }
                }
            })
            .is_some()
    }

    /// Whether a model has been loaded. Never triggers a load.
    pub fn is_ready(&self) -> bool {
        matches!(self.model.get(), Some(Some(_)))
    }

    /// The loaded model, initializing it first if needed.
    pub fn model(&self) -> Option<Arc<dyn SentimentModel>> {
        self.try_initialize();
        self.model.get().and_then(|m| m.clone())
    }
}
