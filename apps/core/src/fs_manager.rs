use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Resolves the on-disk locations the engine reads from (model cache).
pub struct PortablePathManager;

impl PortablePathManager {
    /// Root directory of the installation (the folder holding the executable).
    pub fn root_dir() -> PathBuf {
        match std::env::current_exe() {
            Ok(mut path) => {
                path.pop();
                path
            }
            Err(e) => {
                warn!(
                    "Failed to get current exe path: {}. Falling back to current_dir.",
                    e
                );
                std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
            }
        }
    }

    /// Main data directory (./data).
    pub fn data_dir() -> PathBuf {
        Self::root_dir().join("data")
    }

    /// Model directory (./data/models).
    pub fn models_dir() -> PathBuf {
        Self::data_dir().join("models")
    }

    /// Creates the model directory tree under `models_dir` if missing.
    pub fn init(models_dir: &Path) -> Result<(), std::io::Error> {
        let embeddings = models_dir.join("embeddings");
        if !embeddings.exists() {
            info!("Creating models directory: {:?}", embeddings);
            fs::create_dir_all(&embeddings)?;
        }
        Ok(())
    }
}
