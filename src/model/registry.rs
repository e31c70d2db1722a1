//! Per-user model registry: one ONNX outlier model per enrolled user,
//! discovered by scanning the model directory.

use super::AnomalyScorer;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

pub struct ModelRegistry {
    scorers: HashMap<String, AnomalyScorer>,
}

impl ModelRegistry {
    /// Scan `dir` for `*.onnx` files and load one scorer per user. A missing
    /// directory yields an empty registry; unloadable files are skipped with
    /// a warning rather than failing the whole scan.
    pub fn load_dir(dir: &Path) -> Self {
        let mut scorers = HashMap::new();
        let entries = match std::fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "model directory unavailable; registry empty");
                return Self { scorers };
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("onnx") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let username = Self::username_for(stem);
            match AnomalyScorer::load(&path) {
                Ok(scorer) => {
                    scorers.insert(username.to_string(), scorer);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unloadable model"),
            }
        }

        info!(users = scorers.len(), "model registry loaded");
        Self { scorers }
    }

    /// Username encoded in a model file stem: `user_user23_model` and
    /// `user_user23_isolation_forest` both map to `user_user23`.
    pub fn username_for(stem: &str) -> &str {
        stem.strip_suffix("_model")
            .or_else(|| stem.strip_suffix("_isolation_forest"))
            .unwrap_or(stem)
    }

    pub fn get(&self, username: &str) -> Option<&AnomalyScorer> {
        self.scorers.get(username)
    }

    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.scorers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.scorers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scorers.is_empty()
    }
}
