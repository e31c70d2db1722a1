//! Engine configuration. Window width is the one caller-tunable knob of the
//! core; the rest wires the model directory, decision threshold, and logging.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory of per-user ONNX outlier models
    pub model_dir: PathBuf,
    /// Windowing parameters
    pub window: WindowConfig,
    /// Verdict threshold
    pub decision: DecisionConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Time-window width in seconds
    pub width_secs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionConfig {
    /// Mean anomaly score above this is judged genuine
    pub threshold: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model_dir: default_model_dir(),
            window: WindowConfig::default(),
            decision: DecisionConfig::default(),
            log: LogConfig::default(),
        }
    }
}

fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("mousetrail").join("models"))
        .unwrap_or_else(|| PathBuf::from("models"))
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { width_secs: 1.0 }
    }
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self { threshold: -0.5 }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl EngineConfig {
    /// Load from JSON file if present; otherwise return default
    pub fn load(path: &std::path::Path) -> Self {
        if path.exists() {
            if let Ok(data) = std::fs::read_to_string(path) {
                if let Ok(c) = serde_json::from_str::<EngineConfig>(&data) {
                    return c;
                }
            }
        }
        Self::default()
    }
}
