//! Maps the mean anomaly score of a scoring attempt to a verdict with a
//! configurable threshold.

use crate::config::DecisionConfig;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Genuine,
    Anomalous,
}

impl Verdict {
    /// Scores follow the outlier-model convention: higher is more normal,
    /// outliers score negative.
    pub fn from_score(score: f32, config: &DecisionConfig) -> Self {
        if score > config.threshold {
            Verdict::Genuine
        } else {
            Verdict::Anomalous
        }
    }
}

/// Outcome of a single scoring attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    pub attempt_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    pub score: f32,
    pub windows: usize,
    pub verdict: Verdict,
    pub ts: i64,
}

pub struct DecisionEngine {
    config: DecisionConfig,
}

impl DecisionEngine {
    pub fn new(config: DecisionConfig) -> Self {
        Self { config }
    }

    /// Average the per-window scores and judge the attempt.
    pub fn evaluate(&self, user: Option<&str>, window_scores: &[f32]) -> ScoreReport {
        let score = if window_scores.is_empty() {
            0.0
        } else {
            window_scores.iter().sum::<f32>() / window_scores.len() as f32
        };
        ScoreReport {
            attempt_id: Uuid::new_v4().to_string(),
            user: user.map(str::to_string),
            score,
            windows: window_scores.len(),
            verdict: Verdict::from_score(score, &self.config),
            ts: Utc::now().timestamp_millis(),
        }
    }

    pub fn config(&self) -> &DecisionConfig {
        &self.config
    }
}
