//! ONNX Runtime inference for the per-user outlier model. Input: [1, 23] f32
//! feature vector; output: raw anomaly score (score_samples convention,
//! higher = more normal). If the model file is missing, runs in no-op mode
//! (returns 0.0).

use crate::features::{MouseFeatures, FEATURE_NAMES};
use ndarray::{Array2, CowArray, IxDyn};
use ort::{Environment, OrtError, Session, SessionBuilder, Value};
use std::path::Path;
use std::sync::{Arc, OnceLock};

static ORT_ENV: OnceLock<Arc<Environment>> = OnceLock::new();

fn init_env() -> Arc<Environment> {
    ORT_ENV
        .get_or_init(|| {
            Environment::builder()
                .with_name("mousetrail")
                .build()
                .expect("ORT environment")
                .into_arc()
        })
        .clone()
}

pub struct AnomalyScorer {
    session: Option<Session>,
}

impl AnomalyScorer {
    /// Load a model from path. If the path is missing, the scorer runs in
    /// no-op mode (returns 0.0); an existing-but-invalid file is an error.
    pub fn load(path: &Path) -> Result<Self, OrtError> {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "ONNX model not found; scoring disabled");
            return Ok(Self { session: None });
        }

        let env = init_env();
        let session = SessionBuilder::new(&env)?.with_model_from_file(path)?;
        Ok(Self {
            session: Some(session),
        })
    }

    /// Run inference; returns the raw anomaly score, or 0.0 when no model is
    /// loaded or the model output is unusable. The score is not normalized:
    /// isolation-forest exports yield negative values for outliers.
    pub fn predict(&self, features: &MouseFeatures) -> f32 {
        let Some(ref session) = self.session else {
            return 0.0;
        };

        let values = features.to_vector();
        let arr = match Array2::from_shape_vec((1, FEATURE_NAMES.len()), values) {
            Ok(a) => a,
            Err(_) => return 0.0,
        };
        let arr: CowArray<f32, IxDyn> = CowArray::from(arr.into_dyn());
        let input = match Value::from_array(session.allocator(), &arr) {
            Ok(v) => v,
            Err(_) => return 0.0,
        };

        let outputs = match session.run(vec![input]) {
            Ok(o) => o,
            Err(_) => return 0.0,
        };

        // sklearn outlier exports carry a (label, scores) output pair; take
        // the first output that extracts as f32.
        for out in &outputs {
            if let Ok(tensor) = out.try_extract::<f32>() {
                let view = tensor.view();
                if let Some(&score) = view.iter().next() {
                    return score;
                }
            }
        }
        0.0
    }

    /// Whether a model is actually loaded (false in no-op mode).
    pub fn is_loaded(&self) -> bool {
        self.session.is_some()
    }
}
