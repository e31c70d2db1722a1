//! Pre-trained outlier model boundary: ONNX inference and the per-user
//! model registry.

mod onnx;
mod registry;

pub use onnx::AnomalyScorer;
pub use registry::ModelRegistry;
