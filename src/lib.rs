//! mousetrail — Mouse-dynamics behavioral biometrics engine.
//!
//! Turns a captured stream of pointer events into fixed-schema feature
//! vectors for a pre-trained per-user outlier model, and judges a scoring
//! attempt against a threshold.
//!
//! Modular structure:
//! - [`events`] — Pointer event model, categorical domains, session input
//! - [`features`] — Kinematic feature extraction and time-window segmentation
//! - [`model`] — ONNX outlier model inference and per-user registry
//! - [`decision`] — Score-to-verdict engine
//! - [`logging`] — Structured JSON logging
//!
//! The engine is synchronous and stateless: every extraction or segmentation
//! call is a pure function of its input batch.

pub mod config;
pub mod decision;
pub mod error;
pub mod events;
pub mod features;
pub mod logging;
pub mod model;

pub use config::EngineConfig;
pub use decision::{DecisionEngine, ScoreReport, Verdict};
pub use error::EngineError;
pub use events::{MouseButton, PointerEvent, PointerState};
pub use features::{segment, MouseFeatures, WindowFeatures, FEATURE_NAMES};
pub use logging::StructuredLogger;
pub use model::{AnomalyScorer, ModelRegistry};
