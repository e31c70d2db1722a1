//! Behavioral feature extraction from pointer events.
//!
//! The extractor turns one batch into one fixed-schema vector; the segmenter
//! tiles a longer stream into fixed-width time windows and extracts each.
//! Both are pure functions of their input: no state survives a call.

mod extract;
mod kinematics;
mod window;

pub use extract::{MouseFeatures, FEATURE_NAMES};
pub use kinematics::Kinematics;
pub use window::{segment, WindowFeatures};
