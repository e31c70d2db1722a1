//! Engine error taxonomy. Numeric degeneracies (zero time deltas, empty
//! subset means) are resolved to zero inside the extractor and never surface
//! here; only structural failures reach the caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Feature extraction was handed zero events.
    #[error("empty event batch: feature extraction requires at least one event")]
    EmptyBatch,

    /// Segmentation was handed zero events; min/max over no data is refused.
    #[error("empty event stream: windowing requires at least one event")]
    EmptyStream,

    /// Window width must be strictly positive to tile the time span.
    #[error("window width must be positive, got {0}")]
    InvalidWindowWidth(f64),

    /// Session file could not be read.
    #[error("failed to read session: {0}")]
    Io(#[from] std::io::Error),

    /// Session file contained a line that is not a valid pointer event.
    #[error("malformed event on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}
