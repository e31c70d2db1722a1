//! Time-windowed segmentation: stream → contiguous fixed-width windows →
//! one feature vector per non-empty window.

use super::extract::MouseFeatures;
use crate::error::EngineError;
use crate::events::{sort_by_timestamp, PointerEvent};
use serde::{Deserialize, Serialize};

/// One output row of the segmenter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowFeatures {
    /// Window start on the `record_timestamp` clock.
    pub start_time: f64,
    /// Majority label over labeled events in the window, when any carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_illegal: Option<bool>,
    #[serde(flatten)]
    pub features: MouseFeatures,
}

/// Partition the stream into half-open `[cursor, cursor + width)` windows
/// tiling `[t_min, t_max]`, extract features per non-empty window, and return
/// the rows in ascending `start_time` order. Empty windows are skipped
/// without emitting. Windows never overlap and never share events.
///
/// A single-instant stream (`t_min == t_max`) produces exactly one window
/// holding the whole stream rather than zero windows.
pub fn segment(
    events: &[PointerEvent],
    window_width: f64,
) -> Result<Vec<WindowFeatures>, EngineError> {
    if events.is_empty() {
        return Err(EngineError::EmptyStream);
    }
    if !(window_width > 0.0) {
        return Err(EngineError::InvalidWindowWidth(window_width));
    }

    let mut stream = events.to_vec();
    sort_by_timestamp(&mut stream);

    let t_min = stream[0].record_timestamp;
    let t_max = stream[stream.len() - 1].record_timestamp;

    if t_min == t_max {
        let features = MouseFeatures::from_events(&stream)?;
        return Ok(vec![WindowFeatures {
            start_time: t_min,
            is_illegal: majority_label(&stream),
            features,
        }]);
    }

    let mut rows = Vec::new();
    let mut cursor = t_min;
    // The stream is sorted, so each window is the next contiguous run of
    // events with timestamp below the window end.
    let mut offset = 0;
    while cursor < t_max {
        let end = cursor + window_width;
        let len = stream[offset..]
            .iter()
            .take_while(|e| e.record_timestamp < end)
            .count();
        if len > 0 {
            let window = &stream[offset..offset + len];
            let features = MouseFeatures::from_events(window)?;
            rows.push(WindowFeatures {
                start_time: cursor,
                is_illegal: majority_label(window),
                features,
            });
            offset += len;
        }
        cursor = end;
    }
    // Coverage is the half-open span [t_min, t_max): an event at exactly
    // t_max is emitted only when t_max falls inside the last window, not on
    // its boundary.

    Ok(rows)
}

/// Most frequent label among labeled events; `None` when no event carries
/// one. Ties break to the first-encountered value (stable mode).
fn majority_label(events: &[PointerEvent]) -> Option<bool> {
    let mut counts: Vec<(bool, usize)> = Vec::new();
    for label in events.iter().filter_map(|e| e.is_illegal) {
        match counts.iter_mut().find(|(v, _)| *v == label) {
            Some((_, c)) => *c += 1,
            None => counts.push((label, 1)),
        }
    }
    let mut best: Option<(bool, usize)> = None;
    for &(value, count) in &counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}
