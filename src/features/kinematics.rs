//! Derived per-event series: computed fresh per extraction over a
//! timestamp-sorted slice, never persisted.

use crate::events::PointerEvent;

/// Column-wise kinematic series aligned with the input events. Element 0 of
/// every series is 0 (no predecessor).
#[derive(Debug, Clone, PartialEq)]
pub struct Kinematics {
    pub time_diff: Vec<f64>,
    pub distance: Vec<f64>,
    pub speed: Vec<f64>,
    pub acceleration: Vec<f64>,
}

impl Kinematics {
    /// Derive the series from an already-sorted batch. A zero or negative
    /// time delta (duplicate timestamps) yields speed 0 for that event, never
    /// a division error and never an infinity.
    pub fn derive(events: &[PointerEvent]) -> Self {
        let n = events.len();
        let mut time_diff = vec![0.0; n];
        let mut distance = vec![0.0; n];
        let mut speed = vec![0.0; n];
        let mut acceleration = vec![0.0; n];

        for i in 1..n {
            let prev = &events[i - 1];
            let curr = &events[i];
            time_diff[i] = curr.record_timestamp - prev.record_timestamp;
            let dx = curr.x - prev.x;
            let dy = curr.y - prev.y;
            distance[i] = (dx * dx + dy * dy).sqrt();
            if time_diff[i] > 0.0 {
                let v = distance[i] / time_diff[i];
                speed[i] = if v.is_finite() { v } else { 0.0 };
            }
            acceleration[i] = speed[i] - speed[i - 1];
        }

        Self {
            time_diff,
            distance,
            speed,
            acceleration,
        }
    }
}
