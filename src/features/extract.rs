//! Fixed-schema feature extraction over one batch of pointer events.

use super::kinematics::Kinematics;
use crate::error::EngineError;
use crate::events::{sort_by_timestamp, MouseButton, PointerEvent, PointerState};
use serde::{Deserialize, Serialize};

/// A gap between consecutive events longer than this counts as idle time.
const IDLE_GAP_SECS: f64 = 1.0;

/// Every feature name, in the exact column order the downstream classifier
/// expects. The set is closed: vectors have this shape regardless of which
/// states, buttons, or transitions occur in the input.
pub const FEATURE_NAMES: [&str; 23] = [
    "avg_speed",
    "max_speed",
    "avg_acceleration",
    "state_count_Move",
    "state_count_Pressed",
    "state_count_Released",
    "state_count_Drag",
    "button_count_NoButton",
    "button_count_Left",
    "button_count_Right",
    "state_transition_Move->Pressed",
    "state_transition_Pressed->Released",
    "state_transition_Drag->Released",
    "avg_duration_Move",
    "avg_duration_Pressed",
    "avg_duration_Released",
    "avg_duration_Drag",
    "drag_distance",
    "drag_avg_speed",
    "idle_time",
    "actions_per_second",
    "avg_x",
    "avg_y",
];

/// One extracted feature vector. Serializes with the literal feature names
/// from [`FEATURE_NAMES`] as keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MouseFeatures {
    pub avg_speed: f64,
    pub max_speed: f64,
    pub avg_acceleration: f64,
    #[serde(rename = "state_count_Move")]
    pub state_count_move: u32,
    #[serde(rename = "state_count_Pressed")]
    pub state_count_pressed: u32,
    #[serde(rename = "state_count_Released")]
    pub state_count_released: u32,
    #[serde(rename = "state_count_Drag")]
    pub state_count_drag: u32,
    #[serde(rename = "button_count_NoButton")]
    pub button_count_no_button: u32,
    #[serde(rename = "button_count_Left")]
    pub button_count_left: u32,
    #[serde(rename = "button_count_Right")]
    pub button_count_right: u32,
    #[serde(rename = "state_transition_Move->Pressed")]
    pub transition_move_pressed: u32,
    #[serde(rename = "state_transition_Pressed->Released")]
    pub transition_pressed_released: u32,
    #[serde(rename = "state_transition_Drag->Released")]
    pub transition_drag_released: u32,
    #[serde(rename = "avg_duration_Move")]
    pub avg_duration_move: f64,
    #[serde(rename = "avg_duration_Pressed")]
    pub avg_duration_pressed: f64,
    #[serde(rename = "avg_duration_Released")]
    pub avg_duration_released: f64,
    #[serde(rename = "avg_duration_Drag")]
    pub avg_duration_drag: f64,
    pub drag_distance: f64,
    pub drag_avg_speed: f64,
    pub idle_time: f64,
    pub actions_per_second: f64,
    pub avg_x: f64,
    pub avg_y: f64,
}

fn mean(sum: f64, count: u32) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / f64::from(count)
    }
}

impl MouseFeatures {
    /// Extract the fixed feature set from one batch.
    ///
    /// The batch is stably re-sorted by `record_timestamp` first, so input
    /// order never affects the output. Zero time deltas and empty subset
    /// means resolve to 0; the only failure is an empty batch.
    pub fn from_events(events: &[PointerEvent]) -> Result<Self, EngineError> {
        if events.is_empty() {
            return Err(EngineError::EmptyBatch);
        }
        let mut batch = events.to_vec();
        sort_by_timestamp(&mut batch);

        let k = Kinematics::derive(&batch);
        let n = batch.len();
        let mut f = MouseFeatures::default();

        f.avg_speed = k.speed.iter().sum::<f64>() / n as f64;
        f.max_speed = k.speed.iter().fold(0.0, |m, &v| v.max(m));
        f.avg_acceleration = k.acceleration.iter().sum::<f64>() / n as f64;

        // Per-state accumulators: (time_diff sum, occurrence count)
        let mut dur_move = (0.0, 0u32);
        let mut dur_pressed = (0.0, 0u32);
        let mut dur_released = (0.0, 0u32);
        let mut dur_drag = (0.0, 0u32);
        let mut drag_speed_sum = 0.0;

        for (i, e) in batch.iter().enumerate() {
            let slot = match e.state {
                PointerState::Move => {
                    f.state_count_move += 1;
                    Some(&mut dur_move)
                }
                PointerState::Pressed => {
                    f.state_count_pressed += 1;
                    Some(&mut dur_pressed)
                }
                PointerState::Released => {
                    f.state_count_released += 1;
                    Some(&mut dur_released)
                }
                PointerState::Drag => {
                    f.state_count_drag += 1;
                    f.drag_distance += k.distance[i];
                    drag_speed_sum += k.speed[i];
                    Some(&mut dur_drag)
                }
                PointerState::Other => None,
            };
            if let Some((sum, count)) = slot {
                *sum += k.time_diff[i];
                *count += 1;
            }

            match e.button {
                MouseButton::NoButton => f.button_count_no_button += 1,
                MouseButton::Left => f.button_count_left += 1,
                MouseButton::Right => f.button_count_right += 1,
                MouseButton::Other => {}
            }

            if k.time_diff[i] > IDLE_GAP_SECS {
                f.idle_time += k.time_diff[i];
            }
            f.avg_x += e.x;
            f.avg_y += e.y;
        }

        for w in batch.windows(2) {
            match (w[0].state, w[1].state) {
                (PointerState::Move, PointerState::Pressed) => f.transition_move_pressed += 1,
                (PointerState::Pressed, PointerState::Released) => {
                    f.transition_pressed_released += 1
                }
                (PointerState::Drag, PointerState::Released) => f.transition_drag_released += 1,
                _ => {}
            }
        }

        f.avg_duration_move = mean(dur_move.0, dur_move.1);
        f.avg_duration_pressed = mean(dur_pressed.0, dur_pressed.1);
        f.avg_duration_released = mean(dur_released.0, dur_released.1);
        f.avg_duration_drag = mean(dur_drag.0, dur_drag.1);
        f.drag_avg_speed = mean(drag_speed_sum, f.state_count_drag);

        let span = batch[n - 1].record_timestamp - batch[0].record_timestamp;
        f.actions_per_second = if span > 0.0 { n as f64 / span } else { 0.0 };
        f.avg_x /= n as f64;
        f.avg_y /= n as f64;

        Ok(f)
    }

    /// Encode as an f32 vector in [`FEATURE_NAMES`] order for model input.
    pub fn to_vector(&self) -> Vec<f32> {
        vec![
            self.avg_speed as f32,
            self.max_speed as f32,
            self.avg_acceleration as f32,
            self.state_count_move as f32,
            self.state_count_pressed as f32,
            self.state_count_released as f32,
            self.state_count_drag as f32,
            self.button_count_no_button as f32,
            self.button_count_left as f32,
            self.button_count_right as f32,
            self.transition_move_pressed as f32,
            self.transition_pressed_released as f32,
            self.transition_drag_released as f32,
            self.avg_duration_move as f32,
            self.avg_duration_pressed as f32,
            self.avg_duration_released as f32,
            self.avg_duration_drag as f32,
            self.drag_distance as f32,
            self.drag_avg_speed as f32,
            self.idle_time as f32,
            self.actions_per_second as f32,
            self.avg_x as f32,
            self.avg_y as f32,
        ]
    }
}
