//! Pointer event model and session input.
//!
//! Events arrive from an external capture layer as an already-bounded,
//! in-memory table; this module owns the record type, the closed categorical
//! domains, and the ndjson session reader used for replay.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Pointer transition state. The input domain is open; anything outside the
/// four known literals parses to [`PointerState::Other`] and is excluded from
/// every fixed feature count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PointerState {
    Move,
    Pressed,
    Released,
    Drag,
    Other,
}

impl From<&str> for PointerState {
    fn from(s: &str) -> Self {
        match s {
            "Move" => PointerState::Move,
            "Pressed" => PointerState::Pressed,
            "Released" => PointerState::Released,
            "Drag" => PointerState::Drag,
            _ => PointerState::Other,
        }
    }
}

impl From<String> for PointerState {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl From<PointerState> for String {
    fn from(s: PointerState) -> Self {
        match s {
            PointerState::Move => "Move",
            PointerState::Pressed => "Pressed",
            PointerState::Released => "Released",
            PointerState::Drag => "Drag",
            PointerState::Other => "Other",
        }
        .to_string()
    }
}

/// Mouse button, same open-input/closed-domain policy as [`PointerState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MouseButton {
    NoButton,
    Left,
    Right,
    Other,
}

impl From<&str> for MouseButton {
    fn from(s: &str) -> Self {
        match s {
            "NoButton" => MouseButton::NoButton,
            "Left" => MouseButton::Left,
            "Right" => MouseButton::Right,
            _ => MouseButton::Other,
        }
    }
}

impl From<String> for MouseButton {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl From<MouseButton> for String {
    fn from(b: MouseButton) -> Self {
        match b {
            MouseButton::NoButton => "NoButton",
            MouseButton::Left => "Left",
            MouseButton::Right => "Right",
            MouseButton::Other => "Other",
        }
        .to_string()
    }
}

/// One observed pointer sample.
///
/// `record_timestamp` is the session-relative clock every derived quantity is
/// computed from; `client_timestamp` is wall-clock seconds, carried through
/// untouched. Labeled training streams may attach `is_illegal` per event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointerEvent {
    pub record_timestamp: f64,
    pub client_timestamp: f64,
    pub x: f64,
    pub y: f64,
    pub state: PointerState,
    pub button: MouseButton,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_illegal: Option<bool>,
}

/// Stable sort by `record_timestamp`; ties keep their original relative
/// order. NaN timestamps order deterministically via IEEE total ordering.
pub fn sort_by_timestamp(events: &mut [PointerEvent]) {
    events.sort_by(|a, b| a.record_timestamp.total_cmp(&b.record_timestamp));
}

/// Read a captured session: one JSON [`PointerEvent`] per line, blank lines
/// skipped. A malformed line is a hard error with its line number, not a
/// silent drop.
pub fn read_ndjson(path: &Path) -> Result<Vec<PointerEvent>, EngineError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut events = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event = serde_json::from_str(&line).map_err(|source| EngineError::Parse {
            line: idx + 1,
            source,
        })?;
        events.push(event);
    }
    Ok(events)
}
