//! Integration tests: event model, feature extraction, windowing, registry,
//! decision engine, session input.

use mousetrail::{
    config::EngineConfig,
    decision::{DecisionEngine, Verdict},
    error::EngineError,
    events::{self, MouseButton, PointerEvent, PointerState},
    features::{segment, Kinematics, MouseFeatures, FEATURE_NAMES},
    model::{AnomalyScorer, ModelRegistry},
};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

fn ev(t: f64, x: f64, y: f64, state: &str, button: &str) -> PointerEvent {
    PointerEvent {
        record_timestamp: t,
        client_timestamp: 1_700_000_000.0 + t,
        x,
        y,
        state: state.into(),
        button: button.into(),
        is_illegal: None,
    }
}

fn labeled(t: f64, label: bool) -> PointerEvent {
    PointerEvent {
        is_illegal: Some(label),
        ..ev(t, 0.0, 0.0, "Move", "NoButton")
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn config_load_default() {
    let c = EngineConfig::load(Path::new("nonexistent.json"));
    assert!(approx(c.window.width_secs, 1.0));
    assert_eq!(c.decision.threshold, -0.5);
    assert_eq!(c.log.level, "info");
}

#[test]
fn kinematics_series_for_three_event_batch() {
    let batch = vec![
        ev(0.0, 0.0, 0.0, "Move", "NoButton"),
        ev(0.5, 3.0, 4.0, "Move", "NoButton"),
        ev(1.0, 3.0, 4.0, "Pressed", "Left"),
    ];
    let k = Kinematics::derive(&batch);
    assert_eq!(k.time_diff, vec![0.0, 0.5, 0.5]);
    assert_eq!(k.distance, vec![0.0, 5.0, 0.0]);
    assert_eq!(k.speed, vec![0.0, 10.0, 0.0]);
    assert_eq!(k.acceleration, vec![0.0, 10.0, -10.0]);
}

#[test]
fn features_for_three_event_batch() {
    let batch = vec![
        ev(0.0, 0.0, 0.0, "Move", "NoButton"),
        ev(0.5, 3.0, 4.0, "Move", "NoButton"),
        ev(1.0, 3.0, 4.0, "Pressed", "Left"),
    ];
    let f = MouseFeatures::from_events(&batch).unwrap();
    assert_eq!(f.state_count_move, 2);
    assert_eq!(f.state_count_pressed, 1);
    assert_eq!(f.state_count_released, 0);
    assert_eq!(f.button_count_no_button, 2);
    assert_eq!(f.button_count_left, 1);
    assert_eq!(f.transition_move_pressed, 1);
    assert_eq!(f.transition_pressed_released, 0);
    assert!(approx(f.max_speed, 10.0));
    assert!(approx(f.avg_speed, 10.0 / 3.0));
    assert!(approx(f.avg_duration_move, 0.25));
    assert!(approx(f.avg_duration_pressed, 0.5));
    assert!(approx(f.actions_per_second, 3.0));
    assert!(approx(f.avg_x, 2.0));
    assert!(approx(f.avg_y, 8.0 / 3.0));
    assert!(approx(f.idle_time, 0.0));
}

#[test]
fn extraction_is_order_independent() {
    let sorted = vec![
        ev(0.0, 0.0, 0.0, "Move", "NoButton"),
        ev(0.5, 3.0, 4.0, "Drag", "Left"),
        ev(1.0, 3.0, 4.0, "Released", "Left"),
        ev(2.5, 9.0, 7.0, "Move", "NoButton"),
    ];
    let shuffled = vec![
        sorted[2].clone(),
        sorted[0].clone(),
        sorted[3].clone(),
        sorted[1].clone(),
    ];
    assert_eq!(
        MouseFeatures::from_events(&sorted).unwrap(),
        MouseFeatures::from_events(&shuffled).unwrap()
    );
}

#[test]
fn schema_is_stable_regardless_of_content() {
    assert_eq!(FEATURE_NAMES.len(), 23);

    let move_only = vec![ev(0.0, 1.0, 1.0, "Move", "NoButton")];
    let drag_only = vec![
        ev(0.0, 0.0, 0.0, "Drag", "Left"),
        ev(0.2, 5.0, 0.0, "Drag", "Left"),
    ];
    for batch in [&move_only, &drag_only] {
        let f = MouseFeatures::from_events(batch).unwrap();
        assert_eq!(f.to_vector().len(), FEATURE_NAMES.len());

        let value = serde_json::to_value(&f).unwrap();
        let keys: BTreeSet<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        let expected: BTreeSet<&str> = FEATURE_NAMES.iter().copied().collect();
        assert_eq!(keys, expected);
    }
}

#[test]
fn drag_features() {
    let batch = vec![
        ev(0.0, 0.0, 0.0, "Drag", "Left"),
        ev(0.5, 3.0, 4.0, "Drag", "Left"),
        ev(1.0, 3.0, 4.0, "Released", "Left"),
    ];
    let f = MouseFeatures::from_events(&batch).unwrap();
    assert!(approx(f.drag_distance, 5.0));
    assert!(approx(f.drag_avg_speed, 5.0)); // speeds 0 and 10 over two Drag events
    assert_eq!(f.transition_drag_released, 1);
}

#[test]
fn unknown_categories_are_counted_nowhere() {
    assert_eq!(PointerState::from("Scroll"), PointerState::Other);
    assert_eq!(MouseButton::from("Middle"), MouseButton::Other);

    let batch = vec![
        ev(0.0, 0.0, 0.0, "Move", "NoButton"),
        ev(0.5, 1.0, 1.0, "Scroll", "Middle"),
        ev(1.0, 2.0, 2.0, "Pressed", "Left"),
    ];
    let f = MouseFeatures::from_events(&batch).unwrap();
    let state_total =
        f.state_count_move + f.state_count_pressed + f.state_count_released + f.state_count_drag;
    let button_total = f.button_count_no_button + f.button_count_left + f.button_count_right;
    assert_eq!(state_total, 2);
    assert_eq!(button_total, 2);
    assert!(state_total as usize <= batch.len());
    // Move -> Scroll -> Pressed: no enumerated transition matches
    assert_eq!(f.transition_move_pressed, 0);
}

#[test]
fn non_negative_features() {
    let batch = vec![
        ev(0.0, -10.0, -20.0, "Move", "NoButton"),
        ev(0.1, -15.0, -25.0, "Drag", "Left"),
        ev(3.0, -15.0, -25.0, "Released", "Left"),
    ];
    let f = MouseFeatures::from_events(&batch).unwrap();
    assert!(f.avg_speed >= 0.0);
    assert!(f.max_speed >= 0.0);
    assert!(f.drag_distance >= 0.0);
    assert!(f.idle_time >= 0.0);
}

#[test]
fn duplicate_timestamps_yield_zero_speed() {
    let batch = vec![
        ev(1.0, 0.0, 0.0, "Move", "NoButton"),
        ev(1.0, 100.0, 100.0, "Move", "NoButton"),
    ];
    let k = Kinematics::derive(&batch);
    assert_eq!(k.speed[1], 0.0);

    let f = MouseFeatures::from_events(&batch).unwrap();
    assert_eq!(f.max_speed, 0.0);
    assert_eq!(f.actions_per_second, 0.0); // zero span
}

#[test]
fn single_event_batch_has_zero_differentials() {
    let batch = vec![ev(4.2, 7.0, 9.0, "Move", "NoButton")];
    let f = MouseFeatures::from_events(&batch).unwrap();
    assert_eq!(f.avg_speed, 0.0);
    assert_eq!(f.max_speed, 0.0);
    assert_eq!(f.avg_acceleration, 0.0);
    assert_eq!(f.actions_per_second, 0.0);
    assert!(approx(f.avg_x, 7.0));
    assert!(approx(f.avg_y, 9.0));
}

#[test]
fn idle_time_counts_long_gaps_only() {
    let batch = vec![
        ev(0.0, 0.0, 0.0, "Move", "NoButton"),
        ev(0.9, 1.0, 1.0, "Move", "NoButton"),
        ev(3.4, 2.0, 2.0, "Move", "NoButton"), // 2.5 s gap
    ];
    let f = MouseFeatures::from_events(&batch).unwrap();
    assert!(approx(f.idle_time, 2.5));
}

#[test]
fn empty_batch_is_an_error() {
    let err = MouseFeatures::from_events(&[]).unwrap_err();
    assert!(matches!(err, EngineError::EmptyBatch));
}

#[test]
fn empty_stream_is_an_error() {
    let err = segment(&[], 1.0).unwrap_err();
    assert!(matches!(err, EngineError::EmptyStream));
}

#[test]
fn non_positive_window_width_is_an_error() {
    let stream = vec![ev(0.0, 0.0, 0.0, "Move", "NoButton")];
    assert!(matches!(
        segment(&stream, 0.0).unwrap_err(),
        EngineError::InvalidWindowWidth(_)
    ));
    assert!(matches!(
        segment(&stream, -1.0).unwrap_err(),
        EngineError::InvalidWindowWidth(_)
    ));
}

#[test]
fn windowing_tiles_the_span() {
    let stream = vec![
        ev(0.2, 0.0, 0.0, "Move", "NoButton"),
        ev(0.7, 1.0, 1.0, "Move", "NoButton"),
        ev(1.3, 2.0, 2.0, "Move", "NoButton"),
        ev(3.1, 3.0, 3.0, "Move", "NoButton"),
    ];
    let rows = segment(&stream, 1.0).unwrap();
    assert_eq!(rows.len(), 3);
    assert!(approx(rows[0].start_time, 0.2));
    assert!(approx(rows[1].start_time, 1.2));
    assert!(approx(rows[2].start_time, 2.2));
    for pair in rows.windows(2) {
        assert!(pair[0].start_time < pair[1].start_time);
    }
    assert_eq!(rows[0].features.state_count_move, 2);
    assert_eq!(rows[1].features.state_count_move, 1);
    assert_eq!(rows[2].features.state_count_move, 1);
}

#[test]
fn windowing_skips_empty_windows() {
    let stream = vec![
        ev(0.1, 0.0, 0.0, "Move", "NoButton"),
        ev(2.55, 1.0, 1.0, "Move", "NoButton"),
    ];
    let rows = segment(&stream, 1.0).unwrap();
    assert_eq!(rows.len(), 2);
    assert!(approx(rows[0].start_time, 0.1));
    assert!(approx(rows[1].start_time, 2.1)); // the [1.1, 2.1) window is empty
}

#[test]
fn single_instant_stream_yields_one_window() {
    let stream = vec![
        ev(5.0, 0.0, 0.0, "Pressed", "Left"),
        ev(5.0, 0.0, 0.0, "Released", "Left"),
    ];
    let rows = segment(&stream, 1.0).unwrap();
    assert_eq!(rows.len(), 1);
    assert!(approx(rows[0].start_time, 5.0));
    assert_eq!(rows[0].features.state_count_pressed, 1);
    assert_eq!(rows[0].features.state_count_released, 1);
}

#[test]
fn majority_label_propagates_per_window() {
    let stream = vec![
        labeled(0.0, true),
        labeled(0.2, false),
        labeled(0.4, true),
        labeled(1.5, false),
    ];
    let rows = segment(&stream, 1.0).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].is_illegal, Some(true));
    assert_eq!(rows[1].is_illegal, Some(false));

    let unlabeled = vec![
        ev(0.0, 0.0, 0.0, "Move", "NoButton"),
        ev(0.5, 1.0, 1.0, "Move", "NoButton"),
    ];
    let rows = segment(&unlabeled, 1.0).unwrap();
    assert_eq!(rows[0].is_illegal, None);
}

#[test]
fn majority_label_tie_breaks_to_first_encountered() {
    let stream = vec![
        labeled(0.0, false),
        labeled(0.1, true),
        labeled(0.2, true),
        labeled(0.3, false),
    ];
    let rows = segment(&stream, 1.0).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].is_illegal, Some(false));
}

#[test]
fn window_row_serializes_with_feature_names() {
    let stream = vec![
        ev(0.0, 0.0, 0.0, "Move", "NoButton"),
        ev(0.4, 1.0, 1.0, "Move", "NoButton"),
    ];
    let rows = segment(&stream, 1.0).unwrap();
    let value = serde_json::to_value(&rows[0]).unwrap();
    let obj = value.as_object().unwrap();
    assert!(obj.contains_key("start_time"));
    for name in FEATURE_NAMES {
        assert!(obj.contains_key(name), "missing feature column {name}");
    }
}

#[test]
fn registry_username_mapping() {
    assert_eq!(ModelRegistry::username_for("user_user23_model"), "user_user23");
    assert_eq!(
        ModelRegistry::username_for("user_user8_isolation_forest"),
        "user_user8"
    );
    assert_eq!(ModelRegistry::username_for("alice"), "alice");
}

#[test]
fn registry_tolerates_missing_or_empty_dir() {
    let registry = ModelRegistry::load_dir(Path::new("no/such/models/dir"));
    assert!(registry.is_empty());

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not a model").unwrap();
    let registry = ModelRegistry::load_dir(dir.path());
    assert_eq!(registry.len(), 0);
    assert!(registry.get("alice").is_none());
}

#[test]
fn scorer_without_model_returns_zero() {
    let scorer = AnomalyScorer::load(Path::new("nonexistent.onnx")).unwrap();
    assert!(!scorer.is_loaded());
    let batch = vec![ev(0.0, 0.0, 0.0, "Move", "NoButton")];
    let f = MouseFeatures::from_events(&batch).unwrap();
    assert_eq!(scorer.predict(&f), 0.0);
}

#[test]
fn decision_thresholds() {
    let engine = DecisionEngine::new(Default::default());
    let genuine = engine.evaluate(Some("alice"), &[0.1, -0.3]);
    assert_eq!(genuine.verdict, Verdict::Genuine);
    assert_eq!(genuine.windows, 2);
    assert_eq!(genuine.user.as_deref(), Some("alice"));

    let anomalous = engine.evaluate(Some("alice"), &[-0.9, -0.7]);
    assert_eq!(anomalous.verdict, Verdict::Anomalous);

    // Exactly at threshold is not genuine
    assert_eq!(
        Verdict::from_score(-0.5, engine.config()),
        Verdict::Anomalous
    );
}

#[test]
fn ndjson_session_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.ndjson");
    let mut file = std::fs::File::create(&path).unwrap();
    let events = vec![
        ev(0.0, 0.0, 0.0, "Move", "NoButton"),
        ev(0.5, 3.0, 4.0, "Drag", "Left"),
    ];
    for e in &events {
        writeln!(file, "{}", serde_json::to_string(e).unwrap()).unwrap();
    }
    writeln!(file).unwrap(); // trailing blank line is skipped
    drop(file);

    let loaded = events::read_ndjson(&path).unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[1].state, PointerState::Drag);
    assert_eq!(loaded[1].button, MouseButton::Left);
}

#[test]
fn ndjson_reports_malformed_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.ndjson");
    let good = serde_json::to_string(&ev(0.0, 0.0, 0.0, "Move", "NoButton")).unwrap();
    std::fs::write(&path, format!("{good}\nnot json\n")).unwrap();

    let err = events::read_ndjson(&path).unwrap_err();
    match err {
        EngineError::Parse { line, .. } => assert_eq!(line, 2),
        other => panic!("expected parse error, got {other}"),
    }
}
