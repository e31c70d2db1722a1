//! mousetrail entrypoint: replay a captured pointer session through the
//! feature engine, score each time window with the user's outlier model, and
//! print the verdict as one JSON line.

use mousetrail::{
    config::EngineConfig,
    decision::DecisionEngine,
    events,
    features,
    logging::StructuredLogger,
    model::ModelRegistry,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = std::env::var("MOUSETRAIL_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.json"));
    let config = EngineConfig::load(&config_path);

    StructuredLogger::init(config.log.json, &config.log.level);

    let mut args = std::env::args().skip(1);
    let session_path = args
        .next()
        .ok_or("usage: mousetrail <session.ndjson> [username]")?;
    let username = args.next();

    let stream = events::read_ndjson(Path::new(&session_path))?;
    info!(count = stream.len(), path = %session_path, "loaded session");

    let windows = features::segment(&stream, config.window.width_secs)?;
    info!(
        windows = windows.len(),
        width_secs = config.window.width_secs,
        "segmented session"
    );

    let registry = ModelRegistry::load_dir(&config.model_dir);
    let scorer = username.as_deref().and_then(|u| registry.get(u));
    if scorer.is_none() {
        warn!(user = username.as_deref(), "no model for user; scoring disabled");
    }

    let scores: Vec<f32> = windows
        .iter()
        .map(|w| scorer.map(|s| s.predict(&w.features)).unwrap_or(0.0))
        .collect();

    let engine = DecisionEngine::new(config.decision.clone());
    let report = engine.evaluate(username.as_deref(), &scores);
    info!(
        attempt_id = %report.attempt_id,
        score = report.score,
        verdict = ?report.verdict,
        windows = report.windows,
        "scoring complete"
    );

    StructuredLogger::emit_json(&report, &mut std::io::stdout());
    Ok(())
}
