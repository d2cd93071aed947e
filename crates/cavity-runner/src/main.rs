mod error;
mod script;

use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cavity_core::game_trait::FrameGame;
use cavity_quest::CavityQuest;
use cavity_quest::config::CavityQuestConfig;

use error::RunnerError;
use script::{Script, play};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "CavityQuest runner failed");
            ExitCode::FAILURE
        },
    }
}

/// Usage: `cavity-runner [script.toml]`. Without a path the demo script runs.
fn run() -> Result<(), RunnerError> {
    let script = match std::env::args().nth(1) {
        Some(path) => Script::load(&path)?,
        None => Script::builtin()?,
    };
    let config = CavityQuestConfig::load();
    let mut game = CavityQuest::with_builtin_levels(config)?;

    let meta = game.metadata();
    info!(
        game = %meta.name,
        levels = meta.level_count,
        frame_rate = game.frame_rate_hint(),
        viewport_width = game.config().viewport_width,
        viewport_height = game.config().viewport_height,
        segments = script.segments.len(),
        frames = script.total_frames(),
        "Running input script"
    );

    let report = play(&mut game, &script);
    let snapshot = game.snapshot();
    info!(
        frames = report.frames_played,
        events = report.events.len(),
        phase = ?snapshot.phase,
        level = snapshot.level,
        score = snapshot.score,
        "Script finished"
    );

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
