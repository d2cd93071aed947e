use serde::{Deserialize, Serialize};

use cavity_core::game_trait::FrameGame;
use cavity_core::input::InputState;

use crate::error::RunnerError;

const BUILTIN_SCRIPT: &str = include_str!("../scripts/demo.toml");

/// A run of frames with the same held inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub frames: usize,
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub right: bool,
    #[serde(default)]
    pub jump: bool,
}

impl Segment {
    pub fn input(&self) -> InputState {
        InputState {
            left: self.left,
            right: self.right,
            jump: self.jump,
        }
    }
}

/// Scripted input for a headless run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Script {
    #[serde(rename = "segment", default)]
    pub segments: Vec<Segment>,
}

impl Script {
    pub fn from_toml_str(source: &str) -> Result<Self, RunnerError> {
        toml::from_str(source).map_err(|e| RunnerError::Script(e.to_string()))
    }

    pub fn load(path: &str) -> Result<Self, RunnerError> {
        let source = std::fs::read_to_string(path).map_err(|e| RunnerError::Io {
            path: path.to_string(),
            source: e,
        })?;
        Self::from_toml_str(&source)
    }

    /// The demo script shipped with the runner.
    pub fn builtin() -> Result<Self, RunnerError> {
        Self::from_toml_str(BUILTIN_SCRIPT)
    }

    pub fn total_frames(&self) -> usize {
        self.segments.iter().map(|s| s.frames).sum()
    }
}

/// Outcome of feeding a script to a game.
#[derive(Debug, Clone)]
pub struct PlayReport<E> {
    pub frames_played: usize,
    pub events: Vec<E>,
}

/// Feed every segment to the game, stopping as soon as the run is finished.
pub fn play<G: FrameGame>(game: &mut G, script: &Script) -> PlayReport<G::Event> {
    let mut report = PlayReport {
        frames_played: 0,
        events: Vec::new(),
    };
    for segment in &script.segments {
        let input = segment.input();
        for _ in 0..segment.frames {
            if game.is_finished() {
                return report;
            }
            report.events.extend(game.advance_frame(&input));
            report.frames_played += 1;
        }
    }
    report
}
