use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::input::InputState;

/// Core trait for a single-player, frame-stepped game.
///
/// The host owns pacing (one `advance_frame` per display refresh) and drawing;
/// the game only owns simulation state.
pub trait FrameGame {
    /// Discrete gameplay events emitted by a frame (sounds, toasts, logs).
    type Event: Debug + Clone;

    /// Render-facing view of the current state.
    type Snapshot: Debug + Clone + PartialEq;

    /// Game metadata for the host's title screen.
    fn metadata(&self) -> GameMetadata;

    /// Reset everything and begin a fresh run at the first level.
    fn start_run(&mut self);

    /// Advance the simulation by exactly one frame.
    ///
    /// Once the run is finished this is a no-op that returns no events.
    fn advance_frame(&mut self, input: &InputState) -> Vec<Self::Event>;

    /// Whether the run has reached a terminal state.
    fn is_finished(&self) -> bool;

    /// Frames simulated since the last `start_run`.
    fn frame_count(&self) -> u64;

    /// Capture everything the renderer needs for this frame.
    fn snapshot(&self) -> Self::Snapshot;

    /// Display refresh rate the game was tuned for, in Hz.
    fn frame_rate_hint(&self) -> f32 {
        60.0
    }
}

/// Game metadata for the host's title screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
    pub level_count: u32,
}
