use serde::{Deserialize, Serialize};

use crate::level::FINAL_LEVEL;

/// Teeth needed at the final door for the good ending.
pub const TOTAL_TEETH: u32 = 8;

/// Which ending the final door produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndingOutcome {
    Success,
    Failure,
}

/// Where the run is. Both non-playing phases are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunPhase {
    #[default]
    Playing,
    GameOver,
    Ending(EndingOutcome),
}

impl RunPhase {
    pub fn is_terminal(self) -> bool {
        !matches!(self, RunPhase::Playing)
    }
}

/// What walking through the door does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorOutcome {
    NextLevel(u32),
    Ending(EndingOutcome),
}

/// Run-wide progress that survives level transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    /// 1-based level number.
    pub level: u32,
    pub score: u32,
    pub teeth_collected: u32,
    pub phase: RunPhase,
}

impl RunState {
    pub fn new() -> Self {
        Self {
            level: 1,
            score: 0,
            teeth_collected: 0,
            phase: RunPhase::Playing,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Apply a door touch: advance a level, or settle the ending on the last one.
    ///
    /// Returns `None` once the run is already over; the door does nothing then.
    pub fn enter_door(&mut self) -> Option<DoorOutcome> {
        if self.is_terminal() {
            return None;
        }
        if self.level < FINAL_LEVEL {
            self.level += 1;
            Some(DoorOutcome::NextLevel(self.level))
        } else {
            let outcome = ending_for(self.teeth_collected);
            self.set_terminal(RunPhase::Ending(outcome));
            Some(DoorOutcome::Ending(outcome))
        }
    }

    pub fn game_over(&mut self) {
        self.set_terminal(RunPhase::GameOver);
    }

    /// The first terminal phase sticks.
    fn set_terminal(&mut self, phase: RunPhase) {
        if !self.is_terminal() {
            self.phase = phase;
        }
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

/// Ending for a given tooth tally at the final door.
pub fn ending_for(teeth_collected: u32) -> EndingOutcome {
    if teeth_collected == TOTAL_TEETH {
        EndingOutcome::Success
    } else {
        EndingOutcome::Failure
    }
}
