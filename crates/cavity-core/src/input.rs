use serde::{Deserialize, Serialize};

/// The three logical inputs the simulation understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalInput {
    Left,
    Right,
    Jump,
}

impl LogicalInput {
    /// Fixed mapping from DOM `KeyboardEvent.code` values to logical inputs.
    pub fn from_key_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "KeyA" => Some(Self::Left),
            "ArrowRight" | "KeyD" => Some(Self::Right),
            "Space" | "ArrowUp" | "KeyW" => Some(Self::Jump),
            _ => None,
        }
    }
}

/// Held state of every logical input, sampled once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl InputState {
    pub fn set(&mut self, input: LogicalInput, held: bool) {
        match input {
            LogicalInput::Left => self.left = held,
            LogicalInput::Right => self.right = held,
            LogicalInput::Jump => self.jump = held,
        }
    }

    pub fn is_held(&self, input: LogicalInput) -> bool {
        match input {
            LogicalInput::Left => self.left,
            LogicalInput::Right => self.right,
            LogicalInput::Jump => self.jump,
        }
    }

    /// Apply a raw key-down (`pressed = true`) or key-up event.
    ///
    /// Returns the logical input that changed, or `None` for unmapped keys.
    pub fn handle_key(&mut self, code: &str, pressed: bool) -> Option<LogicalInput> {
        let input = LogicalInput::from_key_code(code)?;
        self.set(input, pressed);
        Some(input)
    }

    /// Signed horizontal intent: -1 for left only, +1 for right only, 0 otherwise.
    pub fn horizontal(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}
