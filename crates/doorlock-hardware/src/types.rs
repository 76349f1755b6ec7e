//! Common types shared across hardware device implementations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of the door motor.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotorState {
    /// Not driven.
    #[default]
    Stopped,

    /// Clockwise: unlocks the door.
    Forward,

    /// Counter-clockwise: re-locks the door.
    Reverse,
}

impl fmt::Display for MotorState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            MotorState::Stopped => "stopped",
            MotorState::Forward => "forward",
            MotorState::Reverse => "reverse",
        };
        write!(f, "{s}")
    }
}
