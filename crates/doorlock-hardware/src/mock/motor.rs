//! Mock door motor recording every drive command.

use doorlock_core::constants::MAX_MOTOR_DUTY;
use tokio::time::Instant;

use super::recorder::Recorder;
use crate::{HardwareError, Result, traits::MotorDriver, types::MotorState};

/// One motor command as received by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorEvent {
    pub state: MotorState,
    pub duty: u8,
    pub at: Instant,
}

/// Mock motor driver.
#[derive(Debug)]
pub struct MockMotor {
    events: Recorder<MotorEvent>,
}

impl MockMotor {
    /// Create a new mock motor and its inspection handle.
    pub fn new() -> (Self, MockMotorHandle) {
        let events = Recorder::new();
        (
            Self {
                events: events.clone(),
            },
            MockMotorHandle { events },
        )
    }
}

impl MotorDriver for MockMotor {
    async fn rotate(&mut self, state: MotorState, duty: u8) -> Result<()> {
        if duty > MAX_MOTOR_DUTY {
            return Err(HardwareError::invalid_data(format!(
                "Motor duty must be 0-{MAX_MOTOR_DUTY}, got {duty}"
            )));
        }

        self.events.push(MotorEvent {
            state,
            duty,
            at: Instant::now(),
        });
        Ok(())
    }
}

/// Handle for inspecting the commands a mock motor received.
#[derive(Debug, Clone)]
pub struct MockMotorHandle {
    events: Recorder<MotorEvent>,
}

impl MockMotorHandle {
    /// Every command so far, oldest first.
    pub fn events(&self) -> Vec<MotorEvent> {
        self.events.snapshot()
    }

    /// Sequence of motor states commanded so far.
    pub fn states(&self) -> Vec<MotorState> {
        self.events().into_iter().map(|e| e.state).collect()
    }

    /// Current motor state (stopped if never commanded).
    pub fn state(&self) -> MotorState {
        self.events.last().map_or(MotorState::Stopped, |e| e.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_commands_in_order() {
        let (mut motor, handle) = MockMotor::new();
        assert_eq!(handle.state(), MotorState::Stopped);

        motor.rotate(MotorState::Forward, 100).await.unwrap();
        motor.rotate(MotorState::Stopped, 100).await.unwrap();

        assert_eq!(handle.states(), vec![MotorState::Forward, MotorState::Stopped]);
        assert_eq!(handle.events()[0].duty, 100);
    }

    #[tokio::test]
    async fn test_rejects_excess_duty() {
        let (mut motor, handle) = MockMotor::new();

        let result = motor.rotate(MotorState::Reverse, 101).await;
        assert!(matches!(result, Err(HardwareError::InvalidData { .. })));
        assert!(handle.events().is_empty());
    }
}
