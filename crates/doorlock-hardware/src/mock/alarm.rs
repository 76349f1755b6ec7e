//! Mock alarm output (buzzer).

use tokio::time::Instant;

use super::recorder::Recorder;
use crate::{Result, traits::AlarmOutput};

/// One change of the alarm output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmEvent {
    pub active: bool,
    pub at: Instant,
}

/// Mock alarm output.
#[derive(Debug)]
pub struct MockAlarm {
    events: Recorder<AlarmEvent>,
}

impl MockAlarm {
    /// Create a new mock alarm and its inspection handle.
    pub fn new() -> (Self, MockAlarmHandle) {
        let events = Recorder::new();
        (
            Self {
                events: events.clone(),
            },
            MockAlarmHandle { events },
        )
    }
}

impl AlarmOutput for MockAlarm {
    async fn set_active(&mut self, active: bool) -> Result<()> {
        self.events.push(AlarmEvent {
            active,
            at: Instant::now(),
        });
        Ok(())
    }
}

/// Handle for inspecting a mock alarm.
#[derive(Debug, Clone)]
pub struct MockAlarmHandle {
    events: Recorder<AlarmEvent>,
}

impl MockAlarmHandle {
    pub fn events(&self) -> Vec<AlarmEvent> {
        self.events.snapshot()
    }

    pub fn is_active(&self) -> bool {
        self.events.last().is_some_and(|e| e.active)
    }

    /// Number of times the alarm was switched on.
    pub fn activations(&self) -> usize {
        self.events().iter().filter(|e| e.active).count()
    }
}
