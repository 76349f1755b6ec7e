use doorlock_core::{
    DoorTimings, Error, Result,
    constants::{
        DEFAULT_ALARM_SECS, DEFAULT_CHANGE_NOTICE_SECS, DEFAULT_MAX_WRONG_ATTEMPTS,
        DEFAULT_WRONG_PASSWORD_NOTICE_MS,
    },
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration of the UI node.
///
/// `door` and `alarm_secs` must match the actuator node's values for the
/// screens to follow the door and alarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HmiConfig {
    pub door: DoorTimings,

    pub alarm_secs: u32,

    /// Consecutive wrong passwords that raise the alarm
    pub max_wrong_attempts: u8,

    pub wrong_password_notice_ms: u64,

    pub change_notice_secs: u32,
}

impl HmiConfig {
    pub fn wrong_password_notice(&self) -> Duration {
        Duration::from_millis(self.wrong_password_notice_ms)
    }

    /// # Errors
    ///
    /// Returns `Error::Config` if `max_wrong_attempts` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_wrong_attempts == 0 {
            return Err(Error::Config(
                "max_wrong_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for HmiConfig {
    fn default() -> Self {
        Self {
            door: DoorTimings::default(),
            alarm_secs: DEFAULT_ALARM_SECS,
            max_wrong_attempts: DEFAULT_MAX_WRONG_ATTEMPTS,
            wrong_password_notice_ms: DEFAULT_WRONG_PASSWORD_NOTICE_MS,
            change_notice_secs: DEFAULT_CHANGE_NOTICE_SECS,
        }
    }
}
