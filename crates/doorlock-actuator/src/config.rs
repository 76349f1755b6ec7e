use doorlock_core::{
    DoorTimings, Error, Result,
    constants::{DEFAULT_ALARM_SECS, DEFAULT_MOTOR_DUTY, DEFAULT_WRITE_CYCLE_MS, MAX_MOTOR_DUTY},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration of the actuator node.
///
/// # Example
///
/// ```
/// use doorlock_actuator::ActuatorConfig;
///
/// let config = ActuatorConfig::default();
/// assert_eq!(config.door.unlock_secs, 15);
/// assert_eq!(config.alarm_secs, 60);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActuatorConfig {
    /// Door sequence phase durations
    pub door: DoorTimings,

    /// How long the alarm output stays on (seconds)
    pub alarm_secs: u32,

    /// Motor duty for every motor command (percent)
    pub motor_duty: u8,

    /// EEPROM write cycle time (milliseconds)
    pub write_cycle_ms: u64,
}

impl ActuatorConfig {
    pub fn write_cycle(&self) -> Duration {
        Duration::from_millis(self.write_cycle_ms)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the motor duty exceeds 100%.
    pub fn validate(&self) -> Result<()> {
        if self.motor_duty > MAX_MOTOR_DUTY {
            return Err(Error::Config(format!(
                "motor_duty must be 0-{MAX_MOTOR_DUTY}, got {}",
                self.motor_duty
            )));
        }
        Ok(())
    }
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            door: DoorTimings::default(),
            alarm_secs: DEFAULT_ALARM_SECS,
            motor_duty: DEFAULT_MOTOR_DUTY,
            write_cycle_ms: DEFAULT_WRITE_CYCLE_MS,
        }
    }
}
