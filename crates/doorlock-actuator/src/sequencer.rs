//! Door and alarm actuation sequences.
//!
//! Every phase is timed with [`WaitTimer::wait_seconds`], so the actuator
//! node serves no commands until a sequence has finished.

use doorlock_core::DoorTimings;
use doorlock_hardware::{AlarmOutput, MotorDriver, MotorState, TickSource, WaitTimer};
use tracing::{error, info};

use crate::{ActuatorConfig, ActuatorError};

/// Drives the motor and alarm through their timed sequences.
#[derive(Debug)]
pub struct Sequencer<M, A, T> {
    motor: M,
    alarm: A,
    timer: WaitTimer<T>,
    door: DoorTimings,
    alarm_secs: u32,
    duty: u8,
}

impl<M, A, T> Sequencer<M, A, T>
where
    M: MotorDriver,
    A: AlarmOutput,
    T: TickSource,
{
    pub fn new(motor: M, alarm: A, ticks: T, config: &ActuatorConfig) -> Self {
        Self {
            motor,
            alarm,
            timer: WaitTimer::new(ticks),
            door: config.door,
            alarm_secs: config.alarm_secs,
            duty: config.motor_duty,
        }
    }

    pub fn door_timings(&self) -> DoorTimings {
        self.door
    }

    /// Unlock, hold, lock, then stop the motor.
    ///
    /// A failed motor command is logged and the sequence keeps its timing.
    ///
    /// # Errors
    ///
    /// Returns an error only if the tick source fails.
    pub async fn open_door(&mut self) -> Result<(), ActuatorError> {
        info!(total_secs = self.door.total_secs(), "Door sequence started");

        let phases = [
            (MotorState::Forward, self.door.unlock_secs),
            (MotorState::Stopped, self.door.hold_secs),
            (MotorState::Reverse, self.door.lock_secs),
        ];
        for (state, secs) in phases {
            self.drive(state).await;
            self.timer.wait_seconds(secs).await?;
        }
        self.drive(MotorState::Stopped).await;

        info!("Door sequence finished");
        Ok(())
    }

    /// Hold the alarm output on for the configured time.
    ///
    /// # Errors
    ///
    /// Returns an error only if the tick source fails. The output is switched
    /// off before returning in that case too.
    pub async fn sound_alarm(&mut self) -> Result<(), ActuatorError> {
        info!(secs = self.alarm_secs, "Alarm on");
        self.set_alarm(true).await;

        let waited = self.timer.wait_seconds(self.alarm_secs).await;

        self.set_alarm(false).await;
        info!("Alarm off");
        waited.map_err(ActuatorError::from)
    }

    async fn drive(&mut self, state: MotorState) {
        if let Err(e) = self.motor.rotate(state, self.duty).await {
            error!(%state, error = %e, "Motor command failed");
        }
    }

    async fn set_alarm(&mut self, active: bool) {
        if let Err(e) = self.alarm.set_active(active).await {
            error!(active, error = %e, "Alarm output failed");
        }
    }
}
