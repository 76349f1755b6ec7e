//! Mock device implementations for testing and simulation.
//!
//! Each mock comes with a handle that tests use to drive inputs or inspect
//! what the device was told to do, with the Tokio instant of every event.

pub mod alarm;
pub mod display;
pub mod eeprom;
pub mod keypad;
pub mod motor;
mod recorder;

// Re-export commonly used types
pub use alarm::{AlarmEvent, MockAlarm, MockAlarmHandle};
pub use display::{DisplayFrame, MockDisplay, MockDisplayHandle};
pub use eeprom::{MockEeprom, MockEepromHandle};
pub use keypad::{MockKeypad, MockKeypadHandle};
pub use motor::{MockMotor, MockMotorHandle, MotorEvent};
