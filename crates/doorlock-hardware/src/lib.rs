//! Hardware device abstraction layer for the door lock nodes.
//!
//! This crate provides trait-based abstractions for the peripherals of both
//! nodes: the keypad and character display of the UI node, and the door
//! motor, alarm output and credential EEPROM of the actuator node. A periodic
//! [`TickSource`] and the [`WaitTimer`] built on it provide the only real-time
//! delays either node uses.
//!
//! # Design Philosophy
//!
//! - **Async-first**: All I/O operations are asynchronous using native `async fn`
//!   in traits (Rust 1.90 + Edition 2024 RPITIT).
//! - **Narrow contracts**: each trait exposes exactly what the controllers
//!   consume ("show these lines", "read a byte", "N ticks elapse").
//! - **Error-aware**: All operations return `Result<T>` with [`HardwareError`].
//!
//! # Example
//!
//! ```no_run
//! use doorlock_hardware::traits::{KeypadDevice, KeypadInput};
//! use doorlock_hardware::error::Result;
//!
//! async fn read_digits<K: KeypadDevice>(keypad: &mut K, count: usize) -> Result<Vec<u8>> {
//!     let mut digits = Vec::with_capacity(count);
//!     while digits.len() < count {
//!         if let KeypadInput::Digit(d) = keypad.read_input().await? {
//!             digits.push(d);
//!         }
//!     }
//!     Ok(digits)
//! }
//! ```
//!
//! # Mock Implementations
//!
//! The [`mock`] module provides simulated devices with control handles for
//! tests and the simulator.

pub mod error;
pub mod mock;
pub mod timer;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{HardwareError, Result};
pub use timer::{TokioTickSource, WaitTimer};
pub use traits::{
    AlarmOutput, DisplayDevice, EepromDevice, KeypadDevice, KeypadInput, MotorDriver, TickSource,
};
pub use types::MotorState;
