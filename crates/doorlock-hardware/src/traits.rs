//! Hardware device trait definitions.
//!
//! These traits are the narrow contracts between the two node controllers and
//! their peripherals. The UI node consumes [`KeypadDevice`] and
//! [`DisplayDevice`]; the actuator node consumes [`MotorDriver`],
//! [`AlarmOutput`] and [`EepromDevice`]; both build timed waits on a
//! [`TickSource`].
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT),
//! eliminating the need for the `async_trait` macro.

#![allow(async_fn_in_trait)]

use doorlock_core::constants::{DISPLAY_LINES, KEY_CHANGE_PASSWORD, KEY_ENTER, KEY_OPEN_DOOR};

use crate::error::{HardwareError, Result};
use crate::types::MotorState;

/// Input from the 4x4 keypad.
///
/// Each key produces a raw code; [`KeypadInput::from_code`] maps the codes of
/// the door lock's pad to variants.
///
/// | Code | Input |
/// |------|-------|
/// | 0-9  | `Digit` |
/// | 13   | `Enter` |
/// | `+`  | `Plus` (open door) |
/// | `-`  | `Minus` (change password) |
/// | `*`  | `Star` |
/// | `%`  | `Percent` |
/// | `=`  | `Equals` |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypadInput {
    /// Numeric digit (0-9).
    Digit(u8),

    /// Enter/confirm key.
    Enter,

    /// Plus key, selects "open door" in the menu.
    Plus,

    /// Minus key, selects "change password" in the menu.
    Minus,

    /// Star key (*).
    Star,

    /// Percent key (%).
    Percent,

    /// Equals key (=).
    Equals,
}

impl KeypadInput {
    /// Create a digit input.
    ///
    /// # Errors
    ///
    /// Returns an error if the digit is greater than 9.
    ///
    /// # Examples
    ///
    /// ```
    /// use doorlock_hardware::traits::KeypadInput;
    ///
    /// let input = KeypadInput::digit(5).unwrap();
    /// assert_eq!(input.as_digit(), Some(5));
    ///
    /// assert!(KeypadInput::digit(10).is_err());
    /// ```
    pub fn digit(d: u8) -> Result<Self> {
        if d > 9 {
            return Err(HardwareError::invalid_data(format!(
                "Digit must be 0-9, got {}",
                d
            )));
        }
        Ok(Self::Digit(d))
    }

    /// Map a raw key code to an input.
    ///
    /// # Errors
    ///
    /// Returns an error for codes no key on the pad produces.
    ///
    /// # Examples
    ///
    /// ```
    /// use doorlock_hardware::traits::KeypadInput;
    ///
    /// assert_eq!(KeypadInput::from_code(7).unwrap(), KeypadInput::Digit(7));
    /// assert_eq!(KeypadInput::from_code(13).unwrap(), KeypadInput::Enter);
    /// assert_eq!(KeypadInput::from_code(b'+').unwrap(), KeypadInput::Plus);
    /// assert!(KeypadInput::from_code(b'#').is_err());
    /// ```
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0..=9 => Ok(Self::Digit(code)),
            KEY_ENTER => Ok(Self::Enter),
            KEY_OPEN_DOOR => Ok(Self::Plus),
            KEY_CHANGE_PASSWORD => Ok(Self::Minus),
            b'*' => Ok(Self::Star),
            b'%' => Ok(Self::Percent),
            b'=' => Ok(Self::Equals),
            _ => Err(HardwareError::invalid_data(format!("Unknown key code {code}"))),
        }
    }

    /// Raw key code of this input.
    pub fn code(&self) -> u8 {
        match self {
            Self::Digit(d) => *d,
            Self::Enter => KEY_ENTER,
            Self::Plus => KEY_OPEN_DOOR,
            Self::Minus => KEY_CHANGE_PASSWORD,
            Self::Star => b'*',
            Self::Percent => b'%',
            Self::Equals => b'=',
        }
    }

    /// Check if this input is a digit.
    pub fn is_digit(&self) -> bool {
        matches!(self, Self::Digit(_))
    }

    /// Get the digit value if this is a digit input.
    pub fn as_digit(&self) -> Option<u8> {
        match self {
            Self::Digit(d) => Some(*d),
            _ => None,
        }
    }
}

/// Keypad device abstraction.
///
/// # Object Safety
///
/// **NOTE**: This trait is NOT object-safe because `async fn` methods return
/// `impl Future`. Use generic type parameters:
///
/// ```no_run
/// use doorlock_hardware::traits::{KeypadDevice, KeypadInput};
/// use doorlock_hardware::error::Result;
///
/// async fn wait_for_enter<K: KeypadDevice>(keypad: &mut K) -> Result<()> {
///     while keypad.read_input().await? != KeypadInput::Enter {}
///     Ok(())
/// }
/// ```
pub trait KeypadDevice: Send + Sync {
    /// Read the next key press.
    ///
    /// Blocks asynchronously until a key is pressed.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is disconnected.
    async fn read_input(&mut self) -> Result<KeypadInput>;
}

/// Two-line character display.
pub trait DisplayDevice: Send + Sync {
    /// Replace the whole screen with the given lines.
    ///
    /// Lines longer than the display are truncated, shorter ones padded.
    async fn show(&mut self, lines: [&str; DISPLAY_LINES]) -> Result<()>;

    /// Blank the screen.
    async fn clear(&mut self) -> Result<()>;
}

/// Door motor driver.
pub trait MotorDriver: Send + Sync {
    /// Drive the motor in `state` with `duty` percent (0-100).
    ///
    /// # Errors
    ///
    /// Returns an error if the driver rejects the command.
    async fn rotate(&mut self, state: MotorState, duty: u8) -> Result<()>;
}

/// Binary alarm output (buzzer).
pub trait AlarmOutput: Send + Sync {
    async fn set_active(&mut self, active: bool) -> Result<()>;
}

/// Byte-addressable persistent storage reached over a bus.
///
/// Each transfer may fail independently; callers decide how to degrade.
pub trait EepromDevice: Send + Sync {
    /// Read one byte.
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::Bus` if the transfer fails.
    async fn read_byte(&mut self, address: u16) -> Result<u8>;

    /// Write one byte.
    ///
    /// The device needs its write cycle time before it accepts the next
    /// transfer; pacing is the caller's job.
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::Bus` if the transfer fails.
    async fn write_byte(&mut self, address: u16, value: u8) -> Result<()>;
}

/// Periodic timer producing fixed-interval ticks.
///
/// Ticks are only produced between [`start`](TickSource::start) and
/// [`stop`](TickSource::stop).
pub trait TickSource: Send + Sync {
    /// Arm the timer; the first tick fires one period from now.
    fn start(&mut self);

    /// Wait for the next tick.
    ///
    /// # Errors
    ///
    /// Returns an error if the source has not been started.
    async fn tick(&mut self) -> Result<()>;

    /// Disarm the timer.
    fn stop(&mut self);
}
