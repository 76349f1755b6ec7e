use crate::{
    Result,
    constants::{
        DEFAULT_HOLD_SECS, DEFAULT_LOCK_SECS, DEFAULT_UNLOCK_SECS, MASK_CHAR, MAX_DIGIT,
        PASSWORD_SIZE,
    },
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

/// Fixed-length password of `PASSWORD_SIZE` digit values.
///
/// Stored and compared byte-for-byte; there is no hashing. The bytes travel
/// over the link and into the EEPROM exactly as entered.
///
/// # Security
/// Equality is constant-time, and neither `Debug` nor `Display` reveal the
/// digits.
#[derive(Clone, Copy, Eq)]
pub struct Password([u8; PASSWORD_SIZE]);

impl Password {
    /// Create a password from entered digits.
    ///
    /// # Errors
    /// Returns `Error::InvalidPasswordLength` if `digits` does not hold exactly
    /// `PASSWORD_SIZE` values, or `Error::InvalidDigit` if any value is above 9.
    pub fn from_digits(digits: &[u8]) -> Result<Self> {
        let bytes: [u8; PASSWORD_SIZE] =
            digits
                .try_into()
                .map_err(|_| Error::InvalidPasswordLength {
                    expected: PASSWORD_SIZE,
                    actual: digits.len(),
                })?;

        if let Some(&value) = bytes.iter().find(|&&d| d > MAX_DIGIT) {
            return Err(Error::InvalidDigit { value });
        }

        Ok(Password(bytes))
    }

    /// Wrap raw bytes read from the link or from storage.
    ///
    /// No digit validation is applied: whatever was received or persisted is
    /// compared as-is.
    #[must_use]
    pub fn from_raw(bytes: [u8; PASSWORD_SIZE]) -> Self {
        Password(bytes)
    }

    /// Get the raw password bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; PASSWORD_SIZE] {
        &self.0
    }

    /// Returns `true` if every position holds the same value.
    #[must_use]
    pub fn matches(&self, other: &Password) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other)
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Password({self})")
    }
}

impl fmt::Display for Password {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for _ in 0..PASSWORD_SIZE {
            write!(f, "{MASK_CHAR}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Password {
    type Err = Error;

    /// Parse a string of decimal digits such as `"12345"`.
    fn from_str(s: &str) -> Result<Self> {
        let digits = s
            .chars()
            .map(|c| {
                c.to_digit(10)
                    .map(|d| d as u8)
                    .ok_or(Error::InvalidDigit { value: c as u8 })
            })
            .collect::<Result<Vec<u8>>>()?;
        Password::from_digits(&digits)
    }
}

/// Durations of the three timed phases of the door-open sequence.
///
/// The actuator node drives the motor with these timings; the UI node uses the
/// same values to mirror the door progress on its display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoorTimings {
    /// Motor forward (unlocking).
    pub unlock_secs: u32,

    /// Motor stopped, door held open.
    pub hold_secs: u32,

    /// Motor reverse (re-locking).
    pub lock_secs: u32,
}

impl DoorTimings {
    /// Total duration of the sequence in seconds, saturating at `u32::MAX`.
    #[must_use]
    pub fn total_secs(&self) -> u32 {
        self.unlock_secs
            .saturating_add(self.hold_secs)
            .saturating_add(self.lock_secs)
    }
}

impl Default for DoorTimings {
    fn default() -> Self {
        Self {
            unlock_secs: DEFAULT_UNLOCK_SECS,
            hold_secs: DEFAULT_HOLD_SECS,
            lock_secs: DEFAULT_LOCK_SECS,
        }
    }
}
