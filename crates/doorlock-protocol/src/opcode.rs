//! Opcode definitions for the inter-node command link.
//!
//! This module is the one place where opcode byte values are assigned. Both the
//! UI node and the actuator node link against it, so the two sides can never
//! disagree on a numeric value.
//!
//! # Wire Format
//!
//! Every frame starts with a single opcode byte. Password-carrying requests
//! are followed by a fixed number of raw digit bytes; there is no length
//! prefix, checksum or terminator:
//!
//! ```text
//! +------+
//! | 0x20 |                                  CHECK_EXISTS
//! +------+
//! +------+----+----+----+----+----+
//! | 0x22 | d0 | d1 | d2 | d3 | d4 |         VERIFY_PASSWORD
//! +------+----+----+----+----+----+
//! +------+------------------------+------------------------+
//! | 0x21 | candidate (5 bytes)    | confirmation (5 bytes) | SETUP_PASSWORD
//! +------+------------------------+------------------------+
//! ```
//!
//! # Opcode Classes
//!
//! - Liveness: `UiReady`, sent by the UI node once it is initialised
//! - Requests: `CheckExists`, `SetupPassword`, `VerifyPassword`, `OpenDoor`,
//!   `TriggerAlarm`, `ResetPassword` (UI node to actuator node)
//! - Status: `Exists`, `NotExists`, `Match`, `Mismatch`, `SetupOk`, `ResetDone`
//!   (actuator node to UI node)
//!
//! # Examples
//!
//! ```
//! use doorlock_protocol::{Opcode, OpcodeClass};
//!
//! let op = Opcode::try_from(0x22).unwrap();
//! assert_eq!(op, Opcode::VerifyPassword);
//! assert_eq!(op.payload_len(), 5);
//! assert_eq!(op.class(), OpcodeClass::Request);
//! assert!(op.expects_reply());
//!
//! assert!(!Opcode::OpenDoor.expects_reply());
//! assert!(Opcode::try_from(0xFF).is_err());
//! ```

use doorlock_core::{Error, Result, constants::PASSWORD_SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad role of an opcode in the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpcodeClass {
    /// Node-liveness signal used for the startup handshake.
    Liveness,
    /// Command verb sent by the UI node.
    Request,
    /// Reply sent by the actuator node.
    Status,
}

impl fmt::Display for OpcodeClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            OpcodeClass::Liveness => "liveness",
            OpcodeClass::Request => "request",
            OpcodeClass::Status => "status",
        };
        write!(f, "{s}")
    }
}

/// Single-byte command or status value exchanged between the two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Opcode {
    // Liveness
    UiReady = 0x10,

    // Requests
    CheckExists = 0x20,
    SetupPassword = 0x21,
    VerifyPassword = 0x22,
    OpenDoor = 0x23,
    TriggerAlarm = 0x24,
    ResetPassword = 0x25,

    // Status
    Exists = 0x30,
    NotExists = 0x31,
    Match = 0x32,
    /// Generic failure status: a wrong password, a setup whose two entries
    /// differ, or a storage fault.
    Mismatch = 0x33,
    SetupOk = 0x34,
    ResetDone = 0x35,
}

impl Opcode {
    /// Every opcode, in wire-value order.
    pub const ALL: [Opcode; 13] = [
        Opcode::UiReady,
        Opcode::CheckExists,
        Opcode::SetupPassword,
        Opcode::VerifyPassword,
        Opcode::OpenDoor,
        Opcode::TriggerAlarm,
        Opcode::ResetPassword,
        Opcode::Exists,
        Opcode::NotExists,
        Opcode::Match,
        Opcode::Mismatch,
        Opcode::SetupOk,
        Opcode::ResetDone,
    ];

    /// Wire value of this opcode.
    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decode a wire byte.
    ///
    /// # Errors
    /// Returns `Error::UnknownOpcode` for bytes outside the table.
    pub fn from_u8(code: u8) -> Result<Self> {
        Opcode::ALL
            .iter()
            .copied()
            .find(|op| op.as_u8() == code)
            .ok_or(Error::UnknownOpcode { code })
    }

    /// Number of raw payload bytes that follow this opcode on the wire.
    ///
    /// The receiver reads exactly this many bytes after the opcode; it is the
    /// only framing the link has.
    #[inline]
    pub fn payload_len(self) -> usize {
        match self {
            Opcode::SetupPassword => 2 * PASSWORD_SIZE,
            Opcode::VerifyPassword => PASSWORD_SIZE,
            _ => 0,
        }
    }

    /// Total frame length (opcode byte plus payload).
    #[inline]
    pub fn frame_len(self) -> usize {
        1 + self.payload_len()
    }

    #[inline]
    pub fn class(self) -> OpcodeClass {
        match self {
            Opcode::UiReady => OpcodeClass::Liveness,
            Opcode::CheckExists
            | Opcode::SetupPassword
            | Opcode::VerifyPassword
            | Opcode::OpenDoor
            | Opcode::TriggerAlarm
            | Opcode::ResetPassword => OpcodeClass::Request,
            Opcode::Exists
            | Opcode::NotExists
            | Opcode::Match
            | Opcode::Mismatch
            | Opcode::SetupOk
            | Opcode::ResetDone => OpcodeClass::Status,
        }
    }

    /// Returns `true` if the actuator node answers this request with a status
    /// opcode.
    ///
    /// `OpenDoor` and `TriggerAlarm` are fire-and-forget: the actuator runs the
    /// sequence and sends nothing back.
    #[inline]
    pub fn expects_reply(self) -> bool {
        self.class() == OpcodeClass::Request
            && !matches!(self, Opcode::OpenDoor | Opcode::TriggerAlarm)
    }

    /// Symbolic name used in logs and the opcode listing.
    pub fn as_str(self) -> &'static str {
        match self {
            Opcode::UiReady => "UI_READY",
            Opcode::CheckExists => "CHECK_EXISTS",
            Opcode::SetupPassword => "SETUP_PASSWORD",
            Opcode::VerifyPassword => "VERIFY_PASSWORD",
            Opcode::OpenDoor => "OPEN_DOOR",
            Opcode::TriggerAlarm => "TRIGGER_ALARM",
            Opcode::ResetPassword => "RESET_PASSWORD",
            Opcode::Exists => "EXISTS",
            Opcode::NotExists => "NOT_EXISTS",
            Opcode::Match => "MATCH",
            Opcode::Mismatch => "MISMATCH",
            Opcode::SetupOk => "SETUP_OK",
            Opcode::ResetDone => "RESET_DONE",
        }
    }
}

impl TryFrom<u8> for Opcode {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        Opcode::from_u8(code)
    }
}

impl From<Opcode> for u8 {
    fn from(op: Opcode) -> u8 {
        op.as_u8()
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
