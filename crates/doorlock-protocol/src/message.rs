//! Typed link messages.
//!
//! A [`Message`] is an opcode together with its decoded payload. Password
//! payloads are carried as [`Password`] values so that neither node handles
//! loose byte slices.

use bytes::{BufMut, BytesMut};
use doorlock_core::{Error, Password, Result, constants::PASSWORD_SIZE};
use std::fmt;

use crate::Opcode;

/// One frame on the command link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    UiReady,
    CheckExists,
    SetupPassword {
        candidate: Password,
        confirmation: Password,
    },
    VerifyPassword {
        candidate: Password,
    },
    OpenDoor,
    TriggerAlarm,
    ResetPassword,
    Exists,
    NotExists,
    Match,
    Mismatch,
    SetupOk,
    ResetDone,
}

impl Message {
    /// The opcode that introduces this message on the wire.
    pub fn opcode(&self) -> Opcode {
        match self {
            Message::UiReady => Opcode::UiReady,
            Message::CheckExists => Opcode::CheckExists,
            Message::SetupPassword { .. } => Opcode::SetupPassword,
            Message::VerifyPassword { .. } => Opcode::VerifyPassword,
            Message::OpenDoor => Opcode::OpenDoor,
            Message::TriggerAlarm => Opcode::TriggerAlarm,
            Message::ResetPassword => Opcode::ResetPassword,
            Message::Exists => Opcode::Exists,
            Message::NotExists => Opcode::NotExists,
            Message::Match => Opcode::Match,
            Message::Mismatch => Opcode::Mismatch,
            Message::SetupOk => Opcode::SetupOk,
            Message::ResetDone => Opcode::ResetDone,
        }
    }

    /// Build a message from an opcode and the raw payload that followed it.
    ///
    /// # Errors
    /// Returns `Error::InvalidPayload` if `payload` is not exactly
    /// `opcode.payload_len()` bytes long.
    pub fn from_parts(opcode: Opcode, payload: &[u8]) -> Result<Self> {
        if payload.len() != opcode.payload_len() {
            return Err(Error::InvalidPayload {
                opcode: opcode.to_string(),
                message: format!(
                    "expected {} bytes, got {}",
                    opcode.payload_len(),
                    payload.len()
                ),
            });
        }

        let message = match opcode {
            Opcode::UiReady => Message::UiReady,
            Opcode::CheckExists => Message::CheckExists,
            Opcode::SetupPassword => {
                let (first, second) = payload.split_at(PASSWORD_SIZE);
                Message::SetupPassword {
                    candidate: password_from_slice(opcode, first)?,
                    confirmation: password_from_slice(opcode, second)?,
                }
            }
            Opcode::VerifyPassword => Message::VerifyPassword {
                candidate: password_from_slice(opcode, payload)?,
            },
            Opcode::OpenDoor => Message::OpenDoor,
            Opcode::TriggerAlarm => Message::TriggerAlarm,
            Opcode::ResetPassword => Message::ResetPassword,
            Opcode::Exists => Message::Exists,
            Opcode::NotExists => Message::NotExists,
            Opcode::Match => Message::Match,
            Opcode::Mismatch => Message::Mismatch,
            Opcode::SetupOk => Message::SetupOk,
            Opcode::ResetDone => Message::ResetDone,
        };

        Ok(message)
    }

    /// Payload-free message for `opcode`, or `None` if the opcode carries a
    /// payload.
    pub fn bare(opcode: Opcode) -> Option<Self> {
        Message::from_parts(opcode, &[]).ok()
    }

    /// Append the wire form of this message to `dst`.
    pub fn write_to(&self, dst: &mut BytesMut) {
        let opcode = self.opcode();
        dst.reserve(opcode.frame_len());
        dst.put_u8(opcode.as_u8());

        match self {
            Message::SetupPassword {
                candidate,
                confirmation,
            } => {
                dst.put_slice(candidate.as_bytes());
                dst.put_slice(confirmation.as_bytes());
            }
            Message::VerifyPassword { candidate } => dst.put_slice(candidate.as_bytes()),
            _ => {}
        }
    }

    /// Wire form of this message as a fresh buffer.
    pub fn to_bytes(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(self.opcode().frame_len());
        self.write_to(&mut buf);
        buf
    }
}

fn password_from_slice(opcode: Opcode, bytes: &[u8]) -> Result<Password> {
    let raw: [u8; PASSWORD_SIZE] = bytes.try_into().map_err(|_| Error::InvalidPayload {
        opcode: opcode.to_string(),
        message: format!("password must be {PASSWORD_SIZE} bytes"),
    })?;
    Ok(Password::from_raw(raw))
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.opcode())
    }
}
