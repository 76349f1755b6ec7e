//! Persistent credential storage for the actuator node.
//!
//! The password and its "exists" flag live at fixed addresses of a byte EEPROM
//! (see [`doorlock_core::constants`]). [`CredentialStore`] is the only code that
//! touches those addresses.
//!
//! # Write Ordering
//!
//! A password is written in three steps: flag cleared, digits written, flag
//! set. Whatever point a power loss interrupts, the flag only reads as present
//! once every digit has been committed.

pub mod credential;
pub mod error;

pub use credential::{CredentialRecord, CredentialStore};
pub use error::{StorageError, StorageResult};
