//! Actuator node: command dispatcher and actuation sequences.
//!
//! The node waits for the UI node's `UI_READY`, then serves one command at a
//! time: credential queries and updates against the [`CredentialStore`], and
//! the door and alarm sequences. Each sequence runs to completion before the
//! next command is read.
//!
//! [`CredentialStore`]: doorlock_storage::CredentialStore

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod sequencer;

pub use config::ActuatorConfig;
pub use dispatcher::{ActuatorDevices, Dispatcher};
pub use error::ActuatorError;
pub use sequencer::Sequencer;
