//! UI node: keypad menu, password entry and the session state machine.
//!
//! # Session flow
//!
//! - AwaitingBoot → CheckingExistence → MainMenu / SettingUpPassword
//! - SettingUpPassword → MainMenu (retried until both entries agree)
//! - MainMenu → AuthenticatingForOpen / AuthenticatingForChange
//! - AuthenticatingForOpen → MainMenu (door opened) / AlarmActive
//! - AuthenticatingForChange → SettingUpPassword (password reset) / AlarmActive
//! - AlarmActive → MainMenu
//!
//! A link timeout from any state sends the session back to AwaitingBoot,
//! which drops whatever is left on the link and handshakes again.

pub mod config;
pub mod controller;
pub mod entry;
pub mod error;
pub mod screen;
pub mod state_machine;

pub use config::HmiConfig;
pub use controller::Controller;
pub use error::HmiError;
pub use screen::Screen;
pub use state_machine::{SessionMachine, SessionState, SessionTransition};
