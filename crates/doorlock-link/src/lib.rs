//! Command channel between the UI node and the actuator node.
//!
//! [`Link`] carries [`Message`](doorlock_protocol::Message) frames over any
//! async byte stream: a serial port on hardware, an in-memory duplex pipe in
//! tests and in the simulator.

pub mod channel;
pub mod config;
pub mod error;

pub use channel::{Link, duplex};
pub use config::LinkConfig;
pub use error::LinkError;
