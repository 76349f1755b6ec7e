use doorlock_hardware::HardwareError;
use doorlock_link::LinkError;
use thiserror::Error;

/// Errors that stop the actuator node.
///
/// Storage faults never appear here: the dispatcher answers them with a
/// failure status and keeps serving.
#[derive(Debug, Error)]
pub enum ActuatorError {
    #[error("Link error: {0}")]
    Link(#[from] LinkError),

    #[error("Hardware error: {0}")]
    Hardware(#[from] HardwareError),

    #[error("Configuration error: {0}")]
    Config(#[from] doorlock_core::Error),
}
