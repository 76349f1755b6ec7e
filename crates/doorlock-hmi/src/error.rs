use doorlock_hardware::HardwareError;
use doorlock_link::LinkError;
use thiserror::Error;

/// Errors that stop the UI controller.
#[derive(Debug, Error)]
pub enum HmiError {
    #[error("Link error: {0}")]
    Link(#[from] LinkError),

    #[error("Hardware error: {0}")]
    Hardware(#[from] HardwareError),

    #[error(transparent)]
    Core(#[from] doorlock_core::Error),
}
