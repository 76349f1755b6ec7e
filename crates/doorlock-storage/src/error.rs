use doorlock_hardware::HardwareError;
use thiserror::Error;

/// Storage-specific error types for the credential store.
///
/// Every failure originates in a byte transfer to or from the EEPROM; the
/// device error carries the address that failed.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A byte transfer failed
    #[error("Storage device error: {0}")]
    Device(#[from] HardwareError),
}

/// Specialized result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
