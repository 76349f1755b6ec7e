use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Credential errors
    #[error("Invalid digit: {value} (expected 0-9)")]
    InvalidDigit { value: u8 },

    #[error("Invalid password length: expected {expected}, got {actual}")]
    InvalidPasswordLength { expected: usize, actual: usize },

    // Protocol errors
    #[error("Unknown opcode: 0x{code:02X}")]
    UnknownOpcode { code: u8 },

    #[error("Invalid payload for {opcode}: {message}")]
    InvalidPayload { opcode: String, message: String },

    // Session errors
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
