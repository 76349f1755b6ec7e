use doorlock_protocol::Opcode;
use thiserror::Error;

/// Errors that can occur on the command link
#[derive(Debug, Error)]
pub enum LinkError {
    /// No reply arrived within the configured window
    #[error("Reply timeout after {0}ms")]
    Timeout(u64),

    /// The peer closed the byte stream
    #[error("Link disconnected")]
    Disconnected,

    /// A frame arrived that does not answer the request in flight
    #[error("Unexpected reply {reply} to {request}")]
    UnexpectedReply { request: Opcode, reply: Opcode },

    /// Protocol-level error from the codec or the underlying stream
    #[error("Protocol error: {0}")]
    Protocol(#[from] doorlock_core::Error),
}

impl LinkError {
    /// Returns `true` if the exchange can be retried after a resync.
    ///
    /// A closed stream never recovers; everything else leaves the link usable.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, LinkError::Disconnected)
    }
}
