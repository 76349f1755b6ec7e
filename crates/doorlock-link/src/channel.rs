//! Request/response channel over a raw byte stream.
//!
//! # Architecture
//!
//! ```text
//! Interaction Controller                         Actuator Dispatcher
//!        │                                              │
//!        └─> Link ──(bytes)── serial line ──(bytes)── Link <─┘
//!             │                                        │
//!             └─> LinkCodec                  LinkCodec <┘
//! ```
//!
//! # Timeout Handling
//!
//! Only [`Link::recv_reply`] and [`Link::request`] are bounded, by
//! [`LinkConfig::reply_timeout`]. [`Link::recv`] is the actuator's idle wait for
//! the next command and blocks until a frame arrives or the stream closes.
//!
//! Sends never wait for the peer: a frame is written and flushed, and that is
//! all the confirmation the caller gets.
//!
//! # Example Usage
//!
//! ```
//! use doorlock_link::{LinkConfig, duplex};
//! use doorlock_protocol::Message;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), doorlock_link::LinkError> {
//! let (mut ui, mut actuator) = duplex(LinkConfig::default());
//!
//! ui.send(Message::CheckExists).await?;
//! assert_eq!(actuator.recv().await?, Message::CheckExists);
//!
//! actuator.send(Message::Exists).await?;
//! assert_eq!(ui.recv_reply().await?, Message::Exists);
//! # Ok(())
//! # }
//! ```

use doorlock_core::Error;
use doorlock_protocol::{LinkCodec, Message, OpcodeClass};
use futures::{FutureExt, SinkExt, StreamExt};
use std::io::ErrorKind;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, DuplexStream};
use tokio_util::codec::Framed;
use tracing::{debug, trace, warn};

use crate::{LinkConfig, LinkError};

/// In-memory buffer size used by [`duplex`].
const DUPLEX_BUFFER_SIZE: usize = 64;

/// One end of the command link.
#[derive(Debug)]
pub struct Link<T> {
    /// Framed byte stream with LinkCodec
    framed: Framed<T, LinkCodec>,

    /// Bound on reply waits (None = wait forever)
    reply_timeout: Option<Duration>,
}

/// Create both ends of an in-memory link.
///
/// The first element is conventionally the UI node's end, the second the
/// actuator node's.
pub fn duplex(config: LinkConfig) -> (Link<DuplexStream>, Link<DuplexStream>) {
    let (a, b) = tokio::io::duplex(DUPLEX_BUFFER_SIZE);
    (Link::new(a, config), Link::new(b, config))
}

impl<T> Link<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap a byte stream.
    pub fn new(io: T, config: LinkConfig) -> Self {
        debug!(reply_timeout_ms = ?config.reply_timeout_ms, "Creating command link");

        Self {
            framed: Framed::new(io, LinkCodec::new()),
            reply_timeout: config.reply_timeout(),
        }
    }

    /// Configured reply bound.
    pub fn reply_timeout(&self) -> Option<Duration> {
        self.reply_timeout
    }

    /// Write one frame and flush it.
    ///
    /// # Errors
    ///
    /// Returns `LinkError::Disconnected` if the peer has closed the stream.
    pub async fn send(&mut self, message: Message) -> Result<(), LinkError> {
        trace!(opcode = %message.opcode(), "Sending frame");

        self.framed.send(message).await.map_err(map_stream_error)
    }

    /// Wait for the next frame, however long it takes.
    ///
    /// # Errors
    ///
    /// Returns `LinkError::Disconnected` once the stream has ended.
    pub async fn recv(&mut self) -> Result<Message, LinkError> {
        match self.framed.next().await {
            Some(Ok(message)) => {
                trace!(opcode = %message.opcode(), "Received frame");
                Ok(message)
            }
            Some(Err(e)) => Err(map_stream_error(e)),
            None => {
                debug!("Link stream closed by peer");
                Err(LinkError::Disconnected)
            }
        }
    }

    /// Wait for the next frame, bounded by the reply timeout.
    ///
    /// # Errors
    ///
    /// Returns `LinkError::Timeout` if nothing arrives in time, otherwise as
    /// [`Link::recv`].
    pub async fn recv_reply(&mut self) -> Result<Message, LinkError> {
        let Some(limit) = self.reply_timeout else {
            return self.recv().await;
        };

        match tokio::time::timeout(limit, self.recv()).await {
            Ok(result) => result,
            Err(_) => {
                let ms = limit.as_millis() as u64;
                warn!(timeout_ms = ms, "No reply from peer");
                Err(LinkError::Timeout(ms))
            }
        }
    }

    /// Send a request and wait for its status reply.
    ///
    /// # Errors
    ///
    /// Returns `LinkError::UnexpectedReply` if the frame that comes back is not
    /// a status opcode, plus anything [`Link::send`] or [`Link::recv_reply`]
    /// return.
    pub async fn request(&mut self, message: Message) -> Result<Message, LinkError> {
        let request = message.opcode();
        self.send(message).await?;

        let reply = self.recv_reply().await?;
        if reply.opcode().class() != OpcodeClass::Status {
            warn!(request = %request, reply = %reply.opcode(), "Peer answered with a non-status frame");
            return Err(LinkError::UnexpectedReply {
                request,
                reply: reply.opcode(),
            });
        }

        debug!(request = %request, reply = %reply.opcode(), "Request answered");
        Ok(reply)
    }

    /// Drop every frame and byte already buffered on the receive side.
    ///
    /// Used to get back in step after a timeout, when a late reply may still be
    /// in flight. Returns the number of whole frames discarded.
    ///
    /// # Errors
    ///
    /// Returns `LinkError::Disconnected` if the stream turns out to be closed.
    pub fn discard_pending(&mut self) -> Result<usize, LinkError> {
        let mut discarded = 0;

        loop {
            match self.framed.next().now_or_never() {
                Some(Some(Ok(message))) => {
                    debug!(opcode = %message.opcode(), "Discarding stale frame");
                    discarded += 1;
                }
                Some(Some(Err(e))) => {
                    let err = map_stream_error(e);
                    if !err.is_recoverable() {
                        return Err(err);
                    }
                }
                Some(None) => return Err(LinkError::Disconnected),
                None => break,
            }
        }

        // A partial frame is useless once its sender has given up on it
        self.framed.read_buffer_mut().clear();
        Ok(discarded)
    }
}

fn map_stream_error(error: Error) -> LinkError {
    match error {
        Error::Io(ref io)
            if matches!(
                io.kind(),
                ErrorKind::BrokenPipe | ErrorKind::ConnectionReset | ErrorKind::UnexpectedEof
            ) =>
        {
            LinkError::Disconnected
        }
        other => LinkError::Protocol(other),
    }
}
