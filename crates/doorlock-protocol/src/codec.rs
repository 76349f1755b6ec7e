//! Tokio codec for the inter-node command link.
//!
//! `LinkCodec` turns the raw serial byte stream into [`Message`] values and
//! back, for use with Tokio's `Framed` streams.
//!
//! # Framing
//!
//! The link has no framing bytes. The first byte of a frame is the opcode and
//! [`Opcode::payload_len`] says how many payload bytes follow it, so the decoder
//! waits until that many bytes are buffered before yielding a message.
//!
//! # Resynchronisation
//!
//! A byte that is not a known opcode cannot start a frame. The decoder logs it
//! and drops it, then tries again at the next byte. Noise on the line therefore
//! costs at most the frame it corrupts.
//!
//! # Usage with Tokio Framed
//!
//! ```rust,no_run
//! use doorlock_protocol::{LinkCodec, Message};
//! use futures::{SinkExt, StreamExt};
//! use tokio_util::codec::Framed;
//!
//! # async fn example() -> doorlock_core::Result<()> {
//! let (ui_side, _actuator_side) = tokio::io::duplex(64);
//! let mut framed = Framed::new(ui_side, LinkCodec::new());
//!
//! framed.send(Message::CheckExists).await?;
//! if let Some(Ok(reply)) = framed.next().await {
//!     println!("Received: {reply}");
//! }
//! # Ok(())
//! # }
//! ```

use bytes::{Buf, BytesMut};
use doorlock_core::{Error, Result};
use tokio_util::codec::{Decoder, Encoder};
use tracing::warn;

use crate::{Message, Opcode};

/// Tokio codec for link messages.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinkCodec {
    /// Bytes discarded because they did not start a known frame.
    skipped: u64,
}

impl LinkCodec {
    /// Create a new codec.
    ///
    /// # Example
    ///
    /// ```
    /// use doorlock_protocol::LinkCodec;
    ///
    /// let codec = LinkCodec::new();
    /// assert_eq!(codec.skipped_bytes(), 0);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of unrecognised bytes dropped so far.
    pub fn skipped_bytes(&self) -> u64 {
        self.skipped
    }
}

impl Decoder for LinkCodec {
    type Item = Message;
    type Error = Error;

    /// Decode one message from the byte stream.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Message))` - A complete frame was decoded
    /// - `Ok(None)` - Need more data to complete the frame
    ///
    /// # Example
    ///
    /// ```
    /// use bytes::BytesMut;
    /// use tokio_util::codec::Decoder;
    /// use doorlock_protocol::{LinkCodec, Message};
    ///
    /// let mut codec = LinkCodec::new();
    /// let mut buffer = BytesMut::from(&[0x22, 1, 2][..]);
    /// assert!(codec.decode(&mut buffer).unwrap().is_none());
    ///
    /// buffer.extend_from_slice(&[3, 4, 5]);
    /// let msg = codec.decode(&mut buffer).unwrap().unwrap();
    /// assert!(matches!(msg, Message::VerifyPassword { .. }));
    /// ```
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        loop {
            let Some(&first) = src.first() else {
                return Ok(None);
            };

            let opcode = match Opcode::from_u8(first) {
                Ok(opcode) => opcode,
                Err(_) => {
                    warn!(byte = first, "Dropping unknown link byte");
                    self.skipped += 1;
                    src.advance(1);
                    continue;
                }
            };

            let frame_len = opcode.frame_len();
            if src.len() < frame_len {
                src.reserve(frame_len - src.len());
                return Ok(None);
            }

            let frame = src.split_to(frame_len);
            return Message::from_parts(opcode, &frame[1..]).map(Some);
        }
    }

    /// A frame cut short by the end of the stream is dropped rather than
    /// reported, so the caller only ever sees end-of-stream.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        match self.decode(src)? {
            Some(message) => Ok(Some(message)),
            None => {
                if !src.is_empty() {
                    warn!(bytes = src.len(), "Dropping truncated frame at end of stream");
                    self.skipped += src.len() as u64;
                    src.clear();
                }
                Ok(None)
            }
        }
    }
}

impl Encoder<Message> for LinkCodec {
    type Error = Error;

    fn encode(&mut self, item: Message, dst: &mut BytesMut) -> Result<()> {
        item.write_to(dst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doorlock_core::Password;

    fn password(s: &str) -> Password {
        s.parse().unwrap()
    }

    #[test]
    fn test_decode_single_byte_frame() {
        let mut codec = LinkCodec::new();
        let mut buffer = BytesMut::from(&[0x30][..]);

        let msg = codec.decode(&mut buffer).unwrap();
        assert_eq!(msg, Some(Message::Exists));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_decode_partial_setup() {
        let mut codec = LinkCodec::new();
        let mut buffer = BytesMut::from(&[0x21, 1, 2, 3, 4, 5, 1, 2][..]);

        assert_eq!(codec.decode(&mut buffer).unwrap(), None);
        assert_eq!(buffer.len(), 8); // nothing consumed

        buffer.extend_from_slice(&[3, 4, 5]);
        let msg = codec.decode(&mut buffer).unwrap();
        assert_eq!(
            msg,
            Some(Message::SetupPassword {
                candidate: password("12345"),
                confirmation: password("12345"),
            })
        );
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_decode_multiple_frames_in_buffer() {
        let mut codec = LinkCodec::new();
        let mut buffer = BytesMut::from(&[0x10, 0x20, 0x25][..]);

        assert_eq!(codec.decode(&mut buffer).unwrap(), Some(Message::UiReady));
        assert_eq!(codec.decode(&mut buffer).unwrap(), Some(Message::CheckExists));
        assert_eq!(codec.decode(&mut buffer).unwrap(), Some(Message::ResetPassword));
        assert_eq!(codec.decode(&mut buffer).unwrap(), None);
    }

    #[test]
    fn test_decode_skips_unknown_bytes() {
        let mut codec = LinkCodec::new();
        let mut buffer = BytesMut::from(&[0x00, 0xFF, 0x32][..]);

        assert_eq!(codec.decode(&mut buffer).unwrap(), Some(Message::Match));
        assert_eq!(codec.skipped_bytes(), 2);
    }

    #[test]
    fn test_decode_only_garbage() {
        let mut codec = LinkCodec::new();
        let mut buffer = BytesMut::from(&[0xEE, 0xEE][..]);

        assert_eq!(codec.decode(&mut buffer).unwrap(), None);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_decode_eof_drops_truncated_frame() {
        let mut codec = LinkCodec::new();
        let mut buffer = BytesMut::from(&[0x33, 0x22, 1, 2][..]);

        assert_eq!(codec.decode_eof(&mut buffer).unwrap(), Some(Message::Mismatch));
        assert_eq!(codec.decode_eof(&mut buffer).unwrap(), None);
        assert!(buffer.is_empty());
        assert_eq!(codec.skipped_bytes(), 3);
    }

    #[test]
    fn test_encode_verify() {
        let mut codec = LinkCodec::new();
        let mut buffer = BytesMut::new();

        codec
            .encode(
                Message::VerifyPassword {
                    candidate: password("90210"),
                },
                &mut buffer,
            )
            .unwrap();

        assert_eq!(&buffer[..], &[0x22, 9, 0, 2, 1, 0]);
    }

    #[test]
    fn test_encode_appends() {
        let mut codec = LinkCodec::new();
        let mut buffer = BytesMut::new();

        codec.encode(Message::OpenDoor, &mut buffer).unwrap();
        codec.encode(Message::TriggerAlarm, &mut buffer).unwrap();

        assert_eq!(&buffer[..], &[0x23, 0x24]);
    }
}
