//! Line-based codec for tokio.
//!
//! This module provides a codec that frames an unbounded, arbitrarily
//! chunked byte stream into complete protocol lines, and serializes
//! outgoing [`Message`]s with CRLF termination.
//!
//! No maximum line length is enforced; bounding the buffer is the obvious
//! hardening hook if this codec is ever exposed to untrusted bulk input.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{ProtocolError, Utf8LineError};
use crate::message::Message;

/// One framed item from the inbound byte stream.
#[derive(Debug, PartialEq, Eq)]
pub enum InboundLine {
    /// A complete line, decoded as UTF-8, terminator stripped.
    Line(String),
    /// A line whose bytes were not valid UTF-8.
    ///
    /// The bytes are consumed and decoding resumes with the next line.
    /// Surfaced as an item rather than a decode error because tokio-util
    /// treats decoder errors as fatal to the framed stream, and a bad
    /// line must not terminate the connection.
    Invalid(Utf8LineError),
}

/// Codec that reads newline-terminated lines and writes [`Message`]s.
///
/// Lines are split on `\n`; a preceding `\r` is stripped with the
/// terminator, so CRLF-framed and bare-LF clients both work. The final,
/// possibly incomplete segment after the last terminator is retained in
/// the buffer until more bytes arrive.
#[derive(Debug, Default)]
pub struct LineCodec {
    /// Index of the next byte to check for a newline.
    next_index: usize,
}

impl LineCodec {
    /// Create a new codec.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Decoder for LineCodec {
    type Item = InboundLine;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<InboundLine>, ProtocolError> {
        // Look for a newline starting from where we left off
        let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') else {
            // No complete line yet - remember where we stopped
            self.next_index = src.len();
            return Ok(None);
        };

        let mut line = src.split_to(self.next_index + offset + 1);
        self.next_index = 0;

        // Strip the terminator: the LF, and the CR when present
        line.truncate(line.len() - 1);
        if line.last() == Some(&b'\r') {
            line.truncate(line.len() - 1);
        }

        match String::from_utf8(line.to_vec()) {
            Ok(text) => Ok(Some(InboundLine::Line(text))),
            Err(e) => Ok(Some(InboundLine::Invalid(Utf8LineError {
                valid_up_to: e.utf8_error().valid_up_to(),
                details: e.utf8_error().to_string(),
                raw_line: e.into_bytes(),
            }))),
        }
    }
}

impl Encoder<Message> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, msg: Message, dst: &mut BytesMut) -> Result<(), ProtocolError> {
        let wire = msg.to_string();
        dst.reserve(wire.len() + 2);
        dst.put_slice(wire.as_bytes());
        dst.put_slice(b"\r\n");
        Ok(())
    }
}
