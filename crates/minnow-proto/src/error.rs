//! Protocol-level error types.

use thiserror::Error;

/// Errors produced by the line codec.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// An underlying I/O error from the transport.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A line whose bytes were not valid UTF-8.
///
/// Carried by [`crate::line::InboundLine::Invalid`]. The offending bytes
/// have already been consumed from the read buffer, so framing of
/// subsequent lines is unaffected.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid utf-8 at byte {valid_up_to}: {details}")]
pub struct Utf8LineError {
    /// The undecodable line, terminator stripped.
    pub raw_line: Vec<u8>,
    /// Number of valid bytes before the first invalid sequence.
    pub valid_up_to: usize,
    /// Description from the UTF-8 decoder.
    pub details: String,
}
