//! IRC numeric response codes.
//!
//! The subset of the standard reply-code table this server emits. Values
//! are the RFC 2812 numerics and must stay bit-for-bit compatible with
//! existing clients.

#![allow(non_camel_case_types)]

use std::fmt;

/// IRC server response code.
///
/// Response codes are categorized as:
/// - 001-099: Connection/registration
/// - 400-599: Error replies
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Response {
    /// 001 - Welcome to the IRC network
    RPL_WELCOME = 1,
    /// 002 - Your host is running version
    RPL_YOURHOST = 2,
    /// 003 - Server creation date
    RPL_CREATED = 3,
    /// 004 - Server info (name, version, user modes, channel modes)
    RPL_MYINFO = 4,

    /// 421 - Unknown command
    ERR_UNKNOWNCOMMAND = 421,
    /// 461 - Not enough parameters
    ERR_NEEDMOREPARAMS = 461,
    /// 462 - You may not reregister
    ERR_ALREADYREGISTERED = 462,
}

impl Response {
    /// The numeric code.
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Whether this is an error reply (4xx/5xx).
    pub fn is_error(&self) -> bool {
        self.code() >= 400
    }
}

impl fmt::Display for Response {
    /// Numerics serialize as three digits, zero-padded.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.code())
    }
}
