//! Caller-side helpers for command/response units
//!
//! The session layer treats units as opaque bytes. These helpers let callers
//! build the one command every card application starts with and read the
//! trailer off a raw response; nothing here is consulted by the session
//! manager itself.

use std::fmt;

/// Status word (SW1-SW2) trailing an APDU response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusWord {
    /// First status byte (SW1)
    pub sw1: u8,
    /// Second status byte (SW2)
    pub sw2: u8,
}

impl StatusWord {
    /// Create a status word from its two bytes.
    pub const fn new(sw1: u8, sw2: u8) -> Self {
        Self { sw1, sw2 }
    }

    /// Create from a `u16` value (SW1 in the high byte).
    pub const fn from_u16(status: u16) -> Self {
        Self {
            sw1: (status >> 8) as u8,
            sw2: status as u8,
        }
    }

    /// Extract the trailer from a raw response.
    ///
    /// `None` when the response is shorter than two bytes.
    pub const fn from_response(response: &[u8]) -> Option<Self> {
        if response.len() < 2 {
            return None;
        }
        Some(Self::new(
            response[response.len() - 2],
            response[response.len() - 1],
        ))
    }

    /// Convert to a `u16` value (SW1 in the high byte).
    pub const fn to_u16(self) -> u16 {
        ((self.sw1 as u16) << 8) | (self.sw2 as u16)
    }

    /// Success (90 00).
    pub const fn is_success(self) -> bool {
        self.sw1 == 0x90 && self.sw2 == 0x00
    }

    /// More data available (61 XX).
    pub const fn is_more_data(self) -> bool {
        self.sw1 == 0x61
    }

    /// Remaining byte count when SW1 = 61.
    pub const fn remaining_bytes(self) -> Option<u8> {
        if self.sw1 == 0x61 { Some(self.sw2) } else { None }
    }
}

impl From<(u8, u8)> for StatusWord {
    fn from((sw1, sw2): (u8, u8)) -> Self {
        Self::new(sw1, sw2)
    }
}

impl From<u16> for StatusWord {
    fn from(status: u16) -> Self {
        Self::from_u16(status)
    }
}

impl From<StatusWord> for u16 {
    fn from(status: StatusWord) -> Self {
        status.to_u16()
    }
}

impl fmt::Display for StatusWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X} {:02X}", self.sw1, self.sw2)
    }
}

/// Payload of a raw response with the trailer stripped.
///
/// Empty when the response is shorter than two bytes.
pub fn response_data(response: &[u8]) -> &[u8] {
    if response.len() < 2 {
        &[]
    } else {
        &response[..response.len() - 2]
    }
}

/// Build a SELECT-by-AID command unit.
pub fn select_command(aid: &[u8]) -> Vec<u8> {
    let mut command = Vec::with_capacity(aid.len() + 5);
    command.extend_from_slice(&[0x00, 0xA4, 0x04, 0x00, aid.len() as u8]);
    command.extend_from_slice(aid);
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_word_u16_round_trip() {
        let sw = StatusWord::from_u16(0x9000);
        assert_eq!(sw.sw1, 0x90);
        assert_eq!(sw.sw2, 0x00);
        assert_eq!(sw.to_u16(), 0x9000);
    }

    #[test]
    fn trailer_extraction() {
        let response = [0x01, 0x02, 0x90, 0x00];
        assert_eq!(
            StatusWord::from_response(&response),
            Some(StatusWord::new(0x90, 0x00))
        );
        assert_eq!(StatusWord::from_response(&[0x90]), None);
        assert_eq!(StatusWord::from_response(&[]), None);
    }

    #[test]
    fn predicates() {
        assert!(StatusWord::new(0x90, 0x00).is_success());
        assert!(!StatusWord::new(0x6A, 0x82).is_success());
        assert!(StatusWord::new(0x61, 0x15).is_more_data());
        assert_eq!(StatusWord::new(0x61, 0x15).remaining_bytes(), Some(0x15));
        assert_eq!(StatusWord::new(0x90, 0x00).remaining_bytes(), None);
    }

    #[test]
    fn payload_stripping() {
        assert_eq!(response_data(&[0x01, 0x02, 0x90, 0x00]), &[0x01, 0x02]);
        assert_eq!(response_data(&[0x90, 0x00]), &[] as &[u8]);
        assert_eq!(response_data(&[0x90]), &[] as &[u8]);
    }

    #[test]
    fn select_command_layout() {
        let aid = [0x06, 0x03, 0x30, 0x26, 0x01, 0x17, 0x00];
        let command = select_command(&aid);
        assert_eq!(&command[..5], &[0x00, 0xA4, 0x04, 0x00, 0x07]);
        assert_eq!(&command[5..], &aid);

        assert_eq!(select_command(&[]), vec![0x00, 0xA4, 0x04, 0x00, 0x00]);
    }
}
