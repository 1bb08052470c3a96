//! Terminal subsystem boundary
//!
//! The platform smart-card stack (reader enumeration, presence queries,
//! connection, raw transmission) is an external collaborator. These traits
//! wrap it so the session layer stays backend-agnostic; the PC/SC backend
//! lives in its own crate.

use std::fmt;

use bytes::Bytes;
use tracing::{debug, trace};

use crate::error::Result;

/// Entry point into a platform smart-card subsystem.
pub trait TerminalHost {
    /// Terminal handle produced by this host.
    type Terminal: Terminal<Channel = Self::Channel>;
    /// Card channel opened by this host's terminals.
    type Channel: CardChannel;

    /// Enumerate the attached terminals.
    ///
    /// Zero attached readers is an empty vector, not an error.
    fn terminals(&self) -> Result<Vec<Self::Terminal>>;

    /// Look up a terminal by name. `Ok(None)` when no such reader is attached.
    fn terminal(&self, name: &str) -> Result<Option<Self::Terminal>>;
}

/// A single card terminal (reader).
pub trait Terminal {
    /// Card channel opened by this terminal.
    type Channel: CardChannel;

    /// Reader name as reported by the subsystem.
    fn name(&self) -> &str;

    /// Whether a card is currently inserted.
    fn card_present(&self) -> Result<bool>;

    /// Connect to the inserted card.
    fn open(&self) -> Result<Self::Channel>;
}

/// An established connection to a card's basic logical channel.
///
/// `transmit` logs the exchange and delegates to `do_transmit`; backends
/// implement only the latter.
pub trait CardChannel: fmt::Debug {
    /// Send one command unit and return the raw response, trailer included.
    fn transmit(&mut self, command: &[u8]) -> Result<Bytes> {
        trace!(command = %hex::encode(command), "transmitting command unit");
        let result = self.do_transmit(command);
        match &result {
            Ok(response) => trace!(response = %hex::encode(response), "received response unit"),
            Err(err) => debug!(error = %err, "exchange failed"),
        }
        result
    }

    /// Backend implementation of the exchange.
    fn do_transmit(&mut self, command: &[u8]) -> Result<Bytes>;

    /// Release the connection.
    ///
    /// `reset` powers the card down on release; the session layer always
    /// passes `false` to leave card state as-is.
    fn close(self, reset: bool) -> Result<()>
    where
        Self: Sized;
}
