//! Card connection over PC/SC

use std::fmt;

use bytes::Bytes;
use pcsc::{Card, Disposition, MAX_BUFFER_SIZE};

use cardhost_core::{CardChannel, Result};

use crate::error::{disconnect_error, transmit_error};

/// An open connection to a card, bound to its basic logical channel.
pub struct PcscChannel {
    card: Card,
    reader: String,
}

impl PcscChannel {
    pub(crate) fn new(card: Card, reader: String) -> Self {
        Self { card, reader }
    }

    /// Name of the reader this connection was opened on.
    pub fn reader(&self) -> &str {
        &self.reader
    }
}

impl fmt::Debug for PcscChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PcscChannel")
            .field("reader", &self.reader)
            .finish_non_exhaustive()
    }
}

impl CardChannel for PcscChannel {
    fn do_transmit(&mut self, command: &[u8]) -> Result<Bytes> {
        let mut buffer = [0u8; MAX_BUFFER_SIZE];
        let response = self
            .card
            .transmit(command, &mut buffer)
            .map_err(transmit_error)?;
        Ok(Bytes::copy_from_slice(response))
    }

    fn close(self, reset: bool) -> Result<()> {
        let disposition = if reset {
            Disposition::ResetCard
        } else {
            Disposition::LeaveCard
        };
        self.card
            .disconnect(disposition)
            .map_err(|(_, err)| disconnect_error(err))
    }
}
