//! Presence events emitted by the monitor

use crossbeam_channel::{Receiver, Sender, unbounded};

/// Card insertion/removal event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardEvent {
    /// Card was inserted into a reader
    Inserted {
        /// Reader name
        reader: String,
        /// ATR of the inserted card
        atr: Vec<u8>,
    },
    /// Card was removed from a reader
    Removed {
        /// Reader name
        reader: String,
    },
}

/// Handler invoked by the monitor for each event.
pub trait CardEventHandler: Send {
    /// Process one event.
    fn handle_event(&mut self, event: CardEvent);
}

impl<F> CardEventHandler for F
where
    F: FnMut(CardEvent) + Send,
{
    fn handle_event(&mut self, event: CardEvent) {
        self(event)
    }
}

/// Sender for card events
pub type CardEventSender = Sender<CardEvent>;
/// Receiver for card events
pub type CardEventReceiver = Receiver<CardEvent>;

/// Create an unbounded channel for card events
pub fn card_event_channel() -> (CardEventSender, CardEventReceiver) {
    unbounded()
}
