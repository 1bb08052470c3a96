//! Single-session lifecycle over a terminal subsystem

use std::fmt;

use bytes::Bytes;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::reader::ReaderInfo;
use crate::terminal::{CardChannel, Terminal, TerminalHost};

struct Session<C> {
    reader: String,
    channel: C,
}

/// Owns at most one card session at a time.
///
/// The manager moves between exactly two states, disconnected and
/// connected: a successful [`connect`](Self::connect) enters the connected
/// state, [`disconnect`](Self::disconnect) or a failed reconnect leaves it.
/// There is no terminal state; the manager is reusable indefinitely.
///
/// Mutating operations take `&mut self`, so single-caller access is enforced
/// by the borrow checker. Callers that need to share a manager across
/// threads must wrap it in a `Mutex`; there is no internal locking, and no
/// timeout on exchanges. A hung backend blocks the caller.
pub struct SessionManager<H: TerminalHost> {
    host: H,
    session: Option<Session<H::Channel>>,
}

impl<H: TerminalHost> SessionManager<H> {
    /// Create a disconnected manager over the given subsystem.
    pub const fn new(host: H) -> Self {
        Self {
            host,
            session: None,
        }
    }

    /// Enumerate attached readers together with their presence flags.
    pub fn list_readers(&self) -> Result<Vec<ReaderInfo>> {
        let terminals = self.host.terminals()?;
        let mut readers = Vec::with_capacity(terminals.len());
        for terminal in terminals {
            // Enumeration itself succeeded; a failed presence probe on one
            // reader downgrades to "no card" rather than failing the listing.
            let present = terminal.card_present().unwrap_or(false);
            readers.push(ReaderInfo::new(terminal.name().to_string(), present));
        }
        Ok(readers)
    }

    /// Whether the named reader currently holds a card.
    pub fn is_card_present(&self, reader_name: &str) -> Result<bool> {
        let terminal = self
            .host
            .terminal(reader_name)?
            .ok_or_else(|| Error::ReaderNotFound(reader_name.to_string()))?;
        terminal.card_present()
    }

    /// Establish a session with the card in the named reader.
    ///
    /// Any existing session is released first; a failure to release the old
    /// handle is logged and ignored. On any failure the manager ends up
    /// disconnected.
    pub fn connect(&mut self, reader_name: &str) -> Result<()> {
        self.release_current();
        let terminal = self
            .host
            .terminal(reader_name)?
            .ok_or_else(|| Error::ReaderNotFound(reader_name.to_string()))?;
        let channel = terminal.open()?;
        debug!(reader = reader_name, "card session established");
        self.session = Some(Session {
            reader: reader_name.to_string(),
            channel,
        });
        Ok(())
    }

    /// Exchange one command unit with the card and return the raw response.
    ///
    /// Requires an active session; the transport is never touched without
    /// one. The session survives a failed exchange. Note that the card may
    /// have partially processed a command even when the exchange reports
    /// failure.
    pub fn transmit(&mut self, command: &[u8]) -> Result<Bytes> {
        let session = self.session.as_mut().ok_or(Error::NotConnected)?;
        if command.is_empty() {
            return Err(Error::EmptyCommand);
        }
        session.channel.transmit(command)
    }

    /// Release the active session, leaving card state as-is.
    ///
    /// Session state is cleared even when the release fails, and calling
    /// this without a session is a no-op, so the operation is idempotent.
    pub fn disconnect(&mut self) -> Result<()> {
        match self.session.take() {
            Some(session) => {
                debug!(reader = %session.reader, "releasing card session");
                session.channel.close(false)
            }
            None => Ok(()),
        }
    }

    /// Whether a session is currently active.
    pub const fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// Name of the reader the active session is bound to.
    pub fn connected_reader(&self) -> Option<&str> {
        self.session.as_ref().map(|session| session.reader.as_str())
    }

    fn release_current(&mut self) {
        if let Some(session) = self.session.take() {
            if let Err(err) = session.channel.close(false) {
                warn!(reader = %session.reader, error = %err, "failed to release previous session");
            }
        }
    }
}

impl<H: TerminalHost> fmt::Debug for SessionManager<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("connected_reader", &self.connected_reader())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::SessionManager;
    use crate::error::Error;
    use crate::terminal::mock::MockHost;

    #[test]
    fn lists_readers_with_presence() {
        let host = MockHost::with_readers(&[("Reader A", true), ("Reader B", false)]);
        let manager = SessionManager::new(host);

        let readers = manager.list_readers().unwrap();
        assert_eq!(readers.len(), 2);
        assert_eq!(readers[0].name(), "Reader A");
        assert!(readers[0].card_present());
        assert_eq!(readers[1].name(), "Reader B");
        assert!(!readers[1].card_present());
    }

    #[test]
    fn presence_probe_failure_downgrades_to_no_card() {
        let mut host = MockHost::with_readers(&[("Reader A", true)]);
        host.readers[0].presence_fails = true;
        let manager = SessionManager::new(host);

        let readers = manager.list_readers().unwrap();
        assert!(!readers[0].card_present());
    }

    #[test]
    fn presence_query_distinguishes_readers() {
        let host = MockHost::with_readers(&[("Reader A", true), ("Reader B", false)]);
        let manager = SessionManager::new(host);

        assert!(manager.is_card_present("Reader A").unwrap());
        assert!(!manager.is_card_present("Reader B").unwrap());
        assert_eq!(
            manager.is_card_present("Reader C"),
            Err(Error::ReaderNotFound("Reader C".to_string()))
        );
    }

    #[test]
    fn connect_establishes_a_session() {
        let host = MockHost::with_readers(&[("Reader A", true)]);
        let mut manager = SessionManager::new(host);

        assert!(!manager.is_connected());
        manager.connect("Reader A").unwrap();
        assert!(manager.is_connected());
        assert_eq!(manager.connected_reader(), Some("Reader A"));
    }

    #[test]
    fn connect_to_unknown_reader_fails_cleanly() {
        let host = MockHost::with_readers(&[("Reader A", true)]);
        let mut manager = SessionManager::new(host);

        assert_eq!(
            manager.connect("Reader C"),
            Err(Error::ReaderNotFound("Reader C".to_string()))
        );
        assert!(!manager.is_connected());
    }

    #[test]
    fn connect_without_card_reports_no_card() {
        let host = MockHost::with_readers(&[("Reader B", false)]);
        let mut manager = SessionManager::new(host);

        assert_eq!(
            manager.connect("Reader B"),
            Err(Error::NoCardPresent("Reader B".to_string()))
        );
        assert!(!manager.is_connected());
    }

    #[test]
    fn reconnect_releases_the_previous_handle_first() {
        let host = MockHost::with_readers(&[("Reader A", true)]);
        let journal = host.journal();
        let mut manager = SessionManager::new(host);

        manager.connect("Reader A").unwrap();
        manager.connect("Reader A").unwrap();
        assert!(manager.is_connected());

        let journal = journal.lock().unwrap();
        assert_eq!(journal.opened, 2);
        // First channel released, without reset, before the second opened.
        assert_eq!(journal.closed, vec![(1, false)]);
    }

    #[test]
    fn failed_reconnect_leaves_the_manager_disconnected() {
        let mut host = MockHost::with_readers(&[("Reader A", true), ("Reader B", true)]);
        host.readers[1].connect_fails = true;
        let journal = host.journal();
        let mut manager = SessionManager::new(host);

        manager.connect("Reader A").unwrap();
        assert!(manager.connect("Reader B").is_err());
        assert!(!manager.is_connected());
        assert_eq!(manager.connected_reader(), None);
        // The old handle was still released.
        assert_eq!(journal.lock().unwrap().closed, vec![(1, false)]);
    }

    #[test]
    fn transmit_returns_the_response_unmodified() {
        let mut host = MockHost::with_readers(&[("Reader A", true)]);
        host.responses = vec![Bytes::from_static(&[0x6F, 0x10, 0x84, 0x90, 0x00])];
        let mut manager = SessionManager::new(host);

        manager.connect("Reader A").unwrap();
        let response = manager.transmit(&[0x00, 0xA4, 0x04, 0x00]).unwrap();
        assert_eq!(response.as_ref(), &[0x6F, 0x10, 0x84, 0x90, 0x00]);
    }

    #[test]
    fn transmit_without_session_never_touches_the_transport() {
        let host = MockHost::with_readers(&[("Reader A", true)]);
        let journal = host.journal();
        let mut manager = SessionManager::new(host);

        assert_eq!(
            manager.transmit(&[0x00, 0xA4, 0x04, 0x00]),
            Err(Error::NotConnected)
        );
        assert!(journal.lock().unwrap().transmitted.is_empty());
    }

    #[test]
    fn empty_commands_are_rejected_before_the_transport() {
        let host = MockHost::with_readers(&[("Reader A", true)]);
        let journal = host.journal();
        let mut manager = SessionManager::new(host);

        manager.connect("Reader A").unwrap();
        assert_eq!(manager.transmit(&[]), Err(Error::EmptyCommand));
        assert!(journal.lock().unwrap().transmitted.is_empty());
    }

    #[test]
    fn session_survives_a_failed_exchange() {
        let mut host = MockHost::with_readers(&[("Reader A", true)]);
        host.transmit_fails = true;
        let mut manager = SessionManager::new(host);

        manager.connect("Reader A").unwrap();
        assert!(manager.transmit(&[0x00, 0xA4, 0x04, 0x00]).is_err());
        assert!(manager.is_connected());
    }

    #[test]
    fn disconnect_is_idempotent() {
        let host = MockHost::with_readers(&[("Reader A", true)]);
        let journal = host.journal();
        let mut manager = SessionManager::new(host);

        manager.connect("Reader A").unwrap();
        manager.disconnect().unwrap();
        assert!(!manager.is_connected());
        manager.disconnect().unwrap();

        // Only the one release, without reset.
        assert_eq!(journal.lock().unwrap().closed, vec![(1, false)]);
    }

    #[test]
    fn disconnect_clears_state_even_when_release_fails() {
        let mut host = MockHost::with_readers(&[("Reader A", true)]);
        host.close_fails = true;
        let mut manager = SessionManager::new(host);

        manager.connect("Reader A").unwrap();
        assert!(manager.disconnect().is_err());
        assert!(!manager.is_connected());
        assert_eq!(
            manager.transmit(&[0x00, 0xA4, 0x04, 0x00]),
            Err(Error::NotConnected)
        );
    }

    #[test]
    fn enumeration_failure_propagates_in_the_structured_api() {
        let mut host = MockHost::with_readers(&[]);
        host.enumerate_fails = true;
        let manager = SessionManager::new(host);

        assert!(matches!(
            manager.list_readers(),
            Err(Error::SubsystemUnavailable(_))
        ));
    }
}
