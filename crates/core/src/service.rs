//! Sentinel-style service facade
//!
//! Mirrors the caller-visible contract of the desktop card service this
//! library grew out of: every failure collapses to an empty list, `false`,
//! or an absent value, with the cause routed to `tracing` instead of the
//! caller. Callers that need to tell failure causes apart use
//! [`SessionManager`] directly.

use std::fmt;

use bytes::Bytes;
use tracing::warn;

use crate::session::SessionManager;
use crate::terminal::TerminalHost;

/// Best-effort adapter over [`SessionManager`].
///
/// Shares the concurrency model of the manager: `&mut self` on mutating
/// operations, external locking if multiple callers are involved.
pub struct CardService<H: TerminalHost> {
    manager: SessionManager<H>,
}

impl<H: TerminalHost> CardService<H> {
    /// Create a disconnected service over the given subsystem.
    pub const fn new(host: H) -> Self {
        Self {
            manager: SessionManager::new(host),
        }
    }

    /// Wrap an existing manager, keeping whatever session it holds.
    pub const fn from_manager(manager: SessionManager<H>) -> Self {
        Self { manager }
    }

    /// Names of attached readers; empty on any failure.
    pub fn list_readers(&self) -> Vec<String> {
        match self.manager.list_readers() {
            Ok(readers) => readers.into_iter().map(|reader| reader.into_name()).collect(),
            Err(err) => {
                warn!(error = %err, "reader enumeration failed");
                Vec::new()
            }
        }
    }

    /// Whether the named reader holds a card; `false` when the reader is
    /// missing or the query fails.
    pub fn is_card_present(&self, reader_name: &str) -> bool {
        self.manager.is_card_present(reader_name).unwrap_or_else(|err| {
            warn!(reader = reader_name, error = %err, "presence query failed");
            false
        })
    }

    /// Establish a session with the card in the named reader, replacing any
    /// existing session; `true` on success.
    pub fn connect(&mut self, reader_name: &str) -> bool {
        match self.manager.connect(reader_name) {
            Ok(()) => true,
            Err(err) => {
                warn!(reader = reader_name, error = %err, "connect failed");
                false
            }
        }
    }

    /// Exchange one command unit with the card; `None` without a session or
    /// on failure.
    pub fn transmit(&mut self, command: &[u8]) -> Option<Bytes> {
        match self.manager.transmit(command) {
            Ok(response) => Some(response),
            Err(err) => {
                warn!(error = %err, "transmit failed");
                None
            }
        }
    }

    /// Release the active session; failures are logged and swallowed.
    pub fn disconnect(&mut self) {
        if let Err(err) = self.manager.disconnect() {
            warn!(error = %err, "disconnect failed");
        }
    }

    /// Whether a session is currently active.
    pub const fn is_connected(&self) -> bool {
        self.manager.is_connected()
    }

    /// Structured view, for callers that need error causes.
    pub fn manager(&mut self) -> &mut SessionManager<H> {
        &mut self.manager
    }
}

impl<H: TerminalHost> fmt::Debug for CardService<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardService")
            .field("manager", &self.manager)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::CardService;
    use crate::terminal::mock::MockHost;

    #[test]
    fn enumeration_failures_collapse_to_an_empty_list() {
        let mut host = MockHost::with_readers(&[]);
        host.enumerate_fails = true;
        let service = CardService::new(host);

        assert!(service.list_readers().is_empty());
    }

    #[test]
    fn zero_readers_is_an_empty_list_too() {
        let service = CardService::new(MockHost::with_readers(&[]));
        assert!(service.list_readers().is_empty());
    }

    #[test]
    fn presence_scenario_matches_the_service_contract() {
        let host = MockHost::with_readers(&[("Reader A", true), ("Reader B", false)]);
        let service = CardService::new(host);

        assert_eq!(
            service.list_readers(),
            vec!["Reader A".to_string(), "Reader B".to_string()]
        );
        assert!(service.is_card_present("Reader A"));
        assert!(!service.is_card_present("Reader B"));
        assert!(!service.is_card_present("Reader C"));
    }

    #[test]
    fn connect_transmit_disconnect_round_trip() {
        let mut host = MockHost::with_readers(&[("Reader A", true)]);
        host.responses = vec![Bytes::from_static(&[0x61, 0x10])];
        let mut service = CardService::new(host);

        assert!(service.connect("Reader A"));
        assert!(service.is_connected());

        let response = service.transmit(&[0x00, 0xA4, 0x04, 0x00]).unwrap();
        assert_eq!(response.as_ref(), &[0x61, 0x10]);

        service.disconnect();
        assert!(!service.is_connected());
        assert!(service.transmit(&[0x00, 0xA4, 0x04, 0x00]).is_none());
    }

    #[test]
    fn connect_to_missing_reader_returns_false() {
        let host = MockHost::with_readers(&[("Reader A", true)]);
        let mut service = CardService::new(host);

        assert!(!service.connect("NonexistentReader"));
        assert!(!service.is_connected());
    }

    #[test]
    fn transmit_without_session_is_absent() {
        let host = MockHost::with_readers(&[("Reader A", true)]);
        let journal = host.journal();
        let mut service = CardService::new(host);

        assert!(service.transmit(&[0x00, 0xA4, 0x04, 0x00]).is_none());
        assert!(journal.lock().unwrap().transmitted.is_empty());
    }

    #[test]
    fn disconnect_never_raises() {
        let mut host = MockHost::with_readers(&[("Reader A", true)]);
        host.close_fails = true;
        let mut service = CardService::new(host);

        assert!(service.connect("Reader A"));
        service.disconnect();
        service.disconnect();
        assert!(!service.is_connected());
    }
}
