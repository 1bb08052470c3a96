//! Error types for card session management

/// Failures surfaced by the session layer.
///
/// The [`CardService`](crate::CardService) facade collapses every variant
/// back into the sentinel values of the original service contract (empty
/// list, `false`, or absent); the structured API keeps the causes
/// distinguishable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The platform smart-card subsystem could not be reached.
    #[error("smart-card subsystem unavailable: {0}")]
    SubsystemUnavailable(String),

    /// No reader with the given name is attached.
    #[error("reader not found: {0}")]
    ReaderNotFound(String),

    /// The reader exists but holds no card.
    #[error("no card present in reader: {0}")]
    NoCardPresent(String),

    /// Establishing a connection to the card failed.
    #[error("failed to connect to card in {reader}: {reason}")]
    ConnectionFailed {
        /// Reader the connection was attempted on
        reader: String,
        /// Backend-reported reason
        reason: String,
    },

    /// An operation requiring an active session was invoked without one.
    #[error("no active card session")]
    NotConnected,

    /// Command units must carry at least one byte.
    #[error("empty command unit")]
    EmptyCommand,

    /// The exchange with the card failed.
    ///
    /// The card may still have processed part of the command; this layer
    /// cannot detect partial execution.
    #[error("transmission failed: {0}")]
    TransmissionFailed(String),

    /// Releasing the card connection failed.
    #[error("failed to release card connection: {0}")]
    DisconnectFailed(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
