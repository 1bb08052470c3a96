//! Single-session management for smart-card terminals
//!
//! This crate owns the lifecycle of at most one card session: enumerate
//! readers, poll card presence, connect, exchange opaque command/response
//! units, disconnect. The platform smart-card stack is consumed through the
//! [`terminal`] traits and never reimplemented; the PC/SC backend lives in
//! `cardhost-transport-pcsc`.
//!
//! Two API layers are exposed:
//!
//! - [`SessionManager`]: structured results with a distinguishable
//!   [`Error`] for every failure cause.
//! - [`CardService`]: the original sentinel contract (empty list, `false`,
//!   absent) for callers that only want best-effort behavior, with causes
//!   routed to `tracing`.
//!
//! Command and response units are opaque byte sequences here; the [`apdu`]
//! module carries the small caller-side helpers for building a SELECT and
//! reading status words.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::Bytes;

pub mod apdu;
pub mod terminal;

mod error;
mod reader;
mod service;
mod session;

pub use error::{Error, Result};
pub use reader::ReaderInfo;
pub use service::CardService;
pub use session::SessionManager;
pub use terminal::{CardChannel, Terminal, TerminalHost};

/// Prelude module containing commonly used traits and types
pub mod prelude {
    pub use crate::apdu::StatusWord;
    pub use crate::terminal::{CardChannel, Terminal, TerminalHost};
    pub use crate::{Bytes, CardService, Error, ReaderInfo, Result, SessionManager};
}
