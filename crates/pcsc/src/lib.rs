//! PC/SC backend for the cardhost session manager
//!
//! Implements the terminal-subsystem traits from `cardhost-core` on top of
//! the platform PC/SC stack, and adds presence monitoring on a dedicated
//! context.
//!
//! # Examples
//!
//! ```no_run
//! use cardhost_core::CardService;
//! use cardhost_transport_pcsc::PcscHost;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut service = CardService::new(PcscHost::new()?);
//!
//!     let readers = service.list_readers();
//!     let Some(reader) = readers.first() else {
//!         println!("No readers attached");
//!         return Ok(());
//!     };
//!
//!     if service.connect(reader) {
//!         if let Some(response) = service.transmit(&[0x00, 0xA4, 0x04, 0x00, 0x00]) {
//!             println!("Response: {}", hex::encode_upper(&response));
//!         }
//!         service.disconnect();
//!     }
//!     Ok(())
//! }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

mod channel;
mod config;
mod error;
mod host;
mod monitor;

pub mod event;

pub use channel::PcscChannel;
pub use config::{PcscConfig, ShareMode};
pub use event::{CardEvent, CardEventHandler, CardEventReceiver, CardEventSender, card_event_channel};
pub use host::{PcscHost, PcscTerminal};
pub use monitor::PcscMonitor;

// Re-export some pcsc types for convenience
pub use pcsc::{Protocol, Protocols};
