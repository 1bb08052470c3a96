//! Presence monitoring for PC/SC readers

use std::collections::HashMap;
use std::ffi::CString;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use pcsc::{Context, ReaderState, Scope, State};
use tracing::{debug, warn};

use cardhost_core::{Error, Result};

use crate::error::subsystem_error;
use crate::event::{CardEvent, CardEventHandler, CardEventSender};

const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Watches readers for card insertion and removal.
///
/// The watch loop runs on its own thread with its own PC/SC context, so a
/// monitor can live alongside an active session without interfering with it.
#[allow(missing_debug_implementations)]
pub struct PcscMonitor {
    context: Context,
    running: Arc<AtomicBool>,
}

impl PcscMonitor {
    /// Create a monitor with a dedicated PC/SC context.
    pub fn new() -> Result<Self> {
        let context = Context::establish(Scope::User).map_err(subsystem_error)?;
        Ok(Self {
            context,
            running: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Block until the named reader holds a card or the timeout elapses.
    ///
    /// Returns whether a card is present when the wait ends.
    pub fn wait_for_card(&self, reader_name: &str, timeout: Duration) -> Result<bool> {
        let name = CString::new(reader_name)
            .map_err(|_| Error::ReaderNotFound(reader_name.to_string()))?;
        let mut reader_states = [ReaderState::new(name, State::UNAWARE)];
        match self.context.get_status_change(timeout, &mut reader_states) {
            Ok(()) | Err(pcsc::Error::Timeout) => {}
            Err(err) => return Err(subsystem_error(err)),
        }
        let state = reader_states[0].event_state();
        Ok(state.contains(State::PRESENT) && !state.contains(State::EMPTY))
    }

    /// Spawn a background thread delivering insertion/removal events to the
    /// handler until [`stop`](Self::stop) is called.
    pub fn watch<H>(&self, mut handler: H) -> Result<()>
    where
        H: CardEventHandler + 'static,
    {
        let context = self.context.clone();
        let running = Arc::clone(&self.running);
        running.store(true, Ordering::SeqCst);

        thread::spawn(move || {
            let mut seen: HashMap<String, bool> = HashMap::new();

            while running.load(Ordering::SeqCst) {
                let names = match context.list_readers_owned() {
                    Ok(names) => names,
                    Err(pcsc::Error::NoReadersAvailable) => Vec::new(),
                    Err(err) => {
                        warn!(error = %err, "reader enumeration failed, retrying");
                        thread::sleep(POLL_INTERVAL);
                        continue;
                    }
                };

                if names.is_empty() {
                    thread::sleep(POLL_INTERVAL);
                    continue;
                }

                let mut reader_states: Vec<ReaderState> = names
                    .into_iter()
                    .map(|name| ReaderState::new(name, State::UNAWARE))
                    .collect();
                for reader_state in &mut reader_states {
                    reader_state.sync_current_state();
                }

                match context.get_status_change(POLL_INTERVAL, &mut reader_states) {
                    Ok(()) | Err(pcsc::Error::Timeout) => {}
                    Err(err) => {
                        warn!(error = %err, "status wait failed, retrying");
                        thread::sleep(POLL_INTERVAL);
                        continue;
                    }
                }

                for reader_state in &reader_states {
                    let name = reader_state.name().to_string_lossy().into_owned();
                    let event_state = reader_state.event_state();
                    let present =
                        event_state.contains(State::PRESENT) && !event_state.contains(State::EMPTY);
                    let was_present = seen.insert(name.clone(), present).unwrap_or(false);

                    if present && !was_present {
                        debug!(reader = %name, atr = %hex::encode(reader_state.atr()), "card inserted");
                        handler.handle_event(CardEvent::Inserted {
                            reader: name,
                            atr: reader_state.atr().to_vec(),
                        });
                    } else if !present && was_present {
                        debug!(reader = %name, "card removed");
                        handler.handle_event(CardEvent::Removed { reader: name });
                    }
                }
            }
        });

        Ok(())
    }

    /// Deliver events over a channel instead of a callback.
    pub fn watch_channel(&self, sender: CardEventSender) -> Result<()> {
        self.watch(move |event| {
            let _ = sender.send(event);
        })
    }

    /// Signal the background thread to exit after its current poll.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}
