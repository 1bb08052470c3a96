//! PC/SC terminal host

use std::ffi::CString;
use std::time::Duration;

use pcsc::{Context, ReaderState, Scope, State};
use tracing::debug;

use cardhost_core::{Result, Terminal, TerminalHost};

use crate::channel::PcscChannel;
use crate::config::PcscConfig;
use crate::error::{connect_error, subsystem_error};

/// Entry point into the PC/SC subsystem.
#[allow(missing_debug_implementations)]
pub struct PcscHost {
    context: Context,
    config: PcscConfig,
}

impl PcscHost {
    /// Establish a user-scope PC/SC context with the default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(PcscConfig::default())
    }

    /// Establish a context with a custom connection configuration.
    pub fn with_config(config: PcscConfig) -> Result<Self> {
        let context = Context::establish(Scope::User).map_err(subsystem_error)?;
        Ok(Self { context, config })
    }

    fn reader_names(&self) -> Result<Vec<CString>> {
        match self.context.list_readers_owned() {
            Ok(names) => Ok(names),
            // Zero attached readers is an empty listing, not a failure.
            Err(pcsc::Error::NoReadersAvailable) => Ok(Vec::new()),
            Err(err) => Err(subsystem_error(err)),
        }
    }
}

impl TerminalHost for PcscHost {
    type Terminal = PcscTerminal;
    type Channel = PcscChannel;

    fn terminals(&self) -> Result<Vec<PcscTerminal>> {
        Ok(self
            .reader_names()?
            .into_iter()
            .map(|name| PcscTerminal::new(self.context.clone(), name, self.config.clone()))
            .collect())
    }

    fn terminal(&self, name: &str) -> Result<Option<PcscTerminal>> {
        Ok(self
            .reader_names()?
            .into_iter()
            .find(|candidate| candidate.to_string_lossy() == name)
            .map(|found| PcscTerminal::new(self.context.clone(), found, self.config.clone())))
    }
}

/// A single PC/SC reader.
#[allow(missing_debug_implementations)]
pub struct PcscTerminal {
    context: Context,
    name: CString,
    display_name: String,
    config: PcscConfig,
}

impl PcscTerminal {
    fn new(context: Context, name: CString, config: PcscConfig) -> Self {
        let display_name = name.to_string_lossy().into_owned();
        Self {
            context,
            name,
            display_name,
            config,
        }
    }
}

impl Terminal for PcscTerminal {
    type Channel = PcscChannel;

    fn name(&self) -> &str {
        &self.display_name
    }

    fn card_present(&self) -> Result<bool> {
        let mut reader_states = [ReaderState::new(self.name.clone(), State::UNAWARE)];
        self.context
            .get_status_change(Duration::ZERO, &mut reader_states)
            .map_err(subsystem_error)?;
        let state = reader_states[0].event_state();
        Ok(state.contains(State::PRESENT) && !state.contains(State::EMPTY))
    }

    fn open(&self) -> Result<PcscChannel> {
        match self.context.connect(
            &self.name,
            self.config.share_mode.into(),
            self.config.protocols,
        ) {
            Ok(card) => {
                debug!(reader = %self.display_name, "connected to card");
                Ok(PcscChannel::new(card, self.display_name.clone()))
            }
            Err(err) => Err(connect_error(&self.display_name, err)),
        }
    }
}
