//! Host-facing runtime: settings, the domain gate, and the command surface.
//!
//! The runtime wraps an engine session behind a per-domain opt-in. Nothing is
//! installed on a page unless its hostname appears in the `enabledDomains`
//! setting at boot; the command surface stays available either way so the
//! user can enable the domain for the next visit. Store mutations never
//! attach or detach retroactively, the gate is evaluated once per boot.

pub mod commands;
pub mod settings;

pub use commands::{Command, CommandOutcome, MenuSurface, register_menu};
pub use settings::{MemoryStore, SettingsStore};

use anyhow::Error;
use scalemark_dom::DomTree;
use scalemark_engine::{EngineConfig, PageEvent, RuntimeSession};
use serde_json::Value;
use std::time::Instant;
use url::Url;

/// Extract the hostname from a page URL. Unparseable input degrades to an
/// empty string, which keeps the domain gate closed.
#[must_use]
pub fn page_hostname(page_url: &str) -> String {
    match Url::parse(page_url) {
        Ok(parsed) => parsed.host_str().unwrap_or("").to_string(),
        Err(err) => {
            log::warn!("unparseable page url ({err}); domain gate stays closed");
            String::new()
        }
    }
}

/// One page's runtime: a settings store, the page hostname, and (once booted
/// on an enabled domain) the live engine session.
#[derive(Debug)]
pub struct Runtime<S: SettingsStore> {
    store: S,
    config: EngineConfig,
    hostname: String,
    session: Option<RuntimeSession>,
}

impl<S: SettingsStore> Runtime<S> {
    pub fn new(store: S, config: EngineConfig, page_url: &str) -> Self {
        Self {
            store,
            config,
            hostname: page_hostname(page_url),
            session: None,
        }
    }

    #[must_use]
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.session.is_some()
    }

    /// Attach the engine if the current domain is enabled. Idempotent: a
    /// second boot on an attached runtime does nothing.
    pub fn boot(&mut self, dom: &mut DomTree) -> Result<(), Error> {
        if self.session.is_some() {
            return Ok(());
        }
        if !settings::is_enabled_for(&self.store, &self.hostname) {
            log::debug!("{:?} not enabled; staying dormant", self.hostname);
            return Ok(());
        }
        let toggles = settings::toggles(&self.store);
        self.session = Some(RuntimeSession::attach(dom, toggles, &self.config)?);
        log::info!("attached on {}", self.hostname);
        Ok(())
    }

    /// Forward a host event to the session, if any. An unload drops the
    /// session after its teardown.
    pub fn handle_event(&mut self, dom: &mut DomTree, event: PageEvent) -> Result<(), Error> {
        let toggles = settings::toggles(&self.store);
        if let Some(session) = &mut self.session {
            session.handle_event(dom, toggles, event)?;
            if event == PageEvent::Unload {
                self.session = None;
            }
        }
        Ok(())
    }

    /// Drive the session's debounced mutation path. Returns whether a
    /// reconciliation pass ran.
    pub fn pump(&mut self, dom: &mut DomTree, now: Instant) -> Result<bool, Error> {
        let toggles = settings::toggles(&self.store);
        match &mut self.session {
            Some(session) => session.pump(dom, toggles, now),
            None => Ok(false),
        }
    }

    /// Execute a user command. Store changes apply immediately; the visible
    /// document is refreshed only while a session is attached, and the domain
    /// gate is never re-evaluated here.
    pub fn run_command(
        &mut self,
        dom: &mut DomTree,
        command: Command,
    ) -> Result<CommandOutcome, Error> {
        match command {
            Command::ToggleDownscale => {
                let next = !settings::show_downscale(&self.store);
                self.store.set(settings::SHOW_DOWNSCALE, Value::Bool(next));
                log::info!("Downscale highlight: {}", if next { "ON" } else { "OFF" });
                self.refresh_if_attached(dom)?;
            }
            Command::ToggleProportional => {
                let next = !settings::show_proportional(&self.store);
                self.store.set(settings::SHOW_PROPORTIONAL, Value::Bool(next));
                log::info!("Proportional highlight: {}", if next { "ON" } else { "OFF" });
                self.refresh_if_attached(dom)?;
            }
            Command::EnableCurrentDomain => {
                settings::enable_domain(&mut self.store, &self.hostname);
                log::info!("ENABLED for {}", self.hostname);
                self.refresh_if_attached(dom)?;
            }
            Command::DisableCurrentDomain => {
                settings::disable_domain(&mut self.store, &self.hostname);
                log::info!("DISABLED for {}", self.hostname);
                self.refresh_if_attached(dom)?;
            }
            Command::ListEnabledDomains => {
                return Ok(CommandOutcome::Domains(settings::enabled_domains(
                    &self.store,
                )));
            }
            Command::ClearEnabledDomains => {
                settings::clear_domains(&mut self.store);
                log::info!("enabled domains cleared");
                self.refresh_if_attached(dom)?;
            }
        }
        Ok(CommandOutcome::Done)
    }

    /// Tear the session down, if attached.
    pub fn detach(&mut self, dom: &mut DomTree) {
        if let Some(mut session) = self.session.take() {
            session.detach(dom);
        }
    }

    fn refresh_if_attached(&mut self, dom: &mut DomTree) -> Result<(), Error> {
        let toggles = settings::toggles(&self.store);
        if let Some(session) = &mut self.session {
            session.refresh(dom, toggles)?;
        }
        Ok(())
    }
}
