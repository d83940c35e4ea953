//! Settings plumbing.
//!
//! The host provides a key/value store; values travel as loose JSON so any
//! backend (in-memory, browser extension storage, a file) can sit behind the
//! trait. Readers are total: an unset or mistyped key resolves to its
//! documented default rather than erroring.

use scalemark_engine::HighlightToggles;
use serde_json::Value;
use std::collections::HashMap;

/// Whether generic (blue) downscale highlights are shown. Default `true`.
pub const SHOW_DOWNSCALE: &str = "showDownscale";
/// Whether proportional (green) downscale highlights are shown. Default `true`.
pub const SHOW_PROPORTIONAL: &str = "showProportional";
/// Hostnames the runtime activates on. Default empty, so the runtime is off
/// everywhere until a domain is enabled.
pub const ENABLED_DOMAINS: &str = "enabledDomains";

/// Host-provided settings backend.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value);
}

/// In-memory store used by tests and simple hosts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }
}

fn bool_setting<S: SettingsStore + ?Sized>(store: &S, key: &str, default: bool) -> bool {
    match store.get(key) {
        Some(Value::Bool(value)) => value,
        _ => default,
    }
}

#[must_use]
pub fn show_downscale<S: SettingsStore + ?Sized>(store: &S) -> bool {
    bool_setting(store, SHOW_DOWNSCALE, true)
}

#[must_use]
pub fn show_proportional<S: SettingsStore + ?Sized>(store: &S) -> bool {
    bool_setting(store, SHOW_PROPORTIONAL, true)
}

/// The current display toggles, resolved against defaults.
#[must_use]
pub fn toggles<S: SettingsStore + ?Sized>(store: &S) -> HighlightToggles {
    HighlightToggles {
        show_downscale: show_downscale(store),
        show_proportional: show_proportional(store),
    }
}

/// The enabled-domain list. Anything but an array of strings (including a
/// partially mistyped array) degrades to the valid entries only.
#[must_use]
pub fn enabled_domains<S: SettingsStore + ?Sized>(store: &S) -> Vec<String> {
    match store.get(ENABLED_DOMAINS) {
        Some(Value::Array(entries)) => entries
            .into_iter()
            .filter_map(|entry| match entry {
                Value::String(host) => Some(host),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Exact-match membership test; an empty hostname never passes.
#[must_use]
pub fn is_enabled_for<S: SettingsStore + ?Sized>(store: &S, host: &str) -> bool {
    !host.is_empty() && enabled_domains(store).iter().any(|entry| entry == host)
}

/// Add `host` to the enabled list. Empty hostnames and duplicates are ignored.
pub fn enable_domain<S: SettingsStore + ?Sized>(store: &mut S, host: &str) {
    if host.is_empty() {
        return;
    }
    let mut domains = enabled_domains(store);
    if domains.iter().any(|entry| entry == host) {
        return;
    }
    domains.push(host.to_string());
    store.set(ENABLED_DOMAINS, domains_value(domains));
}

/// Remove `host` from the enabled list if present.
pub fn disable_domain<S: SettingsStore + ?Sized>(store: &mut S, host: &str) {
    if host.is_empty() {
        return;
    }
    let mut domains = enabled_domains(store);
    let before = domains.len();
    domains.retain(|entry| entry != host);
    if domains.len() != before {
        store.set(ENABLED_DOMAINS, domains_value(domains));
    }
}

/// Empty the enabled list.
pub fn clear_domains<S: SettingsStore + ?Sized>(store: &mut S) {
    store.set(ENABLED_DOMAINS, Value::Array(Vec::new()));
}

fn domains_value(domains: Vec<String>) -> Value {
    Value::Array(domains.into_iter().map(Value::String).collect())
}
