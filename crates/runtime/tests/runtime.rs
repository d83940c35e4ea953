//! Runtime behavior: the domain gate, command flows, and session lifecycle.

use anyhow::Error;
use scalemark_dom::{DomTree, ImageMetrics, NodeId};
use scalemark_engine::overlay::OVERLAY_CLASS;
use scalemark_engine::{EngineConfig, PageEvent};
use scalemark_runtime::settings::{self, SettingsStore};
use scalemark_runtime::{Command, CommandOutcome, MemoryStore, Runtime, page_hostname};
use serde_json::json;

const PAGE: &str = "https://example.com/gallery";

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn build_page(dom: &mut DomTree) -> Result<NodeId, Error> {
    let html = dom.create_element("html");
    let body = dom.create_element("body");
    dom.append_child(dom.root(), html)?;
    dom.append_child(html, body)?;
    Ok(body)
}

fn add_halved_image(dom: &mut DomTree, container: NodeId) -> Result<NodeId, Error> {
    let image = dom.create_element("img");
    dom.set_metrics(image, ImageMetrics::new(800, 600, 400, 300));
    dom.append_child(container, image)?;
    Ok(image)
}

fn overlay_count(dom: &DomTree) -> usize {
    dom.elements()
        .into_iter()
        .filter(|&node| dom.has_class(node, OVERLAY_CLASS))
        .count()
}

fn enabled_runtime() -> Runtime<MemoryStore> {
    let mut store = MemoryStore::default();
    settings::enable_domain(&mut store, "example.com");
    Runtime::new(store, EngineConfig::default(), PAGE)
}

#[test]
fn hostname_extraction_degrades_to_empty() {
    assert_eq!(page_hostname(PAGE), "example.com");
    assert_eq!(page_hostname("not a url"), "");
    assert_eq!(page_hostname("file:///tmp/page.html"), "");
}

#[test]
fn the_gate_stays_closed_until_enabled_and_rebooted() -> Result<(), Error> {
    init_logging();
    let mut dom = DomTree::new();
    let body = build_page(&mut dom)?;
    add_halved_image(&mut dom, body)?;

    let mut runtime = Runtime::new(MemoryStore::default(), EngineConfig::default(), PAGE);
    runtime.boot(&mut dom)?;
    assert!(!runtime.is_attached());
    assert_eq!(overlay_count(&dom), 0, "a dormant runtime leaves no trace");

    // Commands work while dormant but never attach by themselves.
    runtime.run_command(&mut dom, Command::ToggleDownscale)?;
    runtime.run_command(&mut dom, Command::ToggleDownscale)?;
    runtime.run_command(&mut dom, Command::EnableCurrentDomain)?;
    assert!(!runtime.is_attached());
    assert_eq!(overlay_count(&dom), 0);

    // The gate is only consulted at boot.
    runtime.boot(&mut dom)?;
    assert!(runtime.is_attached());
    assert_eq!(overlay_count(&dom), 1);
    Ok(())
}

#[test]
fn an_unparseable_url_keeps_the_gate_closed() -> Result<(), Error> {
    let mut dom = DomTree::new();
    let body = build_page(&mut dom)?;
    add_halved_image(&mut dom, body)?;

    // Even a store poisoned with an empty-hostname entry must not open the
    // gate for a page whose hostname could not be determined.
    let mut store = MemoryStore::default();
    store.set(settings::ENABLED_DOMAINS, json!([""]));
    let mut runtime = Runtime::new(store, EngineConfig::default(), "not a url");
    runtime.boot(&mut dom)?;
    assert!(!runtime.is_attached());
    assert_eq!(overlay_count(&dom), 0);
    Ok(())
}

#[test]
fn boot_is_idempotent() -> Result<(), Error> {
    let mut dom = DomTree::new();
    let body = build_page(&mut dom)?;
    add_halved_image(&mut dom, body)?;

    let mut runtime = enabled_runtime();
    runtime.boot(&mut dom)?;
    runtime.boot(&mut dom)?;
    assert!(runtime.is_attached());
    assert_eq!(overlay_count(&dom), 1);
    Ok(())
}

#[test]
fn toggle_commands_refresh_the_attached_session() -> Result<(), Error> {
    let mut dom = DomTree::new();
    let body = build_page(&mut dom)?;
    add_halved_image(&mut dom, body)?;

    let mut runtime = enabled_runtime();
    runtime.boot(&mut dom)?;
    assert_eq!(overlay_count(&dom), 1, "a proportional downscale is shown");

    runtime.run_command(&mut dom, Command::ToggleProportional)?;
    assert_eq!(overlay_count(&dom), 0, "toggled off, the overlay disappears");

    runtime.run_command(&mut dom, Command::ToggleProportional)?;
    assert_eq!(overlay_count(&dom), 1, "and toggled back on it returns");
    Ok(())
}

#[test]
fn domain_list_commands_report_and_clear() -> Result<(), Error> {
    let mut dom = DomTree::new();
    build_page(&mut dom)?;

    let mut runtime = Runtime::new(MemoryStore::default(), EngineConfig::default(), PAGE);
    assert_eq!(
        runtime.run_command(&mut dom, Command::ListEnabledDomains)?,
        CommandOutcome::Domains(Vec::new())
    );

    runtime.run_command(&mut dom, Command::EnableCurrentDomain)?;
    assert_eq!(
        runtime.run_command(&mut dom, Command::ListEnabledDomains)?,
        CommandOutcome::Domains(vec!["example.com".to_string()])
    );

    runtime.run_command(&mut dom, Command::DisableCurrentDomain)?;
    assert_eq!(
        runtime.run_command(&mut dom, Command::ListEnabledDomains)?,
        CommandOutcome::Domains(Vec::new())
    );

    runtime.run_command(&mut dom, Command::EnableCurrentDomain)?;
    runtime.run_command(&mut dom, Command::ClearEnabledDomains)?;
    assert_eq!(
        runtime.run_command(&mut dom, Command::ListEnabledDomains)?,
        CommandOutcome::Domains(Vec::new())
    );
    Ok(())
}

#[test]
fn disabling_the_domain_does_not_detach_a_live_session() -> Result<(), Error> {
    let mut dom = DomTree::new();
    let body = build_page(&mut dom)?;
    add_halved_image(&mut dom, body)?;

    let mut runtime = enabled_runtime();
    runtime.boot(&mut dom)?;
    runtime.run_command(&mut dom, Command::DisableCurrentDomain)?;
    assert!(
        runtime.is_attached(),
        "store mutation applies on the next boot, not retroactively"
    );
    assert_eq!(overlay_count(&dom), 1);
    Ok(())
}

#[test]
fn unload_tears_down_and_a_later_boot_reattaches() -> Result<(), Error> {
    init_logging();
    let mut dom = DomTree::new();
    let body = build_page(&mut dom)?;
    add_halved_image(&mut dom, body)?;

    let mut runtime = enabled_runtime();
    runtime.boot(&mut dom)?;
    assert_eq!(overlay_count(&dom), 1);

    runtime.handle_event(&mut dom, PageEvent::Unload)?;
    assert!(!runtime.is_attached());
    assert_eq!(overlay_count(&dom), 0, "unload unwinds every annotation");

    runtime.boot(&mut dom)?;
    assert!(runtime.is_attached());
    assert_eq!(overlay_count(&dom), 1);
    Ok(())
}
