pub mod completions;
pub mod fingerprint;
pub mod install;
pub mod list;
pub mod locate;
pub mod uninstall;
pub mod verify;

use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::time::Duration;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_MANIFEST_ERROR: u8 = 2;
pub const EXIT_STORE_ERROR: u8 = 3;
pub const EXIT_INTEGRITY_FAILURE: u8 = 4;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style.tick_strings(&[
            ".    ", "..   ", "...  ", ".... ", ".....", " ....", "  ...", "   ..", "    .",
            "     ",
        ]));
    }
    pb.set_message(msg.to_owned());
    pb.enable_steady_tick(Duration::from_millis(50));
    pb
}

pub fn spin_ok(pb: &ProgressBar, msg: &str) {
    if let Ok(style) = ProgressStyle::with_template("{msg}") {
        pb.set_style(style);
    }
    pb.finish_with_message(format!("✓ {msg}"));
}

pub fn spin_fail(pb: &ProgressBar, msg: &str) {
    if let Ok(style) = ProgressStyle::with_template("{msg}") {
        pb.set_style(style);
    }
    pb.finish_with_message(format!("✗ {msg}"));
}

/// Parse `name=location` arguments.
pub fn parse_entries(args: &[String]) -> Result<BTreeMap<String, String>, String> {
    let mut entries = BTreeMap::new();
    for arg in args {
        let Some((name, location)) = arg.split_once('=') else {
            return Err(format!("expected <name>=<location>, got '{arg}'"));
        };
        if name.is_empty() || location.is_empty() {
            return Err(format!("expected <name>=<location>, got '{arg}'"));
        }
        entries.insert(name.to_owned(), location.to_owned());
    }
    Ok(entries)
}

pub fn print_imports(imports: &BTreeMap<String, String>) {
    use console::Style;
    let name_style = Style::new().green();
    let loc_style = Style::new().dim();
    for (name, location) in imports {
        println!("  {} {}", name_style.apply_to(name), loc_style.apply_to(location));
    }
}
