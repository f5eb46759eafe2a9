use super::{json_pretty, EXIT_INTEGRITY_FAILURE, EXIT_SUCCESS};
use console::Style;
use trex_core::Engine;

pub fn run(engine: &Engine, json: bool) -> Result<u8, String> {
    let report = engine.verify().map_err(|e| e.to_string())?;

    if json {
        println!("{}", json_pretty(&report)?);
    } else {
        if report.bootstrap {
            println!("no integrity hashes recorded yet; nothing to verify");
        }
        println!(
            "integrity: {}/{} packages passed",
            report.passed, report.checked
        );
        let warn = Style::new().yellow();
        for name in &report.unrecorded {
            println!("  {} {name}: no fingerprint recorded", warn.apply_to("SKIP"));
        }
        let fail = Style::new().red().bold();
        for f in &report.failed {
            println!("  {} {} ({}): {}", fail.apply_to("FAIL"), f.package, f.location, f.reason);
        }
    }

    if report.is_ok() {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_INTEGRITY_FAILURE)
    }
}
