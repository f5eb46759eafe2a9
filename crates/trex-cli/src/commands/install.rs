use super::{json_pretty, parse_entries, print_imports, spin_fail, spin_ok, spinner, EXIT_SUCCESS};
use trex_core::Engine;

pub fn run(engine: &Engine, packages: &[String], json: bool) -> Result<u8, String> {
    let entries = parse_entries(packages)?;
    let pb = (!json).then(|| spinner("Installing..."));

    let result = match engine.install(&entries) {
        Ok(r) => r,
        Err(e) => {
            if let Some(pb) = &pb {
                spin_fail(pb, "install failed");
            }
            return Err(e.to_string());
        }
    };

    if json {
        let payload = serde_json::json!({
            "installed": entries.keys().collect::<Vec<_>>(),
            "fingerprints": result.fingerprints,
            "imports": result.manifest.imports,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        if let Some(pb) = &pb {
            spin_ok(pb, &format!("installed {} package(s)", entries.len()));
        }
        print_imports(&result.manifest.imports);
    }
    Ok(EXIT_SUCCESS)
}
