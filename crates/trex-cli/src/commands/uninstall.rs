use super::{json_pretty, print_imports, EXIT_SUCCESS};
use trex_core::Engine;

pub fn run(engine: &Engine, packages: &[String], json: bool) -> Result<u8, String> {
    let result = engine.uninstall(packages).map_err(|e| e.to_string())?;

    if json {
        let payload = serde_json::json!({
            "removed": packages,
            "imports": result.manifest.imports,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!("removed {}", packages.join(", "));
        print_imports(&result.manifest.imports);
    }
    Ok(EXIT_SUCCESS)
}
