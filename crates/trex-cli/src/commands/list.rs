use super::{json_pretty, print_imports, EXIT_SUCCESS};
use trex_core::Engine;

pub fn run(engine: &Engine, json: bool) -> Result<u8, String> {
    let manifest = engine.list().map_err(|e| e.to_string())?;

    if json {
        println!("{}", json_pretty(&manifest)?);
    } else if manifest.is_empty() {
        println!("no packages installed");
    } else {
        println!("{} package(s):", manifest.len());
        print_imports(&manifest.imports);
    }
    Ok(EXIT_SUCCESS)
}
