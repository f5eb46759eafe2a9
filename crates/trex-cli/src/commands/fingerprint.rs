use super::{json_pretty, EXIT_SUCCESS};
use trex_core::Engine;
use trex_schema::Location;

pub fn run(engine: &Engine, location: &str, json: bool) -> Result<u8, String> {
    let digest = engine.fingerprint(location).map_err(|e| e.to_string())?;

    if json {
        let kind = match Location::classify(location) {
            Location::Remote(_) => "remote",
            Location::Local(_) => "local",
            Location::File(_) => "file",
        };
        let payload = serde_json::json!({
            "location": location,
            "kind": kind,
            "sha256": digest,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!("{digest}  {location}");
    }
    Ok(EXIT_SUCCESS)
}
