use super::{json_pretty, parse_entries, EXIT_SUCCESS};
use trex_core::{Engine, ProxyTable, TrexConfig};

/// Print the location the dependency-graph tool should be pointed at.
///
/// Standard modules use the config `proxies` table, overridden by `--proxy`.
pub fn run(
    engine: &Engine,
    config: &TrexConfig,
    name: &str,
    overrides: &[String],
    json: bool,
) -> Result<u8, String> {
    let mut proxies = ProxyTable::new(config.proxies.clone());
    proxies.extend(parse_entries(overrides)?);

    let location = engine
        .graph_location(name, &proxies)
        .map_err(|e| e.to_string())?;

    if json {
        let payload = serde_json::json!({ "package": name, "location": location });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!("{location}");
    }
    Ok(EXIT_SUCCESS)
}
