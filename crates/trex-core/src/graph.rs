//! Choosing the URL handed to the external dependency-graph builder.

use std::collections::BTreeMap;
use trex_schema::Manifest;

/// Standard library modules. Installed under a `<name>/` key whose value is
/// the module directory, so the graph entry point is `<dir>mod.ts`.
pub const STD_MODULES: &[&str] = &[
    "archive",
    "async",
    "bytes",
    "collections",
    "crypto",
    "datetime",
    "encoding",
    "flags",
    "fmt",
    "fs",
    "hash",
    "http",
    "io",
    "log",
    "mime",
    "node",
    "path",
    "permissions",
    "signal",
    "streams",
    "testing",
    "textproto",
    "uuid",
    "wasi",
    "ws",
];

pub fn is_std_module(name: &str) -> bool {
    STD_MODULES.contains(&name)
}

/// Alias rule for standard modules whose entry point is not `mod.ts`.
pub trait ModuleProxy {
    fn proxy(&self, module: &str) -> Option<String>;
}

/// No substitutions.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProxy;

impl ModuleProxy for NoProxy {
    fn proxy(&self, _module: &str) -> Option<String> {
        None
    }
}

/// Fixed module → entry point table, usually loaded from config.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProxyTable(BTreeMap<String, String>);

impl ProxyTable {
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        Self(entries)
    }

    /// Later entries win over existing ones.
    pub fn extend(&mut self, entries: impl IntoIterator<Item = (String, String)>) {
        self.0.extend(entries);
    }
}

impl ModuleProxy for ProxyTable {
    fn proxy(&self, module: &str) -> Option<String> {
        self.0.get(module).cloned()
    }
}

impl<F> ModuleProxy for F
where
    F: Fn(&str) -> Option<String>,
{
    fn proxy(&self, module: &str) -> Option<String> {
        self(module)
    }
}

/// Resolve the location to build a dependency graph from.
///
/// Returns `None` when `name` is not installed.
pub fn graph_location(manifest: &Manifest, name: &str, proxy: &dyn ModuleProxy) -> Option<String> {
    if is_std_module(name) {
        let dir = manifest.get(&format!("{name}/"))?;
        return Some(proxy.proxy(name).unwrap_or_else(|| format!("{dir}mod.ts")));
    }
    manifest.get(name).map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> Manifest {
        Manifest::from_entries([
            ("fs/", "https://deno.land/std@0.100.0/fs/"),
            ("node/", "https://deno.land/std@0.100.0/node/"),
            ("oak", "https://deno.land/x/oak/mod.ts"),
        ])
    }

    #[test]
    fn std_module_points_at_mod_ts() {
        assert_eq!(
            graph_location(&manifest(), "fs", &NoProxy).as_deref(),
            Some("https://deno.land/std@0.100.0/fs/mod.ts")
        );
    }

    #[test]
    fn proxy_overrides_std_entry_point() {
        let proxy = |m: &str| (m == "node").then(|| "https://proxy.test/node/module.ts".to_owned());
        assert_eq!(
            graph_location(&manifest(), "node", &proxy).as_deref(),
            Some("https://proxy.test/node/module.ts")
        );
        assert_eq!(
            graph_location(&manifest(), "fs", &proxy).as_deref(),
            Some("https://deno.land/std@0.100.0/fs/mod.ts")
        );
    }

    #[test]
    fn proxy_table_substitutes_listed_modules() {
        let mut table = ProxyTable::new(BTreeMap::from([(
            "node".to_owned(),
            "https://proxy.test/node/module.ts".to_owned(),
        )]));
        assert_eq!(
            graph_location(&manifest(), "node", &table).as_deref(),
            Some("https://proxy.test/node/module.ts")
        );

        table.extend([("node".to_owned(), "https://other.test/node.ts".to_owned())]);
        assert_eq!(
            graph_location(&manifest(), "node", &table).as_deref(),
            Some("https://other.test/node.ts")
        );
    }

    #[test]
    fn proxy_does_not_apply_to_third_party_names() {
        let table = ProxyTable::new(BTreeMap::from([(
            "oak".to_owned(),
            "https://proxy.test/oak.ts".to_owned(),
        )]));
        assert_eq!(
            graph_location(&manifest(), "oak", &table).as_deref(),
            Some("https://deno.land/x/oak/mod.ts")
        );
    }

    #[test]
    fn third_party_uses_location_verbatim() {
        assert_eq!(
            graph_location(&manifest(), "oak", &NoProxy).as_deref(),
            Some("https://deno.land/x/oak/mod.ts")
        );
    }

    #[test]
    fn missing_package_is_none() {
        assert!(graph_location(&manifest(), "http", &NoProxy).is_none());
        assert!(graph_location(&manifest(), "abc", &NoProxy).is_none());
    }
}
