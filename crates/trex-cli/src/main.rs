mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::{EXIT_FAILURE, EXIT_MANIFEST_ERROR, EXIT_STORE_ERROR};
use std::path::PathBuf;
use std::process::ExitCode;
use trex_core::{Engine, TrexConfig};

#[derive(Debug, Parser)]
#[command(
    name = "trex",
    version,
    about = "Package manager for import maps with integrity fingerprints"
)]
struct Cli {
    /// Path to a JSON config file (defaults to ~/.config/trex/config.json).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Import map to operate on (overrides config).
    #[arg(long, global = true)]
    manifest: Option<String>,

    /// Fingerprint store file (overrides config).
    #[arg(long, global = true)]
    store: Option<String>,

    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Add packages to the import map and record their fingerprints.
    Install {
        /// Packages as <name>=<location>.
        #[arg(required = true)]
        packages: Vec<String>,
    },
    /// Remove packages from the import map.
    Uninstall {
        /// Package names.
        #[arg(required = true)]
        packages: Vec<String>,
    },
    /// List installed packages.
    List,
    /// Check every installed package against its recorded fingerprint.
    Verify,
    /// Print the fingerprint of a location.
    Fingerprint {
        /// URL or path.
        location: String,
    },
    /// Print the location used to build a package's dependency graph.
    Locate {
        /// Package name.
        name: String,
        /// Entry point override for a standard module, as <module>=<location>.
        /// Merged over the `proxies` table from config.
        #[arg(long = "proxy", value_name = "MODULE=LOCATION")]
        proxies: Vec<String>,
    },
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

fn load_config(cli: &Cli) -> Result<TrexConfig, String> {
    let mut config = match &cli.config {
        Some(path) => TrexConfig::load(path),
        None => TrexConfig::load_default(),
    }
    .map_err(|e| e.to_string())?;

    if let Some(manifest) = &cli.manifest {
        config.manifest.clone_from(manifest);
    }
    if let Some(store) = &cli.store {
        config.store.clone_from(store);
    }
    Ok(config)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("TREX_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Completions { shell } = cli.command {
        return match commands::completions::run::<Cli>(shell) {
            Ok(code) => ExitCode::from(code),
            Err(_) => ExitCode::from(EXIT_FAILURE),
        };
    }

    let result = load_config(&cli).and_then(|config| {
        let engine = Engine::from_config(&config).map_err(|e| e.to_string())?;
        let json = cli.json;
        match &cli.command {
            Commands::Install { packages } => commands::install::run(&engine, packages, json),
            Commands::Uninstall { packages } => commands::uninstall::run(&engine, packages, json),
            Commands::List => commands::list::run(&engine, json),
            Commands::Verify => commands::verify::run(&engine, json),
            Commands::Fingerprint { location } => {
                commands::fingerprint::run(&engine, location, json)
            }
            Commands::Locate { name, proxies } => {
                commands::locate::run(&engine, &config, name, proxies, json)
            }
            Commands::Completions { shell } => commands::completions::run::<Cli>(*shell),
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            let code = if msg.starts_with("manifest error:") {
                EXIT_MANIFEST_ERROR
            } else if msg.starts_with("store error:") || msg.starts_with("store lock:") {
                EXIT_STORE_ERROR
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}
