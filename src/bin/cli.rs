//! wb-banners CLI
//!
//! Runs the banner pipeline once and prints the resolved banners as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use wb_banners::{
    error::Result,
    models::{BannerSnapshot, Config},
    pipeline,
};

/// wb-banners - Wildberries banner resolver
#[derive(Parser, Debug)]
#[command(
    name = "wb-banners",
    version,
    about = "Resolve Wildberries home page banners to product links"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch banners and resolve their products
    Run {
        /// Named delivery address (see `addresses`)
        #[arg(short, long)]
        address: Option<String>,

        /// HTTP proxy host (requires --proxy-port)
        #[arg(long, requires = "proxy_port")]
        proxy_host: Option<String>,

        /// HTTP proxy port (requires --proxy-host)
        #[arg(long, requires = "proxy_host")]
        proxy_port: Option<u16>,

        /// Write the JSON snapshot here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List configured addresses
    Addresses,

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load_or_default(&cli.config);
    init_logging(cli.verbose, &config.logging.level);

    match cli.command {
        Command::Run {
            address,
            proxy_host,
            proxy_port,
            output,
        } => {
            if proxy_host.is_some() {
                config.http.proxy_host = proxy_host;
                config.http.proxy_port = proxy_port;
            }
            config.validate()?;

            log::info!(
                "Fetching banners for {}",
                address.as_deref().unwrap_or("default location")
            );
            let results = pipeline::run_pipeline(Arc::new(config), address.clone()).await?;

            let snapshot = BannerSnapshot::new(results, address);
            let json = serde_json::to_string_pretty(&snapshot)?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, json).await?;
                    log::info!(
                        "Saved {} banners to {}",
                        snapshot.count,
                        path.display()
                    );
                }
                None => println!("{json}"),
            }
        }

        Command::Addresses => {
            let default = config.location.default;
            println!(
                "default\t{}\t{}",
                default.longitude, default.latitude
            );
            for (name, coordinates) in &config.location.addresses {
                println!(
                    "{}\t{}\t{}",
                    name, coordinates.longitude, coordinates.latitude
                );
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }
    }

    Ok(())
}
