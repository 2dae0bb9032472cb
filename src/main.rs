use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use fieldops::config::AppConfig;
use fieldops::database::connection::{get_store_location, init_store};

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    #[cfg(feature = "server")]
    Serve {
        #[clap(short, long)]
        port: Option<u16>,
        /// JSON store file, or `:memory:`
        #[clap(short, long)]
        store: Option<String>,
        #[clap(long)]
        cors_origin: Option<String>,
        #[clap(short, long, default_value = "fieldops.toml")]
        config: PathBuf,
    },
    Db {
        #[clap(subcommand)]
        command: DbCommands,
    },
}

#[derive(Subcommand, Debug)]
enum DbCommands {
    /// Create an empty store file if none exists
    Init {
        #[clap(short, long)]
        store: Option<String>,
        #[clap(short, long, default_value = "fieldops.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    match args.command {
        #[cfg(feature = "server")]
        Commands::Serve {
            port,
            store,
            cors_origin,
            config,
        } => {
            let mut config = AppConfig::load(&config)?;
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(store) = store {
                config.store.path = store;
            }
            if cors_origin.is_some() {
                config.server.cors_origin = cors_origin;
            }
            info!("Starting server on port {}", config.server.port);
            fieldops::server::start_server(config).await?;
        }
        Commands::Db { command } => match command {
            DbCommands::Init { store, config } => {
                let config = AppConfig::load(&config)?;
                let path = store.unwrap_or(config.store.path);
                info!("Initializing store: {}", path);
                init_store(&get_store_location(Some(&path))).await?;
            }
        },
    }

    Ok(())
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("tower_http=warn,{}", log_level)))
        .without_time()
        .init();
}
