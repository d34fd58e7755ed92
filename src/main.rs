use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use listed::config::Config;
use listed::directory::DirectoryStore;
use listed::logging::init_logging;
use listed::rest::{self, ApiDoc, ApiState};
use listed::telemetry::{TelemetrySink, TracingSink};

#[derive(Parser)]
#[command(name = "listed")]
#[command(about = "Local business directory with a multi-step onboarding wizard")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST API server
    Serve {
        /// Port to bind (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the OpenAPI specification as JSON
    Openapi,

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => {
            let logging = init_logging(&config, cli.debug)?;
            if let Some(path) = &logging.log_file_path {
                eprintln!("logging to {}", path.display());
            }

            let directory = DirectoryStore::load(config.listings_path())?;
            let telemetry: Arc<dyn TelemetrySink> = Arc::new(TracingSink);
            let port = port.unwrap_or(config.server.port);
            let state = ApiState::new(config, directory, telemetry);

            rest::serve(state, port).await
        }
        Commands::Openapi => {
            println!("{}", ApiDoc::json()?);
            Ok(())
        }
        Commands::Config => {
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}
