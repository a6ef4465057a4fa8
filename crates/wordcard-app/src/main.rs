use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};
use wordcard_config::LogFormat;

mod commands;
pub mod profile;
pub mod state;

#[derive(Parser)]
#[command(
    name = "wordcard",
    version,
    about = "Enrich vocabulary lists with translations, examples and images"
)]
struct Cli {
    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON config file, defaults to ./wordcard.json when present
    #[arg(long, global = true, env = "WORDCARD_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: commands::Commands,
}

fn init_tracing(verbose: u8, format: LogFormat) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = profile::load_config(cli.config.as_deref())?;
    init_tracing(cli.verbose, config.log_format);

    match &cli.command {
        commands::Commands::Enrich(args) => commands::enrich::run(args, config).await,
        commands::Commands::ImportReadlang(args) => commands::readlang::run(args, &config),
        commands::Commands::Export(args) => commands::export::run(args, config).await,
    }
}
