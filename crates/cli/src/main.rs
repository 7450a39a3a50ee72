//! hashnav CLI: the main entry point.
//!
//! Commands:
//! - `init`: Write a default config and a skeleton site
//! - `resolve`: Show how a hash resolves
//! - `navigate`: Run one navigation against the site
//! - `watch`: Navigate on every hash read from stdin
//! - `check`: Verify the fallback and layout fragments load
//! - `config`: Print the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

mod commands;

#[derive(Parser)]
#[command(
    name = "hashnav",
    about = "hashnav — hash-based fragment router for static sites",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ./hashnav.toml)
    #[arg(short, long, global = true, env = "HASHNAV_CONFIG")]
    config: Option<PathBuf>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Write hashnav.toml and a skeleton site
    Init {
        /// Target directory
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Resolve a location hash to its route and fragments
    Resolve {
        /// Hash such as `#/about`; omit for the default route
        hash: Option<String>,
    },

    /// Run one navigation and print the result
    Navigate {
        /// Hash such as `#/about`; omit for the default route
        hash: Option<String>,

        /// Print the whole rendered document
        #[arg(long)]
        html: bool,
    },

    /// Read hashes from stdin and navigate on each line
    Watch {
        /// Print navigation events as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Verify that the 404 page, includes and sidebar fragments load
    Check,

    /// Print the effective configuration as TOML
    Config {
        /// Print the built-in defaults instead
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    match cli.log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Init { dir, force } => commands::init::run(&dir, force).await?,
        Commands::Resolve { hash } => commands::resolve::run(config, hash.as_deref()).await?,
        Commands::Navigate { hash, html } => {
            commands::navigate::run(config, hash.as_deref(), html).await?
        }
        Commands::Watch { json } => commands::watch::run(config, json).await?,
        Commands::Check => commands::check::run(config).await?,
        Commands::Config { default } => commands::config_cmd::run(config, default).await?,
    }

    Ok(())
}
