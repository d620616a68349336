//! termtrack terminal client
//!
//! An interactive prompt for a termtrack server: accounts, projects,
//! tasks and a background poller for project update notifications.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod error;
mod help;
mod input;
mod output;
mod poller;
mod repl;
mod session;

use error::Result;

/// Terminal client for a termtrack server
#[derive(Parser)]
#[command(name = "termtrack")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding settings.toml and session.json
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Server host, overriding settings.toml
    #[arg(long)]
    host: Option<String>,

    /// Server port, overriding settings.toml
    #[arg(long)]
    port: Option<u16>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // diagnostics stay on stderr so they never tangle with the prompt
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("termtrack_client=warn")),
        )
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = config::load_or_init(&cli.data_dir)?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    output::banner();

    let api = api::ApiClient::new(&config.host, config.port);
    let mut repl = repl::Repl::new(api, cli.data_dir);
    repl.startup();
    repl.run()
}
