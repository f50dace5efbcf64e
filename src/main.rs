use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;
use transit_catalogue::{
    AppConfig, Error, make_base, process_requests, read_document, write_response,
};
use transit_catalogue_core::persistence::SnapshotMode;

#[derive(Parser, Debug)]
#[command(
    name = "transit_catalogue",
    version,
    about = "Transit catalogue: build a base, then answer requests"
)]
struct Cli {
    /// TOML file with `log_filter` and `save_graph`
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read base requests from stdin and write the snapshot
    #[command(name = "make_base", alias = "make-base")]
    MakeBase {
        /// Store only the catalogue, the graph is rebuilt on load
        #[arg(long)]
        no_graph: bool,
    },
    /// Read stat requests from stdin and print answers to stdout
    #[command(name = "process_requests", alias = "process-requests")]
    ProcessRequests,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.config.as_deref().map(AppConfig::from_file).transpose() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Failed to read config: {e}");
            return ExitCode::from(2);
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(&cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            if e.is_configuration() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(command: &Command, config: &AppConfig) -> Result<(), Error> {
    let document = read_document(io::stdin().lock())?;
    match command {
        Command::MakeBase { no_graph } => {
            let mode = if *no_graph || !config.save_graph() {
                SnapshotMode::CatalogueOnly
            } else {
                SnapshotMode::WithGraph
            };
            make_base(&document, mode)?;
        }
        Command::ProcessRequests => {
            let response = process_requests(&document)?;
            write_response(io::stdout().lock(), &response)?;
        }
    }
    Ok(())
}
