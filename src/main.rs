use std::error::Error;
use std::io;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rusty_tally::config::{Cli, Config};
use rusty_tally::{run, FileStorage, TransactionStore};

fn main() {
    let cli = Cli::parse();
    let config = Config::from(&cli);
    setup_logging(&config);

    if let Err(err) = run_app(cli, config) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

fn run_app(cli: Cli, config: Config) -> Result<(), Box<dyn Error>> {
    tracing::debug!("using data directory {}", config.data_dir.display());
    let mut store = TransactionStore::open(FileStorage::new(config.data_dir));
    run(cli.command, &mut store, io::stdin().lock(), io::stdout().lock())
}

/// Logs go to stderr so command output on stdout stays machine readable.
fn setup_logging(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
