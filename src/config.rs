//! Command-line arguments and the runtime configuration derived from them.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::dto::TransactionForm;

pub const DATA_DIR_ENV: &str = "RUST_TALLY_DATA_DIR";
pub const DEFAULT_DATA_DIR: &str = ".tally";

/// Track income and expenses from the command line.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the transaction data.
    #[arg(long, global = true, env = DATA_DIR_ENV, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Log debug output to stderr. `RUST_LOG` takes precedence when set.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Record a new transaction. The date defaults to today.
    Add(TransactionArgs),
    /// Change fields of a transaction; omitted fields keep their value.
    Edit {
        id: u64,
        #[command(flatten)]
        fields: TransactionArgs,
    },
    /// Delete a transaction after confirmation.
    Delete {
        id: u64,
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// List transactions, newest first.
    List {
        /// Only show this category (`all` shows everything).
        #[arg(long)]
        category: Option<String>,
    },
    /// Show a single transaction.
    Show { id: u64 },
    /// Print total income, total expense and net balance.
    Summary,
    /// List the categories available for each transaction type.
    Categories {
        #[arg(long = "type")]
        kind: Option<String>,
    },
    /// Write transactions as CSV.
    Export {
        #[arg(long)]
        category: Option<String>,
        /// Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Add every row of a `type,category,amount,date,description` CSV file.
    Import { path: PathBuf },
}

/// Field values as typed on the command line, not yet validated.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionArgs {
    /// `income` or `expense`.
    #[arg(long = "type")]
    pub kind: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub amount: Option<String>,
    /// Formatted as YYYY-MM-DD.
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
}

impl From<TransactionArgs> for TransactionForm {
    fn from(args: TransactionArgs) -> Self {
        Self {
            kind: args.kind,
            category: args.category,
            amount: args.amount,
            date: args.date,
            description: args.description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    /// Default `tracing` filter directive when `RUST_LOG` is unset.
    pub log_filter: &'static str,
}

impl From<&Cli> for Config {
    fn from(cli: &Cli) -> Self {
        Self {
            data_dir: cli.data_dir.clone(),
            log_filter: if cli.verbose { "debug" } else { "warn" },
        }
    }
}
