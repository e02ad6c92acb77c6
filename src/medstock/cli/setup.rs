use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "medstock", bin_name = "medstock", version)]
#[command(about = "Medication stock tracker with CSV import/export", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the inventory and config (default: $MEDSTOCK_HOME or the OS data dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List products, optionally filtered
    #[command(alias = "ls")]
    List {
        /// Category to show: all, child, adult or both
        #[arg(short, long, default_value = "all")]
        category: String,

        /// Case-insensitive part of the product name
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Add a new product
    #[command(alias = "n")]
    Add {
        /// Product name
        name: String,

        /// child, adult or both (default: both)
        #[arg(short, long, default_value = "")]
        category: String,

        /// Form or dosage class, e.g. Syrup (default: Other)
        #[arg(short = 't', long = "type", default_value = "")]
        kind: String,

        /// Units in stock
        #[arg(short, long, default_value = "0")]
        quantity: String,

        /// Expiry date as YYYY-MM-DD
        #[arg(short, long, default_value = "")]
        expiry: String,
    },

    /// Change fields of a product
    #[command(alias = "e")]
    Edit {
        /// Product id, as shown by `list`
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(short = 't', long = "type")]
        kind: Option<String>,

        #[arg(short, long)]
        quantity: Option<String>,

        /// New expiry date (YYYY-MM-DD); an empty value clears it
        #[arg(short, long)]
        expiry: Option<String>,
    },

    /// Add or take units from stock (e.g. 1, -1)
    #[command(alias = "b")]
    Bump {
        /// Product id, as shown by `list`
        id: String,

        /// Units to add; negative to take
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },

    /// Remove a product
    #[command(alias = "rm")]
    Remove {
        /// Product id, as shown by `list`
        id: String,
    },

    /// Export the inventory to a dated CSV file
    Export {
        /// Output directory (default: the `export-dir` setting)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace the inventory with the contents of a CSV file
    Import {
        /// CSV file produced by `export`
        file: PathBuf,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (export-dir, date-format)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

/// Initialize logging to stderr. `RUST_LOG` wins over `--verbose`.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "medstock=debug" } else { "medstock=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
