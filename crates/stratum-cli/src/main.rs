//! Stratum Command-Line Interface
//!
//! The main entry point for the `stratum` tool.
//!
//! ```text
//!   stratum canonicalize -i circuit.stim -o canonical.stim
//!   stratum flip -i circuit.stim
//!   stratum stats -i circuit.stim --format json
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{canonicalize, flip, stats, version};

/// Stratum - Z-basis layer canonicalization for stabilizer circuits
#[derive(Parser)]
#[command(name = "stratum")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite a circuit into canonical Z-basis layers
    Canonicalize {
        /// Input circuit file
        #[arg(short, long)]
        input: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Treat the input as a fragment and keep its trailing layers
        #[arg(long)]
        partial: bool,

        /// Pipeline configuration (YAML or JSON)
        #[arg(long)]
        config: Option<String>,
    },

    /// Exchange the X and Z bases throughout a circuit
    Flip {
        /// Input circuit file
        #[arg(short, long)]
        input: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show circuit statistics
    Stats {
        /// Input circuit file
        #[arg(short, long)]
        input: String,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Canonicalize {
            input,
            output,
            partial,
            config,
        } => canonicalize::execute(&input, output.as_deref(), partial, config.as_deref()),

        Commands::Flip { input, output } => flip::execute(&input, output.as_deref()),

        Commands::Stats { input, format } => stats::execute(&input, &format),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}
