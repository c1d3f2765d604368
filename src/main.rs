//! pipecheck - black-box test harness for line-oriented interactive programs
//!
//! Runs programs with scripted stdin and checks their combined output
//! against regular expressions.

use clap::Parser;
use pipecheck::commands::Commands;
use pipecheck::{cli, common::logging};

#[derive(Parser)]
#[command(name = "pipecheck", about = "Scripted black-box tests for interactive programs")]
#[command(version, long_about = None)]
struct Cli {
    /// Log harness activity to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init_cli(cli.verbose);

    if let Err(e) = cli::dispatch(cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
