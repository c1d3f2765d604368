//! CLI command definitions
//!
//! Defines the clap commands for the pipecheck CLI.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run every scenario in one or more YAML scenario files
    Run {
        /// Paths to scenario files, run in the order given
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        options: RunOptions,
    },

    /// Run a single scenario described on the command line
    Check {
        /// Program to run
        program: String,

        /// Arguments to pass to the program
        #[arg(last = true)]
        args: Vec<String>,

        /// File whose content is fed to the program (default: read our own stdin)
        #[arg(long, short = 'i')]
        input_file: Option<PathBuf>,

        /// Pattern the output must contain. Can be given multiple times
        #[arg(long = "expect", short = 'e')]
        patterns: Vec<String>,

        /// Label printed with each result line
        #[arg(long, default_value = "check")]
        label: String,

        /// Expected exit code of the program
        #[arg(long)]
        exit_code: Option<i32>,

        #[command(flatten)]
        options: RunOptions,
    },
}

/// Options shared by every command that runs scenarios
#[derive(clap::Args, Debug, Clone, Default)]
pub struct RunOptions {
    /// Kill the program after this many seconds (overrides the config file)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Print the structured results as JSON instead of the text report
    #[arg(long)]
    pub json: bool,

    /// Exit successfully even if scenarios failed
    #[arg(long)]
    pub no_fail: bool,
}
