//! CLI command handling
//!
//! Builds scenarios from the command line or scenario files, runs them and
//! decides the process outcome.

use std::io::{self, Write};
use std::path::Path;

use colored::Colorize;
use tokio::io::AsyncReadExt;

use crate::commands::{Commands, RunOptions};
use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::harness::{self, ProcessRunner, Scenario, ScenarioReport};

/// Dispatch a CLI command
pub async fn dispatch(command: Commands) -> Result<()> {
    let config = Config::load()?;

    match command {
        Commands::Run { files, options } => {
            let runner = runner_for(&config, &options);
            let mut out = report_sink(&options);

            let mut reports = Vec::new();
            for file in &files {
                tracing::debug!(file = %file.display(), "running scenario file");
                reports.extend(harness::run_file(&runner, file, &mut out).await?);
            }

            finish(&config, &options, &reports)
        }

        Commands::Check {
            program,
            args,
            input_file,
            patterns,
            label,
            exit_code,
            options,
        } => {
            let runner = runner_for(&config, &options);
            let input = match input_file {
                Some(path) => read_input_file(&path)?,
                None => {
                    let mut input = String::new();
                    tokio::io::stdin().read_to_string(&mut input).await?;
                    input
                }
            };

            let mut scenario = Scenario::new(label, program)
                .args(args)
                .input(input)
                .expect(patterns);
            if let Some(code) = exit_code {
                scenario = scenario.exit_code(code);
            }

            let mut out = report_sink(&options);
            let report = harness::run_scenario(&runner, &scenario, &mut out).await?;

            finish(&config, &options, &[report])
        }
    }
}

fn runner_for(config: &Config, options: &RunOptions) -> ProcessRunner {
    let timeout = options
        .timeout
        .map(std::time::Duration::from_secs)
        .or_else(|| config.run.timeout());
    ProcessRunner::new().with_timeout(timeout)
}

/// Text report goes to stdout, unless JSON replaces it
fn report_sink(options: &RunOptions) -> Box<dyn Write> {
    if options.json {
        Box::new(io::sink())
    } else {
        Box::new(io::stdout())
    }
}

fn read_input_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.display().to_string(),
        error: e.to_string(),
    })
}

/// Print results and turn failures into an error unless `--no-fail`
fn finish(config: &Config, options: &RunOptions, reports: &[ScenarioReport]) -> Result<()> {
    let failed: Vec<&ScenarioReport> = reports.iter().filter(|r| !r.passed()).collect();

    if options.json {
        println!("{}", serde_json::to_string_pretty(reports)?);
    } else if config.report.summary {
        print_summary(reports.len(), &failed);
    }
    io::stdout().flush()?;

    if !failed.is_empty() && !options.no_fail {
        return Err(Error::ScenariosFailed {
            failed: failed.len(),
            total: reports.len(),
        });
    }
    Ok(())
}

fn print_summary(total: usize, failed: &[&ScenarioReport]) {
    if failed.is_empty() {
        println!(
            "\n{} {}",
            "✓".green().bold(),
            format!("{} scenarios passed", total).green().bold()
        );
        return;
    }

    println!(
        "\n{} {}",
        "✗".red().bold(),
        format!("{} of {} scenarios failed", failed.len(), total).red().bold()
    );
    for report in failed {
        println!("  {} {}", "✗".red(), report.label);
    }
}
