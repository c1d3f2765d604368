//! Scenario runner
//!
//! Runs a scenario end to end: launch, feed input, capture, verify and
//! report. Each call owns its process and pipes; nothing is shared between
//! scenarios.

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::common::{Error, Result};

use super::process::ProcessRunner;
use super::report;
use super::scenario::{Scenario, ScenarioFile};
use super::verifier::{PatternOutcome, PatternSet};

/// How the program run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioStatus {
    /// The program exited on its own and its output was verified
    Completed,
    /// The program was killed after the configured timeout
    TimedOut { after_secs: u64 },
}

/// Structured result of one scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioReport {
    pub label: String,
    pub status: ScenarioStatus,
    /// Per-pattern outcomes, in scenario order. Empty when timed out.
    pub patterns: Vec<PatternOutcome>,
    pub exit_code: Option<i32>,
    pub expected_exit_code: Option<i32>,
}

impl ScenarioReport {
    /// Whether every check in the scenario held
    pub fn passed(&self) -> bool {
        self.status == ScenarioStatus::Completed
            && self.patterns.iter().all(|p| p.matched)
            && self.exit_code_ok()
    }

    fn exit_code_ok(&self) -> bool {
        self.expected_exit_code
            .map_or(true, |expected| self.exit_code == Some(expected))
    }

    pub fn failed_patterns(&self) -> impl Iterator<Item = &PatternOutcome> {
        self.patterns.iter().filter(|p| !p.matched)
    }
}

/// Run one scenario and write its diagnostic report to `out`
///
/// Launch failures and invalid patterns are returned as errors. Pattern
/// mismatches and timeouts are recorded in the returned report.
pub async fn run_scenario<W: Write>(
    runner: &ProcessRunner,
    scenario: &Scenario,
    out: &mut W,
) -> Result<ScenarioReport> {
    // Bad patterns should fail before a process is spent on them
    let patterns = PatternSet::compile(scenario.patterns.as_slice())?;

    tracing::info!(
        label = scenario.label.as_str(),
        program = scenario.program.as_str(),
        "running scenario"
    );

    let captured = match runner
        .run(&scenario.program, &scenario.args, &scenario.input)
        .await
    {
        Ok(captured) => captured,
        Err(Error::ProcessTimeout(after_secs)) => {
            report::write_timeout(out, &scenario.label, after_secs)?;
            return Ok(ScenarioReport {
                label: scenario.label.clone(),
                status: ScenarioStatus::TimedOut { after_secs },
                patterns: Vec::new(),
                exit_code: None,
                expected_exit_code: scenario.expect_exit_code,
            });
        }
        Err(e) => return Err(e),
    };

    let outcomes = patterns.verify(&captured.text);
    report::write_report(out, &scenario.label, &outcomes, &captured.text)?;

    let result = ScenarioReport {
        label: scenario.label.clone(),
        status: ScenarioStatus::Completed,
        patterns: outcomes,
        exit_code: captured.exit_code,
        expected_exit_code: scenario.expect_exit_code,
    };

    if let Some(expected) = scenario.expect_exit_code {
        if !result.exit_code_ok() {
            report::write_exit_code_mismatch(out, &scenario.label, expected, captured.exit_code)?;
        }
    } else if captured.exit_code != Some(0) {
        tracing::debug!(
            label = scenario.label.as_str(),
            exit_code = ?captured.exit_code,
            "program exited unsuccessfully (exit code not checked)"
        );
    }

    Ok(result)
}

/// Run scenarios one after another
///
/// Stops at the first harness error; failed patterns do not stop the run.
pub async fn run_all<W: Write>(
    runner: &ProcessRunner,
    scenarios: &[Scenario],
    out: &mut W,
) -> Result<Vec<ScenarioReport>> {
    let mut reports = Vec::with_capacity(scenarios.len());
    for scenario in scenarios {
        reports.push(run_scenario(runner, scenario, out).await?);
    }
    Ok(reports)
}

/// Load a scenario file and run every scenario in it
pub async fn run_file<W: Write>(
    runner: &ProcessRunner,
    path: &Path,
    out: &mut W,
) -> Result<Vec<ScenarioReport>> {
    let file = ScenarioFile::load(path)?;
    if let Some(name) = &file.name {
        tracing::info!(file = %path.display(), name = name.as_str(), "loaded scenario file");
    }

    let base_dir = path.parent().unwrap_or(Path::new("."));
    let scenarios = file.into_scenarios(base_dir)?;
    run_all(runner, &scenarios, out).await
}
