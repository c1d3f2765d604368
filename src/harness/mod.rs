//! Black-box harness
//!
//! Launches a program, feeds it scripted input, captures stdout and stderr
//! and checks the combined text against regular expressions.

mod process;
mod report;
mod runner;
mod scenario;
mod verifier;

pub use process::{CapturedOutput, ProcessRunner};
pub use report::{write_exit_code_mismatch, write_report, write_timeout};
pub use runner::{run_all, run_file, run_scenario, ScenarioReport, ScenarioStatus};
pub use scenario::{Scenario, ScenarioConfig, ScenarioFile, ScriptInput, TargetConfig};
pub use verifier::{verify, PatternOutcome, PatternSet};
