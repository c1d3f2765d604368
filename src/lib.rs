//! pipecheck - a black-box test harness for interactive line-oriented programs
//!
//! This library runs a program with scripted standard input and checks
//! what it writes to stdout and stderr against regular expressions.

pub mod cli;
pub mod commands;
pub mod common;
pub mod harness;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use harness::{
    run_scenario, verify, CapturedOutput, PatternOutcome, ProcessRunner, Scenario, ScenarioReport,
};
