//! Diagnostic report
//!
//! Line-oriented text describing each pattern outcome. Failures carry the
//! full captured output so the mismatch can be debugged without rerunning.

use std::io::{self, Write};

use super::verifier::PatternOutcome;

/// Write one line per outcome, plus the captured text after each failure
pub fn write_report<W: Write>(
    out: &mut W,
    label: &str,
    outcomes: &[PatternOutcome],
    text: &str,
) -> io::Result<()> {
    for outcome in outcomes {
        if outcome.matched {
            writeln!(out, "{} /{}/: OK", label, outcome.pattern)?;
        } else {
            writeln!(out, "Error: Pattern '{}' not found in output:", outcome.pattern)?;
            writeln!(out, "---\n{}\n---", text)?;
        }
    }
    Ok(())
}

/// Report a run that was killed before it exited
pub fn write_timeout<W: Write>(out: &mut W, label: &str, after_secs: u64) -> io::Result<()> {
    writeln!(out, "{}: timed out after {}s", label, after_secs)
}

/// Report an exit code that differs from the expected one
pub fn write_exit_code_mismatch<W: Write>(
    out: &mut W,
    label: &str,
    expected: i32,
    actual: Option<i32>,
) -> io::Result<()> {
    match actual {
        Some(code) => writeln!(out, "{}: expected exit code {}, got {}", label, expected, code),
        None => writeln!(out, "{}: expected exit code {}, got signal", label, expected),
    }
}
