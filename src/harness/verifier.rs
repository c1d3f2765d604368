//! Pattern verification
//!
//! Every pattern is compiled with multi-line anchors (`^`/`$` match at line
//! boundaries) and with `.` matching newlines. A pattern passes when it
//! matches anywhere in the captured text.

use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::common::{Error, Result};

/// Outcome of searching for one pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternOutcome {
    pub pattern: String,
    pub matched: bool,
}

/// Patterns compiled ahead of the run, in their original order
#[derive(Debug, Clone)]
pub struct PatternSet {
    compiled: Vec<(String, Regex)>,
}

impl PatternSet {
    /// Compile all patterns, failing on the first invalid one
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let compiled = patterns
            .iter()
            .map(|p| {
                let p = p.as_ref();
                build(p).map(|re| (p.to_string(), re))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { compiled })
    }

    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }

    /// Search `text` for each pattern in order
    ///
    /// Every pattern is checked, whether or not an earlier one matched.
    pub fn verify(&self, text: &str) -> Vec<PatternOutcome> {
        self.compiled
            .iter()
            .map(|(pattern, re)| {
                let matched = re.is_match(text);
                tracing::trace!(pattern = pattern.as_str(), matched, "checked pattern");
                PatternOutcome {
                    pattern: pattern.clone(),
                    matched,
                }
            })
            .collect()
    }
}

/// Compile `patterns` and check each one against `text`
pub fn verify<S: AsRef<str>>(text: &str, patterns: &[S]) -> Result<Vec<PatternOutcome>> {
    Ok(PatternSet::compile(patterns)?.verify(text))
}

fn build(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .multi_line(true)
        .dot_matches_new_line(true)
        .build()
        .map_err(|e| Error::invalid_pattern(pattern, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EDITOR_OUTPUT: &str = "three\nfour\n";

    fn matched(text: &str, pattern: &str) -> bool {
        verify(text, &[pattern]).unwrap()[0].matched
    }

    #[test]
    fn test_substring_anywhere_matches() {
        assert!(matched("hello world\n", "lo wo"));
        assert!(matched(EDITOR_OUTPUT, r"three\nfour"));
    }

    #[test]
    fn test_absent_pattern() {
        assert!(!matched(EDITOR_OUTPUT, "five"));
    }

    #[test]
    fn test_dot_matches_newline() {
        assert!(matched("start\nmiddle\nend", "start.*end"));
        assert!(matched("a\nb", "a.b"));
    }

    #[test]
    fn test_anchors_match_per_line() {
        let text = "first line\nsecond line\nthird";
        assert!(matched(text, "^second line$"));
        assert!(matched(text, "^third$"));
        assert!(!matched(text, "^line"));
    }

    #[test]
    fn test_both_modifiers_together() {
        let text = "header\n     3\tthree\n     4\tfour\nfooter\n";
        assert!(matched(text, r"^\s+3\tthree$.*^\s+4\tfour$"));
        assert!(matched(text, r"3\tthree\n\s+4\tfour"));
    }

    #[test]
    fn test_order_preserved_and_no_short_circuit() {
        let patterns = ["missing", "three", "also missing", "four"];
        let outcomes = verify(EDITOR_OUTPUT, &patterns).unwrap();
        let summary: Vec<_> = outcomes
            .iter()
            .map(|o| (o.pattern.as_str(), o.matched))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("missing", false),
                ("three", true),
                ("also missing", false),
                ("four", true)
            ]
        );
    }

    #[test]
    fn test_overlapping_patterns_both_match() {
        let outcomes = verify(EDITOR_OUTPUT, &["three\nfour", "four", "e\nf"]).unwrap();
        assert!(outcomes.iter().all(|o| o.matched));
    }

    #[test]
    fn test_invalid_pattern_is_error() {
        let err = verify("text", &["ok", "(unclosed"]).unwrap_err();
        match err {
            Error::InvalidPattern { pattern, .. } => assert_eq!(pattern, "(unclosed"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_pattern_list() {
        let set = PatternSet::compile::<&str>(&[]).unwrap();
        assert!(set.is_empty());
        assert!(set.verify("anything").is_empty());
    }

    #[test]
    fn test_verify_is_repeatable() {
        let set = PatternSet::compile(&["three", "nine"]).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.verify(EDITOR_OUTPUT), set.verify(EDITOR_OUTPUT));
    }
}
