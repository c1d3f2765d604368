//! Scenario types
//!
//! A [`Scenario`] is the resolved, immutable description of one run.
//! Scenario files are YAML documents deserialized into [`ScenarioFile`] and
//! then resolved into scenarios.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::common::{Error, Result};

/// One program run with scripted input and the patterns its output must contain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    /// Human-readable label used in the report
    pub label: String,
    /// Program to launch, resolved by the OS (PATH lookup for bare names)
    pub program: String,
    /// Arguments passed to the program as-is
    pub args: Vec<String>,
    /// Everything written to the program's stdin, line terminators included
    pub input: String,
    /// Regular expressions checked against the captured output, in order
    pub patterns: Vec<String>,
    /// Exit code the program must finish with, if any
    pub expect_exit_code: Option<i32>,
}

impl Scenario {
    pub fn new(label: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            program: program.into(),
            args: Vec::new(),
            input: String::new(),
            patterns: Vec::new(),
            expect_exit_code: None,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn input(mut self, input: impl Into<String>) -> Self {
        self.input = input.into();
        self
    }

    /// Use `lines` as input, each terminated with a newline
    pub fn input_lines<I, S>(self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.input(join_lines(lines))
    }

    pub fn expect<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn exit_code(mut self, code: i32) -> Self {
        self.expect_exit_code = Some(code);
        self
    }
}

/// A scenario file loaded from YAML
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct ScenarioFile {
    /// Name of the file's scenario group
    pub name: Option<String>,
    /// Optional description of what the scenarios verify
    pub description: Option<String>,
    /// Program shared by all scenarios unless they override it
    #[serde(default)]
    pub target: TargetConfig,
    /// Scenarios, run in file order
    pub scenarios: Vec<ScenarioConfig>,
}

/// Program defaults for a scenario file
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Path or name of the program to run
    pub program: Option<String>,
    /// Arguments to pass to the program
    #[serde(default)]
    pub args: Vec<String>,
}

/// A single scenario entry in a scenario file
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Label printed with every result line
    pub label: String,
    /// Input fed to the program
    #[serde(default)]
    pub input: ScriptInput,
    /// Patterns that must appear in the output
    #[serde(default)]
    pub expect: Vec<String>,
    /// Overrides `target.program`
    pub program: Option<String>,
    /// Overrides `target.args`
    pub args: Option<Vec<String>>,
    /// Expected exit code (unchecked when absent)
    pub exit_code: Option<i32>,
}

/// Scripted input, either verbatim text or a list of lines
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ScriptInput {
    Text(String),
    Lines(Vec<String>),
}

impl Default for ScriptInput {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl ScriptInput {
    /// The exact bytes to send, as text
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Lines(lines) => join_lines(lines),
        }
    }
}

fn join_lines<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines.into_iter().fold(String::new(), |mut acc, line| {
        acc.push_str(line.as_ref());
        acc.push('\n');
        acc
    })
}

impl ScenarioFile {
    /// Load and parse a scenario file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content).map_err(|e| Error::scenario_parse(path, e))
    }

    pub fn parse(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Resolve every entry into a [`Scenario`]
    ///
    /// `base_dir` anchors relative program paths such as `./bin/tool`. Bare
    /// program names are left alone for the OS to find on PATH.
    pub fn into_scenarios(self, base_dir: &Path) -> Result<Vec<Scenario>> {
        let target = self.target;
        self.scenarios
            .into_iter()
            .map(|entry| -> Result<Scenario> {
                let program = entry
                    .program
                    .as_deref()
                    .or(target.program.as_deref())
                    .ok_or_else(|| {
                        Error::Config(format!(
                            "Scenario '{}' has no program and the file sets no target.program",
                            entry.label
                        ))
                    })?;

                Ok(Scenario {
                    program: resolve_program(program, base_dir),
                    args: entry.args.unwrap_or_else(|| target.args.clone()),
                    input: entry.input.to_text(),
                    patterns: entry.expect,
                    expect_exit_code: entry.exit_code,
                    label: entry.label,
                })
            })
            .collect()
    }
}

fn resolve_program(program: &str, base_dir: &Path) -> String {
    let path = PathBuf::from(program);
    if path.is_relative() && path.components().count() > 1 {
        base_dir.join(path).display().to_string()
    } else {
        program.to_string()
    }
}
