//! Process runner
//!
//! Spawns the program under test with all three standard streams piped,
//! feeds it the scripted input and collects everything it writes.
//!
//! Writing stdin and draining stdout/stderr happen concurrently. A program
//! that prints a lot before it reads its input would otherwise fill the
//! output pipe while we are still blocked writing, and neither side would
//! make progress.

use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, Command};

use crate::common::{Error, Result};

/// Everything a program wrote before it exited
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapturedOutput {
    /// stdout content followed by stderr content
    pub text: String,
    /// Exit code, or `None` if the process was ended by a signal
    pub exit_code: Option<i32>,
}

impl CapturedOutput {
    /// Aggregate raw stream contents into one text value
    ///
    /// stdout always comes first, regardless of the order in which the
    /// program actually wrote to the two streams.
    pub fn from_streams(stdout: &[u8], stderr: &[u8], exit_code: Option<i32>) -> Self {
        let mut text = String::with_capacity(stdout.len() + stderr.len());
        text.push_str(&String::from_utf8_lossy(stdout));
        text.push_str(&String::from_utf8_lossy(stderr));
        Self { text, exit_code }
    }
}

/// Runs one program per call and captures its output
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
}

impl ProcessRunner {
    /// A runner that waits for the program for as long as it takes
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill the program and fail with [`Error::ProcessTimeout`] if it has not
    /// exited after `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Run `program` with `args`, write `input` to its stdin and collect its
    /// output once it exits
    ///
    /// No shell is involved: `args` are passed to the program as they are.
    pub async fn run(&self, program: &str, args: &[String], input: &str) -> Result<CapturedOutput> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::launch(program, e))?;

        tracing::debug!(
            program,
            ?args,
            pid = ?child.id(),
            input_bytes = input.len(),
            "spawned program"
        );

        let exchanged = match self.timeout {
            None => exchange(&mut child, input.as_bytes()).await,
            Some(limit) => {
                let bounded =
                    tokio::time::timeout(limit, exchange(&mut child, input.as_bytes())).await;
                match bounded {
                    Ok(result) => result,
                    Err(_) => {
                        tracing::warn!(program, ?limit, "program did not exit in time, killing it");
                        if let Err(e) = child.kill().await {
                            tracing::debug!("kill after timeout failed: {}", e);
                        }
                        return Err(Error::ProcessTimeout(limit.as_secs()));
                    }
                }
            }
        };

        let (stdout, stderr, status) = exchanged?;
        tracing::debug!(
            program,
            stdout_bytes = stdout.len(),
            stderr_bytes = stderr.len(),
            %status,
            "program exited"
        );

        Ok(CapturedOutput::from_streams(&stdout, &stderr, exit_code(status)))
    }
}

/// Feed `input` and drain both output streams, then reap the child
async fn exchange(child: &mut Child, input: &[u8]) -> Result<(Vec<u8>, Vec<u8>, ExitStatus)> {
    let stdin = child.stdin.take().ok_or(Error::PipeUnavailable("stdin"))?;
    let mut stdout = child.stdout.take().ok_or(Error::PipeUnavailable("stdout"))?;
    let mut stderr = child.stderr.take().ok_or(Error::PipeUnavailable("stderr"))?;

    let (_, out, err) = tokio::try_join!(
        write_input(stdin, input),
        drain(&mut stdout),
        drain(&mut stderr),
    )?;

    let status = child.wait().await?;
    Ok((out, err, status))
}

/// Write all of `input`, then close stdin so the child sees end-of-stream
async fn write_input(mut stdin: ChildStdin, input: &[u8]) -> io::Result<()> {
    let written = match stdin.write_all(input).await {
        Ok(()) => stdin.shutdown().await,
        Err(e) => Err(e),
    };

    match written {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            // Child closed its stdin (or exited) before reading everything
            tracing::debug!("program stopped reading input early");
            Ok(())
        }
        other => other,
    }
}

async fn drain<R: AsyncRead + Unpin>(stream: &mut R) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await?;
    Ok(buf)
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = status.signal() {
        tracing::debug!(signal, "program was killed by a signal");
    }
    status.code()
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> Option<i32> {
    status.code()
}
