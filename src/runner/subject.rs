//! Subject process invocation.
//!
//! The subject reads a test case on stdin and writes answer lines on stdout.
//! Its stdout and stderr are captured in anonymous temporary files that are
//! removed when the call returns.

use std::fs::File;
use std::io::{self, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::error::{OracleError, Result};

/// Poll interval while waiting for a subject with a timeout.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How to start the program under test.
#[derive(Debug, Clone)]
pub struct SubjectCommand {
    /// Path to the executable.
    pub program: PathBuf,
    /// Extra command-line arguments.
    pub args: Vec<String>,
    /// Kill the subject if it runs longer than this.
    pub timeout: Option<Duration>,
}

/// Captured result of one subject run.
#[derive(Debug)]
pub struct SubjectOutput {
    /// Exit status.
    pub status: ExitStatus,
    /// Everything written to stdout.
    pub stdout: String,
    /// Everything written to stderr.
    pub stderr: String,
}

impl SubjectCommand {
    /// Create a command with no arguments and no timeout.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    /// Set the command-line arguments.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Run the subject once with `input` on stdin.
    pub fn run(&self, input: &str) -> Result<SubjectOutput> {
        let mut stdout_file = capture_file()?;
        let mut stderr_file = capture_file()?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::from(clone_handle(&stdout_file)?))
            .stderr(Stdio::from(clone_handle(&stderr_file)?))
            .spawn()
            .map_err(|e| OracleError::SubjectSpawn {
                program: self.program.display().to_string(),
                source: e,
            })?;

        // Feed stdin on its own thread so a subject that never reads it
        // still falls under the timeout. A feeder left blocked by a killed
        // subject's descendants is detached rather than joined.
        let stdin = child.stdin.take();
        let owned = input.to_owned();
        let feeder = thread::spawn(move || feed_stdin(stdin, &owned));
        let status = self.wait(&mut child)?;
        match feeder.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                return Err(OracleError::subject_io(format!("failed to write stdin: {}", e)));
            }
            Err(_) => return Err(OracleError::subject_io("stdin writer panicked")),
        }

        if !status.success() {
            warn!("subject exited with {}", status);
        }

        Ok(SubjectOutput {
            status,
            stdout: read_capture(&mut stdout_file)?,
            stderr: read_capture(&mut stderr_file)?,
        })
    }

    /// Wait for the child, honouring the timeout. The child is gone when
    /// this returns, whatever the outcome.
    fn wait(&self, child: &mut Child) -> Result<ExitStatus> {
        match self.timeout {
            Some(timeout) => wait_with_timeout(child, timeout),
            None => child.wait().map_err(|e| {
                let _ = child.kill();
                OracleError::subject_io(format!("failed to wait for subject: {}", e))
            }),
        }
    }
}

/// Write the whole input and close the pipe.
fn feed_stdin(stdin: Option<ChildStdin>, input: &str) -> io::Result<()> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };
    match stdin.write_all(input.as_bytes()) {
        // The subject may exit without reading all of its input
        Err(e) if e.kind() == ErrorKind::BrokenPipe => {
            debug!("subject closed stdin early");
            Ok(())
        }
        other => other,
    }
}

fn capture_file() -> Result<File> {
    tempfile::tempfile()
        .map_err(|e| OracleError::subject_io(format!("failed to create capture file: {}", e)))
}

fn clone_handle(file: &File) -> Result<File> {
    file.try_clone()
        .map_err(|e| OracleError::subject_io(format!("failed to share capture file: {}", e)))
}

fn read_capture(file: &mut File) -> Result<String> {
    let mut buf = Vec::new();
    file.seek(SeekFrom::Start(0))
        .and_then(|_| file.read_to_end(&mut buf))
        .map_err(|e| OracleError::subject_io(format!("failed to read captured output: {}", e)))?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Wait for a child process, killing it once `timeout` has elapsed.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<ExitStatus> {
    let start = Instant::now();

    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {
                if start.elapsed() >= timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(OracleError::SubjectTimeout {
                        seconds: timeout.as_secs(),
                    });
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(OracleError::subject_io(format!(
                    "failed to wait for subject: {}",
                    e
                )));
            }
        }
    }
}
