//! Command runner for external process execution
//!
//! Command lines are handed to the platform shell so quoted executable paths
//! behave the same way they do in a terminal.

use std::io::{self, Read};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, warn};

use crate::constants::probe::DEFAULT_TIMEOUT_SECS;

/// Interval between child status polls
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Captured output of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Reasons a command did not produce usable output
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("empty command line")]
    Empty,

    #[error("failed to launch command: {0}")]
    Launch(#[from] io::Error),

    #[error("command exited with status {code:?}: {stderr}")]
    Failed { code: Option<i32>, stderr: String },

    #[error("command did not finish within {0:?}")]
    TimedOut(Duration),
}

/// Runs a command line and captures its output.
///
/// Implementations fail on launch errors and non-zero exit codes.
pub trait CommandRunner {
    fn execute(&self, command_line: &str) -> Result<CommandOutput, ExecError>;
}

/// Runs commands through `sh -c` (or `cmd /C` on Windows) with a deadline
#[derive(Debug, Clone)]
pub struct SystemCommandRunner {
    timeout: Duration,
}

impl SystemCommandRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[cfg(windows)]
    fn shell_command(command_line: &str) -> Command {
        use std::os::windows::process::CommandExt;

        // cmd /C strips one pair of outer quotes and does not understand
        // backslash escapes, so the line must bypass the std quoting rules.
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").raw_arg(format!("\"{command_line}\""));
        cmd
    }

    #[cfg(not(windows))]
    fn shell_command(command_line: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command_line);
        cmd
    }

    fn wait_with_deadline(&self, child: &mut Child) -> Result<std::process::ExitStatus, ExecError> {
        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }
            if Instant::now() >= deadline {
                if let Err(e) = child.kill() {
                    warn!(error = %e, "failed to kill timed out command");
                }
                let _ = child.wait();
                return Err(ExecError::TimedOut(self.timeout));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl Default for SystemCommandRunner {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

/// Drain a pipe on a helper thread so a chatty child cannot block on a full buffer
fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buffer);
        }
        String::from_utf8_lossy(&buffer).into_owned()
    })
}

impl CommandRunner for SystemCommandRunner {
    fn execute(&self, command_line: &str) -> Result<CommandOutput, ExecError> {
        if command_line.trim().is_empty() {
            return Err(ExecError::Empty);
        }

        debug!(command = %command_line, "executing");
        let mut child = Self::shell_command(command_line)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout_reader = spawn_reader(child.stdout.take());
        let stderr_reader = spawn_reader(child.stderr.take());

        let status = self.wait_with_deadline(&mut child)?;

        let output = CommandOutput {
            stdout: stdout_reader.join().unwrap_or_default(),
            stderr: stderr_reader.join().unwrap_or_default(),
        };

        if !status.success() {
            return Err(ExecError::Failed {
                code: status.code(),
                stderr: output.stderr,
            });
        }

        Ok(output)
    }
}


#[cfg(all(test, windows))]
mod windows_tests {
    use super::*;
    use std::env;
    use std::path::PathBuf;

    fn system_cmd() -> PathBuf {
        let root = env::var_os("SystemRoot").unwrap_or_else(|| "C:\\Windows".into());
        PathBuf::from(root).join("System32").join("cmd.exe")
    }

    #[test]
    fn test_quoted_executable_path_runs() {
        let runner = SystemCommandRunner::default();
        let line = format!("\"{}\" /C echo GPL Ghostscript 10.02.1", system_cmd().display());
        let output = runner.execute(&line).unwrap();
        assert!(output.stdout.contains(" Ghostscript "));
    }

    #[test]
    fn test_quoted_missing_executable_is_failure() {
        let runner = SystemCommandRunner::default();
        assert!(runner.execute("\"C:\\no such dir\\gswin64c.exe\" -v").is_err());
    }
}
