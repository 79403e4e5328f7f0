//! Alerts and file/directory pickers shown to the user

use std::io::{self, BufRead, Stderr, StdinLock, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

/// Errors other than user cancellation
#[derive(Error, Debug)]
pub enum DialogError {
    #[error("dialog I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("input closed while waiting for a selection")]
    InputClosed,
}

/// Filter entry for file pickers, e.g. `("Executable (*.exe)", "*.exe")`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFilter {
    pub label: &'static str,
    pub pattern: &'static str,
}

/// User-facing dialog service.
///
/// Pickers return `Ok(None)` when the user cancels; that is not an error.
pub trait UserPrompt {
    /// Returns `true` for OK and `false` for Cancel
    fn ok_cancel_alert(&mut self, message: &str) -> bool;

    fn warning_alert(&mut self, message: &str);

    fn pick_file(&mut self, title: &str, filters: &[FileFilter]) -> Result<Option<PathBuf>, DialogError>;

    fn pick_directory(&mut self, title: &str, initial: &Path) -> Result<Option<PathBuf>, DialogError>;
}

/// Line-based prompt over any reader/writer pair
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompt<StdinLock<'static>, Stderr> {
    /// Prompt on stderr so stdout stays machine readable
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// `None` on end of input
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask_path(&mut self, question: &str) -> Result<Option<PathBuf>, DialogError> {
        write!(self.output, "{question} (empty line cancels): ")?;
        self.output.flush()?;
        match self.read_line()? {
            None => Err(DialogError::InputClosed),
            Some(answer) if answer.is_empty() => Ok(None),
            Some(answer) => Ok(Some(PathBuf::from(answer))),
        }
    }
}

impl<R: BufRead, W: Write> UserPrompt for ConsolePrompt<R, W> {
    fn ok_cancel_alert(&mut self, message: &str) -> bool {
        if writeln!(self.output, "{message}").is_err() {
            return false;
        }
        let _ = write!(self.output, "[o]k / [c]ancel: ");
        let _ = self.output.flush();
        match self.read_line() {
            Ok(Some(answer)) => matches!(answer.to_lowercase().as_str(), "o" | "ok" | "y" | "yes"),
            _ => false,
        }
    }

    fn warning_alert(&mut self, message: &str) {
        let _ = writeln!(self.output, "warning: {message}");
    }

    fn pick_file(&mut self, title: &str, filters: &[FileFilter]) -> Result<Option<PathBuf>, DialogError> {
        writeln!(self.output, "{title}")?;
        for filter in filters {
            writeln!(self.output, "  {} [{}]", filter.label, filter.pattern)?;
        }
        self.ask_path("file")
    }

    fn pick_directory(&mut self, title: &str, initial: &Path) -> Result<Option<PathBuf>, DialogError> {
        writeln!(self.output, "{title}")?;
        if !initial.as_os_str().is_empty() {
            writeln!(self.output, "  current: {}", initial.display())?;
        }
        self.ask_path("directory")
    }
}

/// Prompt for unattended runs: every alert is logged and answered with
/// Cancel, so repairs are skipped instead of waiting on input.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonInteractivePrompt;

impl UserPrompt for NonInteractivePrompt {
    fn ok_cancel_alert(&mut self, message: &str) -> bool {
        warn!(message, "declining repair in non-interactive mode");
        false
    }

    fn warning_alert(&mut self, message: &str) {
        warn!(message, "settings warning");
    }

    fn pick_file(&mut self, _title: &str, _filters: &[FileFilter]) -> Result<Option<PathBuf>, DialogError> {
        Ok(None)
    }

    fn pick_directory(&mut self, _title: &str, _initial: &Path) -> Result<Option<PathBuf>, DialogError> {
        Ok(None)
    }
}
