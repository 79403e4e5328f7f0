//! Scripted collaborators for unit tests

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::discovery::RendererSearch;
use crate::platform::PlatformPolicy;
use crate::services::{CommandOutput, CommandRunner, DialogError, ExecError, FileFilter, UserPrompt};

type Responder = dyn Fn(&str) -> Result<CommandOutput, ExecError>;

/// Command runner answering from a closure and recording every command line.
///
/// Clones share the call log.
#[derive(Clone)]
pub struct FakeRunner {
    respond: Rc<Responder>,
    calls: Rc<RefCell<Vec<String>>>,
}

impl FakeRunner {
    pub fn new(respond: impl Fn(&str) -> Result<CommandOutput, ExecError> + 'static) -> Self {
        Self {
            respond: Rc::new(respond),
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Ghostscript is valid exactly at `gs`, pdflatex on PATH or in `latex_dir`
    pub fn toolchain(gs: &str, latex_dir: Option<&Path>) -> Self {
        let gs = format!("\"{gs}\" -v");
        let latex = match latex_dir {
            Some(dir) => format!("\"{}\" -version", dir.join("pdflatex").display()),
            None => "pdflatex -version".to_string(),
        };
        Self::new(move |cmd| {
            if cmd == gs {
                stdout("GPL Ghostscript 10.02.1 (2023-11-01)")
            } else if cmd == latex {
                stdout("pdfTeX 3.141592653-2.6-1.40.25 (TeX Live 2023)")
            } else {
                Err(ExecError::Failed {
                    code: Some(127),
                    stderr: "command not found".to_string(),
                })
            }
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

pub fn stdout(text: &str) -> Result<CommandOutput, ExecError> {
    Ok(CommandOutput {
        stdout: text.to_string(),
        stderr: String::new(),
    })
}

impl CommandRunner for FakeRunner {
    fn execute(&self, command_line: &str) -> Result<CommandOutput, ExecError> {
        self.calls.borrow_mut().push(command_line.to_string());
        (self.respond)(command_line)
    }
}

/// One scripted user reaction
pub enum Step {
    Confirm(bool),
    File(Result<Option<PathBuf>, DialogError>),
    Directory(Result<Option<PathBuf>, DialogError>),
}

/// Everything the prompt was asked to show
#[derive(Debug, Default, Clone)]
pub struct PromptLog {
    pub alerts: Vec<String>,
    pub warnings: Vec<String>,
    pub directory_initials: Vec<PathBuf>,
}

/// Prompt replaying a fixed script; panics when the script runs out or the
/// next step does not match the dialog being shown.
#[derive(Clone)]
pub struct ScriptedPrompt {
    steps: Rc<RefCell<VecDeque<Step>>>,
    log: Rc<RefCell<PromptLog>>,
}

impl ScriptedPrompt {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: Rc::new(RefCell::new(steps.into_iter().collect())),
            log: Rc::new(RefCell::new(PromptLog::default())),
        }
    }

    pub fn silent() -> Self {
        Self::new([])
    }

    pub fn log(&self) -> PromptLog {
        self.log.borrow().clone()
    }

    pub fn remaining(&self) -> usize {
        self.steps.borrow().len()
    }

    fn next(&self, dialog: &str) -> Step {
        self.steps
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected {dialog} dialog"))
    }
}

impl UserPrompt for ScriptedPrompt {
    fn ok_cancel_alert(&mut self, message: &str) -> bool {
        self.log.borrow_mut().alerts.push(message.to_string());
        match self.next("ok/cancel") {
            Step::Confirm(answer) => answer,
            _ => panic!("expected ok/cancel step"),
        }
    }

    fn warning_alert(&mut self, message: &str) {
        self.log.borrow_mut().warnings.push(message.to_string());
    }

    fn pick_file(&mut self, _title: &str, _filters: &[FileFilter]) -> Result<Option<PathBuf>, DialogError> {
        match self.next("file") {
            Step::File(result) => result,
            _ => panic!("expected file step"),
        }
    }

    fn pick_directory(&mut self, _title: &str, initial: &Path) -> Result<Option<PathBuf>, DialogError> {
        self.log.borrow_mut().directory_initials.push(initial.to_path_buf());
        match self.next("directory") {
            Step::Directory(result) => result,
            _ => panic!("expected directory step"),
        }
    }
}

/// Renderer search that returns a fixed answer without touching the host
pub struct FixedSearch(pub Option<PathBuf>);

impl RendererSearch for FixedSearch {
    fn find(&self, _policy: &PlatformPolicy) -> Option<PathBuf> {
        self.0.clone()
    }
}
