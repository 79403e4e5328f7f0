//! External collaborators used by the environment manager
//!
//! Each collaborator is a trait so the host (or a test) can supply its own
//! implementation.

pub mod command;
pub mod prompt;
pub mod update;

pub use command::{CommandOutput, CommandRunner, ExecError, SystemCommandRunner};
pub use prompt::{ConsolePrompt, DialogError, FileFilter, NonInteractivePrompt, UserPrompt};
pub use update::{NoUpdateCheck, UpdateCheck};
