//! Version probes for the external toolchains
//!
//! A path is valid only when the referenced program runs and prints the
//! expected marker. Probes never fail; every problem is folded into a
//! [`ProbeOutcome`].

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::constants::probe::{
    RENDERER_MARKER, RENDERER_VERSION_FLAG, TYPESETTER_COMMAND, TYPESETTER_MARKER,
    TYPESETTER_VERSION_FLAG,
};
use crate::platform::PlatformPolicy;
use crate::services::CommandRunner;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum ProbeOutcome {
    Valid,
    /// The command could not be run or exited with an error
    Missing(String),
    /// The command ran but its output lacks the marker
    WrongOutput,
    /// Non-empty LaTeX path that is not a directory; nothing was executed
    NotADirectory,
}

impl ProbeOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ProbeOutcome::Valid)
    }
}

pub fn renderer_command_line(gs_command: &str) -> String {
    format!("\"{gs_command}\" {RENDERER_VERSION_FLAG}")
}

/// Command line probing the LaTeX engine, `None` if the path cannot work
pub fn typesetter_command_line(policy: &PlatformPolicy, latex_bin_path: &Path) -> Option<String> {
    let executable = if latex_bin_path.is_dir() {
        let exe = latex_bin_path.join(policy.typesetter_binary);
        format!("\"{}\"", exe.display())
    } else if latex_bin_path.as_os_str().is_empty() {
        TYPESETTER_COMMAND.to_string()
    } else {
        return None;
    };
    Some(format!("{executable} {TYPESETTER_VERSION_FLAG}"))
}

fn run_probe(runner: &dyn CommandRunner, command_line: &str, marker: &str) -> ProbeOutcome {
    match runner.execute(command_line) {
        Ok(output) if output.stdout.contains(marker) => ProbeOutcome::Valid,
        Ok(_) => {
            debug!(command = %command_line, marker, "probe output lacks marker");
            ProbeOutcome::WrongOutput
        }
        Err(e) => {
            debug!(command = %command_line, error = %e, "probe failed to run");
            ProbeOutcome::Missing(e.to_string())
        }
    }
}

pub fn probe_renderer(runner: &dyn CommandRunner, gs_command: &str) -> ProbeOutcome {
    run_probe(runner, &renderer_command_line(gs_command), RENDERER_MARKER)
}

pub fn probe_typesetter(
    runner: &dyn CommandRunner,
    policy: &PlatformPolicy,
    latex_bin_path: &Path,
) -> ProbeOutcome {
    match typesetter_command_line(policy, latex_bin_path) {
        Some(command_line) => run_probe(runner, &command_line, TYPESETTER_MARKER),
        None => {
            debug!(path = %latex_bin_path.display(), "LaTeX path is neither empty nor a directory");
            ProbeOutcome::NotADirectory
        }
    }
}
