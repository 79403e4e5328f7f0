//! Application-wide constants
//!
//! This module contains the file names, document keys, probe flags and user
//! facing messages used throughout the crate, providing a single source of
//! truth for constant values.

/// Files and directories owned by LaTeX2AI
pub mod files {
    /// Directory name below the per-user application data directory
    pub const APP_DIR: &str = "LaTeX2AI";

    /// Persisted settings document
    pub const SETTINGS_FILE: &str = "LaTeX2AI_application_data.xml";

    /// Cache of the last item input (path computed only)
    pub const LAST_INPUT_FILE: &str = "LaTeX2AI_last_input.xml";

    /// Scratch directory name below the system temp directory
    pub const SCRATCH_DIR: &str = "LaTeX2AI";
}

/// Settings document layout
pub mod document {
    /// Root element of the settings document
    pub const ROOT_ELEMENT: &str = "LaTeX2AI_options";

    /// XML declaration written in front of every document
    pub const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
}

/// Option keys of the settings document (one per config field)
pub mod keys {
    pub const LATEX_BIN_PATH: &str = "latex_bin_path";
    pub const LATEX_ENGINE: &str = "latex_engine";
    pub const LATEX_COMMAND_OPTIONS: &str = "latex_command_options";
    pub const GS_COMMAND: &str = "gs_command";
    pub const WARNING_BOUNDARY_BOXES: &str = "warning_boundary_boxes";
    pub const WARNING_AI_NOT_SAVED: &str = "warning_ai_not_saved";

    /// Every key, in document order
    pub const ALL: [&str; 6] = [
        LATEX_BIN_PATH,
        LATEX_ENGINE,
        LATEX_COMMAND_OPTIONS,
        GS_COMMAND,
        WARNING_BOUNDARY_BOXES,
        WARNING_AI_NOT_SAVED,
    ];
}

/// Hardcoded field defaults
pub mod defaults {
    pub const LATEX_ENGINE: &str = "pdflatex";
    pub const LATEX_COMMAND_OPTIONS: &str =
        "-interaction nonstopmode -halt-on-error -file-line-error";
    pub const WARNING_BOUNDARY_BOXES: bool = true;
    pub const WARNING_AI_NOT_SAVED: bool = true;
}

/// Version probes for the external toolchains
pub mod probe {
    /// Flag passed to the renderer
    pub const RENDERER_VERSION_FLAG: &str = "-v";

    /// Substring identifying Ghostscript output
    pub const RENDERER_MARKER: &str = " Ghostscript ";

    /// Bare command used when no LaTeX directory is configured
    pub const TYPESETTER_COMMAND: &str = "pdflatex";

    /// Flag passed to the LaTeX engine
    pub const TYPESETTER_VERSION_FLAG: &str = "-version";

    /// Substring identifying pdfTeX output
    pub const TYPESETTER_MARKER: &str = "pdfTeX";

    /// Default upper bound for a single probe, in seconds
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
}

/// Messages shown through the prompt collaborator
pub mod messages {
    pub const PARTIAL_LOAD: &str = "Not all Plug-In settings of LaTeX2AI could be loaded. This can happen if a new \
         version is used. Please check if all options are set to your preferences.";

    pub const RENDERER_INVALID: &str = "The path to the ghostscript executable (gswin32c.exe, gswin64c.exe) seems to \
         be wrong. Please select the correct path, otherwise LaTeX2AI can not be used!";

    pub const RENDERER_PICKER_TITLE: &str = "Select the ghostscript executable";

    pub const TYPESETTER_INVALID: &str = "The path to the folder with the LaTeX executables (pdflatex.exe, ...) seems \
         to be wrong. Please select the correct path, otherwise LaTeX2AI can not be used!";

    pub const TYPESETTER_PICKER_TITLE: &str = "Select the folder containing the LaTeX executables";
}
