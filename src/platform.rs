//! Per-platform toolchain defaults
//!
//! Selected once at startup and passed around as data.

use serde::Serialize;

use crate::services::FileFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }
}

/// Toolchain layout for one platform
#[derive(Debug)]
pub struct PlatformPolicy {
    pub platform: Platform,
    /// File name of the LaTeX engine inside the configured directory
    pub typesetter_binary: &'static str,
    /// Directory that always replaces the caller's LaTeX path before repair
    pub forced_typesetter_dir: Option<&'static str>,
    /// Ghostscript executable names, preferred first
    pub renderer_binaries: &'static [&'static str],
    /// Directories holding Ghostscript directly or in versioned subdirectories
    pub renderer_install_roots: &'static [&'static str],
    pub executable_filters: &'static [FileFilter],
}

static WINDOWS: PlatformPolicy = PlatformPolicy {
    platform: Platform::Windows,
    typesetter_binary: "pdflatex.exe",
    forced_typesetter_dir: None,
    renderer_binaries: &["gswin64c.exe", "gswin32c.exe"],
    renderer_install_roots: &[r"C:\Program Files\gs", r"C:\Program Files (x86)\gs"],
    executable_filters: &[FileFilter {
        label: "Executable (*.exe)",
        pattern: "*.exe",
    }],
};

static MACOS: PlatformPolicy = PlatformPolicy {
    platform: Platform::MacOs,
    typesetter_binary: "pdflatex",
    forced_typesetter_dir: Some("/Library/TeX/texbin"),
    renderer_binaries: &["gs"],
    renderer_install_roots: &["/usr/local/bin", "/opt/homebrew/bin", "/opt/local/bin"],
    executable_filters: &[FileFilter {
        label: "Executable",
        pattern: "*",
    }],
};

static LINUX: PlatformPolicy = PlatformPolicy {
    platform: Platform::Linux,
    typesetter_binary: "pdflatex",
    forced_typesetter_dir: None,
    renderer_binaries: &["gs"],
    renderer_install_roots: &["/usr/bin", "/usr/local/bin"],
    executable_filters: &[FileFilter {
        label: "Executable",
        pattern: "*",
    }],
};

impl PlatformPolicy {
    pub fn for_platform(platform: Platform) -> &'static PlatformPolicy {
        match platform {
            Platform::Windows => &WINDOWS,
            Platform::MacOs => &MACOS,
            Platform::Linux => &LINUX,
        }
    }

    pub fn current() -> &'static PlatformPolicy {
        Self::for_platform(Platform::current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_rows_match_their_platform() {
        for platform in [Platform::Windows, Platform::MacOs, Platform::Linux] {
            assert_eq!(PlatformPolicy::for_platform(platform).platform, platform);
        }
    }

    #[test]
    fn test_only_macos_forces_latex_directory() {
        assert_eq!(
            PlatformPolicy::for_platform(Platform::MacOs).forced_typesetter_dir,
            Some("/Library/TeX/texbin")
        );
        assert!(PlatformPolicy::for_platform(Platform::Windows).forced_typesetter_dir.is_none());
        assert!(PlatformPolicy::for_platform(Platform::Linux).forced_typesetter_dir.is_none());
    }

    #[test]
    fn test_windows_binaries_carry_exe_suffix() {
        let policy = PlatformPolicy::for_platform(Platform::Windows);
        assert!(policy.typesetter_binary.ends_with(".exe"));
        assert!(policy.renderer_binaries.iter().all(|b| b.ends_with(".exe")));
    }
}
