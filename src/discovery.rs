//! Ghostscript discovery on the host
//!
//! Looks at the policy's install roots first (newest versioned install wins),
//! then falls back to `PATH`.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::platform::PlatformPolicy;

/// Source of a replacement renderer when the stored command does not validate
pub trait RendererSearch {
    fn find(&self, policy: &PlatformPolicy) -> Option<PathBuf>;
}

/// Searches the real filesystem and `PATH`
#[derive(Debug, Clone, Copy, Default)]
pub struct HostSearch;

impl RendererSearch for HostSearch {
    fn find(&self, policy: &PlatformPolicy) -> Option<PathBuf> {
        discover_renderer(policy)
    }
}

/// Best renderer candidate for this host, if any exists on disk
pub fn discover_renderer(policy: &PlatformPolicy) -> Option<PathBuf> {
    let found = discover_in(
        policy.renderer_install_roots,
        policy.renderer_binaries,
        env::var_os("PATH"),
    );
    match &found {
        Some(path) => info!(path = %path.display(), "discovered ghostscript candidate"),
        None => info!("no ghostscript installation found"),
    }
    found
}

fn discover_in<R: AsRef<Path>>(
    roots: &[R],
    binaries: &[&str],
    path_var: Option<OsString>,
) -> Option<PathBuf> {
    for root in roots {
        let root = root.as_ref();
        for binary in binaries {
            let direct = root.join(binary);
            if direct.is_file() {
                return Some(direct);
            }
        }
        for version_dir in versioned_installs(root) {
            for binary in binaries {
                let candidate = version_dir.join("bin").join(binary);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }
    }

    binaries
        .iter()
        .find_map(|binary| find_in_path(binary, path_var.as_ref()))
}

/// Subdirectories like `gs10.02.1`, newest first
fn versioned_installs(root: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(root) else {
        return Vec::new();
    };

    let mut installs: Vec<(Vec<u32>, PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .filter_map(|path| {
            let name = path.file_name()?.to_str()?;
            let version = parse_version(name)?;
            Some((version, path))
        })
        .collect();

    installs.sort_by(|a, b| b.0.cmp(&a.0));
    debug!(root = %root.display(), count = installs.len(), "versioned ghostscript installs");
    installs.into_iter().map(|(_, path)| path).collect()
}

/// `gs10.02.1` -> `[10, 2, 1]`
fn parse_version(name: &str) -> Option<Vec<u32>> {
    let digits = name.trim_start_matches(|c: char| !c.is_ascii_digit());
    if digits.is_empty() {
        return None;
    }
    digits
        .split('.')
        .map(|part| part.parse::<u32>().ok())
        .collect()
}

fn find_in_path(binary: &str, path_var: Option<&OsString>) -> Option<PathBuf> {
    let path_var = path_var?;
    env::split_paths(path_var)
        .map(|dir| dir.join(binary))
        .find(|full| full.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("gs10.02.1"), Some(vec![10, 2, 1]));
        assert_eq!(parse_version("gs9.56"), Some(vec![9, 56]));
        assert_eq!(parse_version("fonts"), None);
        assert_eq!(parse_version("gs10.beta"), None);
    }

    #[test]
    fn test_newest_versioned_install_wins() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("gs9.56.1/bin/gswin64c.exe"));
        touch(&root.path().join("gs10.02.1/bin/gswin64c.exe"));
        touch(&root.path().join("gs10.01.0/bin/gswin64c.exe"));

        let found = discover_in(&[root.path()], &["gswin64c.exe", "gswin32c.exe"], None);
        assert_eq!(found, Some(root.path().join("gs10.02.1/bin/gswin64c.exe")));
    }

    #[test]
    fn test_direct_binary_in_root() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("gs"));

        let found = discover_in(&[root.path()], &["gs"], None);
        assert_eq!(found, Some(root.path().join("gs")));
    }

    #[test]
    fn test_falls_back_to_path() {
        let empty_root = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        touch(&bin.path().join("gs"));

        let path_var = env::join_paths([bin.path()]).unwrap();
        let found = discover_in(&[empty_root.path()], &["gs"], Some(path_var));
        assert_eq!(found, Some(bin.path().join("gs")));
    }

    #[test]
    fn test_nothing_found() {
        let root = tempfile::tempdir().unwrap();
        assert_eq!(discover_in(&[root.path()], &["gs"], None), None);
    }
}
