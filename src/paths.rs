//! Locations of the files LaTeX2AI owns on disk

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::constants::files::{APP_DIR, LAST_INPUT_FILE, SCRATCH_DIR, SETTINGS_FILE};
use crate::error::{EnvError, EnvResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    pub settings_file: PathBuf,
    /// Cache of the last item input; only the path is managed here
    pub last_input_file: PathBuf,
    pub scratch_dir: PathBuf,
}

impl AppPaths {
    /// Per-user data directory and the system temp directory
    pub fn resolve() -> EnvResult<Self> {
        let data_dir = dirs::data_dir().ok_or(EnvError::NoDataDirectory)?.join(APP_DIR);
        Ok(Self::in_dirs(data_dir, env::temp_dir().join(SCRATCH_DIR)))
    }

    pub fn in_dirs(data_dir: impl Into<PathBuf>, scratch_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            settings_file: data_dir.join(SETTINGS_FILE),
            last_input_file: data_dir.join(LAST_INPUT_FILE),
            data_dir,
            scratch_dir: scratch_dir.into(),
        }
    }

    /// Create the data directory; succeeds if it already exists
    pub fn ensure_data_dir(&self) -> EnvResult<()> {
        fs::create_dir_all(&self.data_dir).map_err(|e| EnvError::io(&self.data_dir, e))
    }

    /// Remove everything inside the scratch directory, creating it if absent
    pub fn purge_scratch_dir(&self) -> EnvResult<()> {
        purge_dir(&self.scratch_dir)
    }
}

fn purge_dir(dir: &Path) -> EnvResult<()> {
    if !dir.is_dir() {
        return fs::create_dir_all(dir).map_err(|e| EnvError::io(dir, e));
    }

    let mut removed = 0usize;
    for entry in fs::read_dir(dir).map_err(|e| EnvError::io(dir, e))? {
        let entry = entry.map_err(|e| EnvError::io(dir, e))?;
        let path = entry.path();
        let result = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        result.map_err(|e| EnvError::io(&path, e))?;
        removed += 1;
    }

    if removed > 0 {
        info!(path = %dir.display(), removed, "cleared scratch directory");
    } else {
        debug!(path = %dir.display(), "scratch directory already empty");
    }
    Ok(())
}
