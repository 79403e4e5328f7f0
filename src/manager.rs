//! Environment manager: loads, validates, repairs and persists the settings
//!
//! One manager is created at the entry point and owned there for the whole
//! session. Dropping it writes the settings document back to disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::{EnvironmentConfig, LoadReport};
use crate::constants::messages;
use crate::discovery::RendererSearch;
use crate::error::{EnvError, EnvResult};
use crate::paths::AppPaths;
use crate::platform::PlatformPolicy;
use crate::probe::{self, ProbeOutcome};
use crate::services::{CommandRunner, UpdateCheck, UserPrompt};

/// How far toolchain resolution got
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolchainState {
    Ready,
    /// Ghostscript could not be resolved; the LaTeX path was not checked
    RendererUnresolved,
    TypesetterUnresolved,
}

/// Where the in-memory settings came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SettingsOrigin {
    /// No settings document existed
    Defaults,
    Loaded { report: LoadReport },
    /// The document could not be decoded and was deleted
    DiscardedCorrupt { reason: String },
}

/// Collaborators supplied by the host
pub struct Services {
    pub runner: Box<dyn CommandRunner>,
    pub prompt: Box<dyn UserPrompt>,
    pub updates: Box<dyn UpdateCheck>,
    pub search: Box<dyn RendererSearch>,
}

pub struct EnvironmentManager {
    config: EnvironmentConfig,
    paths: AppPaths,
    policy: &'static PlatformPolicy,
    services: Services,
    origin: SettingsOrigin,
    state: ToolchainState,
    /// Set once startup finished without a fatal error
    persist_on_drop: bool,
}

impl EnvironmentManager {
    /// Run the startup sequence.
    ///
    /// Toolchain problems the user declines to repair are not errors; they
    /// are reported through [`EnvironmentManager::state`]. Errors are limited
    /// to filesystem failures on the data directory and failing dialogs.
    pub fn start(paths: AppPaths, policy: &'static PlatformPolicy, services: Services) -> EnvResult<Self> {
        match services.updates.newer_release() {
            Ok(Some(release)) => info!(release = %release, "a newer LaTeX2AI release is available"),
            Ok(None) => debug!("no newer release reported"),
            Err(e) => debug!(error = %e, "release check failed"),
        }

        let mut manager = Self {
            config: EnvironmentConfig::default(),
            paths,
            policy,
            services,
            origin: SettingsOrigin::Defaults,
            state: ToolchainState::Ready,
            persist_on_drop: false,
        };

        manager.paths.ensure_data_dir()?;
        manager.origin = manager.load_settings();

        if let Err(e) = manager.paths.purge_scratch_dir() {
            warn!(error = %e, "could not clear scratch directory");
        }

        manager.state = manager.resolve_toolchain()?;
        manager.persist_on_drop = true;

        info!(state = ?manager.state, "environment ready");
        Ok(manager)
    }

    fn load_settings(&mut self) -> SettingsOrigin {
        let path = self.paths.settings_file.clone();
        if !path.is_file() {
            info!(path = %path.display(), "no settings file, using defaults");
            return SettingsOrigin::Defaults;
        }

        let decoded = fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|xml| EnvironmentConfig::from_xml_str(&xml).map_err(|e| e.to_string()));

        match decoded {
            Ok((config, report)) => {
                info!(path = %path.display(), complete = report.is_complete(), "loaded settings");
                self.config = config;
                if !report.is_complete() {
                    self.services.prompt.warning_alert(messages::PARTIAL_LOAD);
                }
                SettingsOrigin::Loaded { report }
            }
            Err(reason) => {
                warn!(path = %path.display(), error = %reason, "settings file unreadable, removing it");
                if let Err(e) = fs::remove_file(&path) {
                    error!(path = %path.display(), error = %e, "failed to remove unreadable settings file");
                }
                SettingsOrigin::DiscardedCorrupt { reason }
            }
        }
    }

    fn resolve_toolchain(&mut self) -> EnvResult<ToolchainState> {
        if !self.check_gs_command(&self.config.gs_command) {
            let discovered = self
                .services
                .search
                .find(self.policy)
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default();
            if !self.set_gs_command(&discovered)? {
                warn!("ghostscript unresolved, skipping LaTeX check");
                return Ok(ToolchainState::RendererUnresolved);
            }
        }

        if !self.check_latex_bin_path(&self.config.latex_bin_path) {
            self.config.latex_bin_path = PathBuf::new();
            if !self.set_latex_bin_path(Path::new(""))? {
                warn!("LaTeX path unresolved");
                return Ok(ToolchainState::TypesetterUnresolved);
            }
        }

        Ok(ToolchainState::Ready)
    }

    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    pub fn policy(&self) -> &'static PlatformPolicy {
        self.policy
    }

    pub fn origin(&self) -> &SettingsOrigin {
        &self.origin
    }

    /// Toolchain state as of startup, the last successful setter or the last
    /// [`EnvironmentManager::revalidate`]
    pub fn state(&self) -> ToolchainState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == ToolchainState::Ready
    }

    pub fn probe_gs_command(&self, gs_command: &str) -> ProbeOutcome {
        probe::probe_renderer(self.services.runner.as_ref(), gs_command)
    }

    pub fn check_gs_command(&self, gs_command: &str) -> bool {
        self.probe_gs_command(gs_command).is_valid()
    }

    pub fn probe_latex_bin_path(&self, latex_bin_path: &Path) -> ProbeOutcome {
        probe::probe_typesetter(self.services.runner.as_ref(), self.policy, latex_bin_path)
    }

    pub fn check_latex_bin_path(&self, latex_bin_path: &Path) -> bool {
        self.probe_latex_bin_path(latex_bin_path).is_valid()
    }

    /// Set the Ghostscript command, asking the user for a replacement until
    /// it validates.
    ///
    /// Returns `Ok(false)` if the user cancels; the field is only written
    /// with a validated value.
    pub fn set_gs_command(&mut self, gs_command: &str) -> EnvResult<bool> {
        let mut gs_command = gs_command.to_string();

        while !self.check_gs_command(&gs_command) {
            debug!(candidate = %gs_command, "ghostscript candidate rejected");
            if !self.services.prompt.ok_cancel_alert(messages::RENDERER_INVALID) {
                info!("ghostscript repair cancelled");
                return Ok(false);
            }

            let picked = self
                .services
                .prompt
                .pick_file(messages::RENDERER_PICKER_TITLE, self.policy.executable_filters)?;
            match picked {
                Some(path) => gs_command = path.to_string_lossy().into_owned(),
                None => {
                    info!("ghostscript selection cancelled");
                    return Ok(false);
                }
            }
        }

        info!(gs_command = %gs_command, "ghostscript command set");
        self.config.gs_command = gs_command;
        self.refresh_state();
        Ok(true)
    }

    /// Set the LaTeX binary directory, asking the user for a replacement
    /// until it validates.
    ///
    /// Platforms with a fixed TeX location start from that location instead
    /// of `latex_bin_path`.
    pub fn set_latex_bin_path(&mut self, latex_bin_path: &Path) -> EnvResult<bool> {
        let mut path = match self.policy.forced_typesetter_dir {
            Some(dir) => PathBuf::from(dir),
            None => latex_bin_path.to_path_buf(),
        };

        while !self.check_latex_bin_path(&path) {
            debug!(candidate = %path.display(), "LaTeX directory rejected");
            if !self.services.prompt.ok_cancel_alert(messages::TYPESETTER_INVALID) {
                info!("LaTeX repair cancelled");
                return Ok(false);
            }

            match self
                .services
                .prompt
                .pick_directory(messages::TYPESETTER_PICKER_TITLE, &path)?
            {
                Some(picked) => path = picked,
                None => {
                    info!("LaTeX directory selection cancelled");
                    return Ok(false);
                }
            }
        }

        info!(latex_bin_path = %path.display(), "LaTeX directory set");
        self.config.latex_bin_path = path;
        self.refresh_state();
        Ok(true)
    }

    /// A committed value can only lift an unresolved state; startup keeps
    /// `Ready` until resolution finishes and sets the final state itself.
    fn refresh_state(&mut self) {
        if self.state != ToolchainState::Ready {
            self.revalidate();
        }
    }

    /// Re-probe both toolchains without prompting and refresh the state
    pub fn revalidate(&mut self) -> ToolchainState {
        self.state = if !self.check_gs_command(&self.config.gs_command) {
            ToolchainState::RendererUnresolved
        } else if !self.check_latex_bin_path(&self.config.latex_bin_path) {
            ToolchainState::TypesetterUnresolved
        } else {
            ToolchainState::Ready
        };
        self.state
    }

    pub fn to_xml_string(&self) -> String {
        self.config.to_xml_string()
    }

    /// Overwrite the settings file with the current state
    pub fn save(&self) -> EnvResult<()> {
        let path = &self.paths.settings_file;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| EnvError::io(parent, e))?;
        }
        fs::write(path, self.to_xml_string()).map_err(|e| EnvError::io(path, e))?;
        debug!(path = %path.display(), "settings saved");
        Ok(())
    }
}

impl Drop for EnvironmentManager {
    fn drop(&mut self) {
        if !self.persist_on_drop {
            return;
        }
        if let Err(e) = self.save() {
            error!(error = %e, "failed to save settings on shutdown");
        }
    }
}
