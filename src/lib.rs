//! Toolchain environment for LaTeX2AI
//!
//! Discovers and validates the LaTeX engine and Ghostscript, persists the
//! validated settings and walks the user through repairing a broken setup.

#![forbid(unsafe_code)]

pub mod config;
pub mod constants;
pub mod discovery;
pub mod error;
pub mod manager;
pub mod paths;
pub mod platform;
pub mod probe;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{EnvironmentConfig, LoadReport, ParameterList};
pub use error::{EnvError, EnvResult};
pub use manager::{EnvironmentManager, Services, SettingsOrigin, ToolchainState};
pub use paths::AppPaths;
pub use platform::{Platform, PlatformPolicy};
pub use probe::ProbeOutcome;
