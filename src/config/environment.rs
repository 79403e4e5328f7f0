//! Persisted toolchain and preference settings
//!
//! `to_parameter_list` and `default_parameter_list` must stay key-for-key
//! identical, otherwise incomplete loads go unnoticed.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, warn};

use super::parameters::{DocumentError, ParameterList};
use crate::constants::{defaults, document, keys};

/// The six persisted settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentConfig {
    /// Directory with the LaTeX binaries, empty means "resolve via PATH"
    pub latex_bin_path: PathBuf,
    pub latex_engine: String,
    /// Appended verbatim to every LaTeX invocation
    pub latex_command_options: String,
    /// Full path of the Ghostscript executable
    pub gs_command: String,
    pub warning_boundary_boxes: bool,
    pub warning_ai_not_saved: bool,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            latex_bin_path: PathBuf::new(),
            latex_engine: defaults::LATEX_ENGINE.to_string(),
            latex_command_options: defaults::LATEX_COMMAND_OPTIONS.to_string(),
            gs_command: String::new(),
            warning_boundary_boxes: defaults::WARNING_BOUNDARY_BOXES,
            warning_ai_not_saved: defaults::WARNING_AI_NOT_SAVED,
        }
    }
}

/// Outcome of overlaying a parameter list onto a config
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Keys that were absent and kept their previous value
    pub missing_keys: Vec<String>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.missing_keys.is_empty()
    }
}

impl EnvironmentConfig {
    /// Parameter list holding the hardcoded defaults
    pub fn default_parameter_list() -> ParameterList {
        let mut list = ParameterList::new();
        list.set_path(keys::LATEX_BIN_PATH, "");
        list.set_string(keys::LATEX_ENGINE, defaults::LATEX_ENGINE);
        list.set_string(keys::LATEX_COMMAND_OPTIONS, defaults::LATEX_COMMAND_OPTIONS);
        list.set_string(keys::GS_COMMAND, "");
        list.set_bool(keys::WARNING_BOUNDARY_BOXES, defaults::WARNING_BOUNDARY_BOXES);
        list.set_bool(keys::WARNING_AI_NOT_SAVED, defaults::WARNING_AI_NOT_SAVED);
        list
    }

    pub fn to_parameter_list(&self) -> ParameterList {
        let mut list = ParameterList::new();
        list.set_path(keys::LATEX_BIN_PATH, &self.latex_bin_path);
        list.set_string(keys::LATEX_ENGINE, self.latex_engine.as_str());
        list.set_string(keys::LATEX_COMMAND_OPTIONS, self.latex_command_options.as_str());
        list.set_string(keys::GS_COMMAND, self.gs_command.as_str());
        list.set_bool(keys::WARNING_BOUNDARY_BOXES, self.warning_boundary_boxes);
        list.set_bool(keys::WARNING_AI_NOT_SAVED, self.warning_ai_not_saved);
        list
    }

    /// Overlay every recognized key; absent keys keep their current value.
    ///
    /// A present key whose value cannot be interpreted is an error and
    /// leaves `self` untouched.
    pub fn apply_parameter_list(&mut self, list: &ParameterList) -> Result<LoadReport, DocumentError> {
        // Decode the typed values first so a bad value cannot leave a half-applied config
        let warning_boundary_boxes = list.get_bool(keys::WARNING_BOUNDARY_BOXES)?;
        let warning_ai_not_saved = list.get_bool(keys::WARNING_AI_NOT_SAVED)?;

        let mut report = LoadReport::default();
        let mut note_missing = |key: &str| report.missing_keys.push(key.to_string());

        match list.get_path(keys::LATEX_BIN_PATH) {
            Some(path) => self.latex_bin_path = path,
            None => note_missing(keys::LATEX_BIN_PATH),
        }
        match list.get_string(keys::LATEX_ENGINE) {
            Some(engine) => self.latex_engine = engine,
            None => note_missing(keys::LATEX_ENGINE),
        }
        match list.get_string(keys::LATEX_COMMAND_OPTIONS) {
            Some(options) => self.latex_command_options = options,
            None => note_missing(keys::LATEX_COMMAND_OPTIONS),
        }
        match list.get_string(keys::GS_COMMAND) {
            Some(command) => self.gs_command = command,
            None => note_missing(keys::GS_COMMAND),
        }
        match warning_boundary_boxes {
            Some(flag) => self.warning_boundary_boxes = flag,
            None => note_missing(keys::WARNING_BOUNDARY_BOXES),
        }
        match warning_ai_not_saved {
            Some(flag) => self.warning_ai_not_saved = flag,
            None => note_missing(keys::WARNING_AI_NOT_SAVED),
        }

        let unknown: Vec<&str> = list.keys().filter(|k| !keys::ALL.contains(k)).collect();
        if !unknown.is_empty() {
            debug!(?unknown, "ignoring unrecognized settings keys");
        }
        if !report.is_complete() {
            warn!(missing = ?report.missing_keys, "settings document is missing keys, defaults kept");
        }

        Ok(report)
    }

    pub fn to_xml_string(&self) -> String {
        self.to_parameter_list().to_xml_string(document::ROOT_ELEMENT)
    }

    /// Decode a settings document on top of the defaults
    pub fn from_xml_str(xml: &str) -> Result<(Self, LoadReport), DocumentError> {
        let list = ParameterList::from_xml(xml, document::ROOT_ELEMENT)?;
        let mut config = Self::default();
        let report = config.apply_parameter_list(&list)?;
        Ok((config, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom_config() -> EnvironmentConfig {
        EnvironmentConfig {
            latex_bin_path: PathBuf::from("/opt/texlive/2024/bin/x86_64-linux"),
            latex_engine: "lualatex".to_string(),
            latex_command_options: "-interaction batchmode -shell-escape".to_string(),
            gs_command: "/usr/local/bin/gs".to_string(),
            warning_boundary_boxes: false,
            warning_ai_not_saved: true,
        }
    }

    #[test]
    fn test_default_and_current_lists_share_keys() {
        let defaults: Vec<String> = EnvironmentConfig::default_parameter_list()
            .keys()
            .map(str::to_string)
            .collect();
        let current: Vec<String> = custom_config()
            .to_parameter_list()
            .keys()
            .map(str::to_string)
            .collect();

        assert_eq!(defaults, current);
        assert_eq!(defaults.len(), keys::ALL.len());
        for key in keys::ALL {
            assert!(defaults.iter().any(|k| k == key), "missing {key}");
        }
    }

    #[test]
    fn test_default_list_matches_default_config() {
        let mut config = custom_config();
        let report = config
            .apply_parameter_list(&EnvironmentConfig::default_parameter_list())
            .unwrap();
        assert!(report.is_complete());
        assert_eq!(config, EnvironmentConfig::default());
    }

    #[test]
    fn test_xml_roundtrip_preserves_all_fields() {
        let config = custom_config();
        let (decoded, report) = EnvironmentConfig::from_xml_str(&config.to_xml_string()).unwrap();
        assert!(report.is_complete());
        assert_eq!(decoded, config);
    }

    #[test]
    fn test_missing_key_keeps_default_and_reports_incomplete() {
        let full = custom_config().to_parameter_list();
        let mut reduced = ParameterList::new();
        for key in keys::ALL.iter().filter(|k| **k != keys::LATEX_ENGINE) {
            reduced.set_string(key, full.get_string(key).unwrap());
        }
        let xml = reduced.to_xml_string(document::ROOT_ELEMENT);

        let (decoded, report) = EnvironmentConfig::from_xml_str(&xml).unwrap();
        assert!(!report.is_complete());
        assert_eq!(report.missing_keys, vec![keys::LATEX_ENGINE.to_string()]);
        assert_eq!(decoded.latex_engine, defaults::LATEX_ENGINE);
        assert_eq!(decoded.gs_command, "/usr/local/bin/gs");
        assert!(!decoded.warning_boundary_boxes);
    }

    #[test]
    fn test_bad_boolean_leaves_config_untouched() {
        let mut list = custom_config().to_parameter_list();
        list.set_string(keys::WARNING_AI_NOT_SAVED, "maybe");

        let mut config = EnvironmentConfig::default();
        let result = config.apply_parameter_list(&list);
        assert!(matches!(result, Err(DocumentError::InvalidInteger { .. })));
        assert_eq!(config, EnvironmentConfig::default());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let mut list = EnvironmentConfig::default_parameter_list();
        list.set_string("future_option", "value");

        let mut config = EnvironmentConfig::default();
        let report = config.apply_parameter_list(&list).unwrap();
        assert!(report.is_complete());
        assert_eq!(config, EnvironmentConfig::default());
    }
}
