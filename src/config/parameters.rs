//! Flat key/value parameter list and its XML document codec
//!
//! Every option is stored as an attribute of a single root element:
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <LaTeX2AI_options
//!     gs_command="/usr/bin/gs"
//!     warning_ai_not_saved="1"/>
//! ```
//! Child elements are ignored on decode.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::constants::document::DECLARATION;

/// Errors produced while decoding a settings document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("malformed XML: {0}")]
    Malformed(String),

    #[error("expected root element <{expected}>, found <{found}>")]
    UnexpectedRoot { expected: String, found: String },

    #[error("option '{key}' is not an integer: '{value}'")]
    InvalidInteger { key: String, value: String },
}

/// Value stored under a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Str(String),
    Int(i64),
    Path(PathBuf),
}

impl Value {
    fn to_attribute(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::Int(i) => i.to_string(),
            Value::Path(p) => p.to_string_lossy().into_owned(),
        }
    }
}

/// Flat, key-ordered option map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterList {
    options: BTreeMap<String, Value>,
}

impl ParameterList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_string(&mut self, key: &str, value: impl Into<String>) {
        self.options.insert(key.to_string(), Value::Str(value.into()));
    }

    pub fn set_int(&mut self, key: &str, value: i64) {
        self.options.insert(key.to_string(), Value::Int(value));
    }

    /// Booleans are stored as integers (`0`/`1`)
    pub fn set_bool(&mut self, key: &str, value: bool) {
        self.set_int(key, i64::from(value));
    }

    pub fn set_path(&mut self, key: &str, value: impl AsRef<Path>) {
        self.options
            .insert(key.to_string(), Value::Path(value.as_ref().to_path_buf()));
    }

    pub fn contains(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.options.get(key).map(Value::to_attribute)
    }

    pub fn get_path(&self, key: &str) -> Option<PathBuf> {
        self.options.get(key).map(|v| match v {
            Value::Path(p) => p.clone(),
            other => PathBuf::from(other.to_attribute()),
        })
    }

    /// Integer view of an option; decoded strings are parsed on demand
    pub fn get_int(&self, key: &str) -> Result<Option<i64>, DocumentError> {
        match self.options.get(key) {
            None => Ok(None),
            Some(Value::Int(i)) => Ok(Some(*i)),
            Some(other) => {
                let raw = other.to_attribute();
                raw.trim()
                    .parse::<i64>()
                    .map(Some)
                    .map_err(|_| DocumentError::InvalidInteger {
                        key: key.to_string(),
                        value: raw,
                    })
            }
        }
    }

    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, DocumentError> {
        Ok(self.get_int(key)?.map(|i| i != 0))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.options.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Encode as a standalone XML document under `root`
    pub fn to_xml_string(&self, root: &str) -> String {
        let mut xml = String::new();
        xml.push_str(DECLARATION);
        xml.push('\n');
        xml.push('<');
        xml.push_str(root);
        for (key, value) in &self.options {
            xml.push_str(&format!(
                "\n    {}=\"{}\"",
                key,
                escape_attribute(&value.to_attribute())
            ));
        }
        xml.push_str("/>\n");
        xml
    }

    /// Decode a document written by [`ParameterList::to_xml_string`].
    ///
    /// All values come back as strings; typed access happens through the
    /// `get_*` accessors.
    pub fn from_xml(xml: &str, root: &str) -> Result<Self, DocumentError> {
        let doc = roxmltree::Document::parse(xml)
            .map_err(|e| DocumentError::Malformed(e.to_string()))?;

        let element = doc.root_element();
        let found = element.tag_name().name();
        if found != root {
            return Err(DocumentError::UnexpectedRoot {
                expected: root.to_string(),
                found: found.to_string(),
            });
        }

        let mut list = ParameterList::new();
        for attribute in element.attributes() {
            list.set_string(attribute.name(), attribute.value());
        }

        let ignored = element.children().filter(|n| n.is_element()).count();
        if ignored > 0 {
            debug!(ignored, "ignoring nested elements in settings document");
        }

        Ok(list)
    }
}

/// Escape a value for use inside a double-quoted attribute.
///
/// Whitespace control characters are written as character references so
/// attribute-value normalization cannot alter them.
fn escape_attribute(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            _ => out.push(c),
        }
    }
    out
}
