//! Settings persistence for LaTeX2AI
//!
//! - **parameters**: flat key/value list and its XML document codec
//! - **environment**: the six persisted settings and their key mapping

pub mod environment;
pub mod parameters;

// Re-export commonly used types
pub use environment::{EnvironmentConfig, LoadReport};
pub use parameters::{DocumentError, ParameterList, Value};
