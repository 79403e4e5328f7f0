//! Hook for checking whether a newer LaTeX2AI release exists

use anyhow::Result;

/// Best-effort release check run once at startup.
///
/// Returns the newer release tag, if any. Errors are never fatal.
pub trait UpdateCheck {
    fn newer_release(&self) -> Result<Option<String>>;
}

/// Check that never reports an update
#[derive(Debug, Clone, Copy, Default)]
pub struct NoUpdateCheck;

impl UpdateCheck for NoUpdateCheck {
    fn newer_release(&self) -> Result<Option<String>> {
        Ok(None)
    }
}
