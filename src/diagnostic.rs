//! Verification diagnostics and source identity

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Opaque identifier of the resource a rule was declared in.
///
/// The engine only carries it into diagnostics; resolution back to an
/// editor resource is the host's concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceHandle(PathBuf);

impl SourceHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Placeholder for rules with no recorded declaration site.
    pub fn unknown() -> Self {
        Self(PathBuf::from("<unknown>"))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for SourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<&str> for SourceHandle {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A rule node whose arguments don't fit its declared shape.
///
/// Raised by `verify()` before any matching occurs; fatal for the rule tree
/// it came from, but never for the analysis host. Carries exactly the
/// identity a problem view needs: what went wrong, which node, declared
/// where.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message} (rule '{node}', declared in {declared_in})")]
pub struct VerificationError {
    /// Human-readable description of the violation.
    pub message: String,
    /// Name of the offending rule node.
    pub node: String,
    /// Where that node was declared.
    pub declared_in: SourceHandle,
}

impl VerificationError {
    pub fn new(message: impl Into<String>, node: impl Into<String>, source: SourceHandle) -> Self {
        Self {
            message: message.into(),
            node: node.into(),
            declared_in: source,
        }
    }
}
