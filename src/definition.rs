//! Rule definition files
//!
//! The serde-facing model of a rule tree: what an authoring tool writes to
//! disk and what the registry turns into live nodes. YAML and JSON are both
//! accepted.
//!
//! ```yaml
//! version: "1.0"
//! rules:
//!   - id: inside-sources-block
//!     kind: enclosing-call-name
//!     args:
//!       - sources
//!   - id: inside-task-like-call
//!     kind: enclosing-call-name
//!     args:
//!       - kind: name-regex
//!         args: ["^task.*"]
//! ```

use crate::diagnostic::SourceHandle;
use crate::pointcut::{Arg, Pointcut};
use crate::registry::{Registry, RegistryError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Error loading or building rule definitions.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("unsupported rule file format: {0}")]
    UnsupportedFormat(String),
}

/// One authored argument: a bare string is a literal, a map is a nested
/// rule definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgDef {
    Literal(String),
    Nested(PointcutDef),
}

/// An authored rule node: kind name plus arguments.
///
/// Argument arity is deliberately unchecked here: an over-long list must
/// survive into the built tree so that `verify` can report it against the
/// offending node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointcutDef {
    /// Registered kind name (e.g. "enclosing-call-name").
    pub kind: String,

    /// Arguments in declaration order.
    #[serde(default)]
    pub args: Vec<ArgDef>,
}

impl PointcutDef {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            args: Vec::new(),
        }
    }

    /// Builder-style: append a literal argument.
    pub fn with_literal(mut self, value: impl Into<String>) -> Self {
        self.args.push(ArgDef::Literal(value.into()));
        self
    }

    /// Builder-style: append a nested rule argument.
    pub fn with_nested(mut self, nested: PointcutDef) -> Self {
        self.args.push(ArgDef::Nested(nested));
        self
    }

    /// Recursively instantiate this definition through the registry. The
    /// resulting tree is unverified; run `verify` (or wrap it in a
    /// `RuleTree`) before matching.
    pub fn build(
        &self,
        registry: &Registry,
        source: &SourceHandle,
    ) -> Result<Box<dyn Pointcut>, DefinitionError> {
        let mut args = Vec::with_capacity(self.args.len());
        for arg in &self.args {
            args.push(match arg {
                ArgDef::Literal(value) => Arg::Literal(value.clone()),
                ArgDef::Nested(def) => Arg::Pointcut(def.build(registry, source)?),
            });
        }
        Ok(registry.create(&self.kind, source.clone(), args)?)
    }
}

/// A named rule tree in a rule file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleEntry {
    /// Identifier the engine reports matches under.
    pub id: String,

    #[serde(flatten)]
    pub pointcut: PointcutDef,
}

/// Rule file format (for loading from YAML/JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleFile {
    /// File format version.
    #[serde(default)]
    pub version: Option<String>,

    /// Rules defined in this file.
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
}

impl RuleFile {
    pub fn from_yaml_str(content: &str) -> Result<Self, DefinitionError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a rule file, dispatching on extension (`.yaml`/`.yml`/`.json`).
    pub fn from_path(path: &Path) -> Result<Self, DefinitionError> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            Some("json") => Self::from_json_str(&content),
            other => Err(DefinitionError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}
