//! Analysis context: the facts a rule is evaluated against
//!
//! The context is a snapshot built by the external analysis driver before
//! each evaluation round. Rule nodes only read from it; all mutation happens
//! between `matches` calls, on the driver's side.

use crate::diagnostic::SourceHandle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to an inferred type.
///
/// The engine never interprets the handle beyond equality and display; what
/// it denotes (a fully qualified name, an interned id) is the driver's
/// business.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeHandle(String);

impl TypeHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeHandle {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TypeHandle {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// One enclosing method-call site: the called name and the inferred type it
/// was resolved against. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    name: String,
    inferred_type: TypeHandle,
}

impl CallRecord {
    pub fn new(name: impl Into<String>, inferred_type: impl Into<TypeHandle>) -> Self {
        Self {
            name: name.into(),
            inferred_type: inferred_type.into(),
        }
    }

    /// The called method name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The inferred type the call was resolved against.
    pub fn inferred_type(&self) -> &TypeHandle {
        &self.inferred_type
    }
}

/// Scope facts for the current analysis position.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScopeInfo {
    enclosing_calls: Vec<CallRecord>,
}

impl ScopeInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// The enclosing call stack, outermost-first.
    ///
    /// `enclosing_calls()[0]` is the outermost call site; the last element
    /// is the call immediately surrounding the analysis position. An empty
    /// slice means "no enclosing call" and is a valid state, not an error.
    pub fn enclosing_calls(&self) -> &[CallRecord] {
        &self.enclosing_calls
    }

    /// Append a call site one level further in than the current innermost.
    pub fn push_call(&mut self, record: CallRecord) {
        self.enclosing_calls.push(record);
    }

    /// Replace the whole stack (outermost-first).
    pub fn set_enclosing_calls(&mut self, records: Vec<CallRecord>) {
        self.enclosing_calls = records;
    }

    pub fn clear_calls(&mut self) {
        self.enclosing_calls.clear();
    }
}

/// The context rule nodes are evaluated against.
///
/// Owned by the analysis driver, borrowed immutably for the duration of one
/// `matches` invocation. One snapshot per analysis request; never shared
/// mutably across threads.
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    scope: ScopeInfo,
    container: SourceHandle,
}

impl AnalysisContext {
    /// Create an empty context for the given container (the resource being
    /// analyzed, used for diagnostics only).
    pub fn new(container: SourceHandle) -> Self {
        Self {
            scope: ScopeInfo::new(),
            container,
        }
    }

    /// Builder-style: append an enclosing call (outermost pushed first).
    pub fn with_call(mut self, record: CallRecord) -> Self {
        self.scope.push_call(record);
        self
    }

    /// The enclosing call stack, outermost-first. See
    /// [`ScopeInfo::enclosing_calls`].
    pub fn enclosing_calls(&self) -> &[CallRecord] {
        self.scope.enclosing_calls()
    }

    pub fn scope(&self) -> &ScopeInfo {
        &self.scope
    }

    /// Driver-side access for refreshing the snapshot between evaluations.
    pub fn scope_mut(&mut self) -> &mut ScopeInfo {
        &mut self.scope
    }

    /// The resource this context was built for.
    pub fn container(&self) -> &SourceHandle {
        &self.container
    }
}
