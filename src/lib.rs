//! Matchpoint - composable structural rule matching for code analysis
//!
//! A small engine for deciding, at analysis time, whether the current
//! position in a program's call structure satisfies a named condition
//! ("pointcut"). Rules are trees of nodes; each node tests one structural
//! property and may hold a literal argument or delegate to a nested rule.
//! Evaluation runs against a context snapshot (the enclosing call stack
//! with inferred types) and answers with an ordered list of bound values or
//! a definite non-match - never an exception for "doesn't apply here".
//!
//! # Architecture
//!
//! ```text
//! rule file (YAML/JSON) -> Registry -> Pointcut tree -> RuleTree (verified)
//!                                                           |
//! analysis driver: AnalysisContext + Candidate  ->  Engine.evaluate
//!                                                           |
//!                                                      MatchResult
//! ```
//!
//! Verification runs once, at load time; a tree that fails it is rejected
//! with a diagnostic naming the offending node and its declaration site,
//! and never reaches matching. Verified trees are stateless and safe to
//! share across concurrent analysis requests, one context snapshot per
//! request.
//!
//! # Example
//!
//! ```
//! use matchpoint::{
//!     AnalysisContext, Arg, CallRecord, Candidate, EnclosingCallName, RuleTree, SourceHandle,
//! };
//!
//! let rule = EnclosingCallName::new(SourceHandle::new("rules.yaml"))
//!     .with_arg(Arg::literal("sources"));
//! let tree = RuleTree::compile(Box::new(rule)).unwrap();
//!
//! let ctx = AnalysisContext::new(SourceHandle::new("build.gradle"))
//!     .with_call(CallRecord::new("sources", "ScriptScope"));
//!
//! assert!(tree.matches(&ctx, &Candidate::None).is_match());
//! ```

pub mod context;
pub mod definition;
pub mod diagnostic;
pub mod engine;
pub mod pointcut;
pub mod pointcuts;
pub mod registry;
pub mod result;

// Re-export main types
pub use context::{AnalysisContext, CallRecord, ScopeInfo, TypeHandle};
pub use definition::{ArgDef, DefinitionError, PointcutDef, RuleEntry, RuleFile};
pub use diagnostic::{SourceHandle, VerificationError};
pub use engine::{Engine, EvalResult, LoadError, MatchOutcome, RuleTree};
pub use pointcut::{Arg, Pointcut, PointcutCore};
pub use pointcuts::{
    EnclosingCallDeclaringType, EnclosingCallName, NameEquals, NameRegex, WILDCARD,
};
pub use registry::{Registry, RegistryError};
pub use result::{Candidate, MatchResult};
