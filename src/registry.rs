//! Rule-kind registry
//!
//! The authoring layer constructs nodes by kind name; the registry maps
//! those names to constructors. Hosts can register their own kinds next to
//! the built-in set.

use crate::diagnostic::SourceHandle;
use crate::pointcut::{Arg, Pointcut, PointcutCore};
use crate::pointcuts::{EnclosingCallDeclaringType, EnclosingCallName, NameEquals, NameRegex};
use std::collections::HashMap;
use thiserror::Error;

/// Builds a concrete rule node from its shared core.
pub type Constructor = fn(PointcutCore) -> Box<dyn Pointcut>;

/// Error resolving a rule kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("unknown rule kind '{0}'")]
    UnknownKind(String),
}

/// Table of available rule kinds.
#[derive(Debug, Clone)]
pub struct Registry {
    kinds: HashMap<String, Constructor>,
}

impl Registry {
    /// A registry with no kinds at all.
    pub fn empty() -> Self {
        Self {
            kinds: HashMap::new(),
        }
    }

    /// The built-in kinds.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(EnclosingCallName::KIND, |core| {
            Box::new(EnclosingCallName::from_core(core))
        });
        registry.register(EnclosingCallDeclaringType::KIND, |core| {
            Box::new(EnclosingCallDeclaringType::from_core(core))
        });
        registry.register(NameEquals::KIND, |core| {
            Box::new(NameEquals::from_core(core))
        });
        registry.register(NameRegex::KIND, |core| Box::new(NameRegex::from_core(core)));
        registry
    }

    /// Register a kind, replacing any previous constructor for the name.
    pub fn register(&mut self, kind: &str, constructor: Constructor) {
        self.kinds.insert(kind.to_string(), constructor);
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.kinds.contains_key(kind)
    }

    /// Registered kind names, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.kinds.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Construct a node of the given kind. The node's diagnostic name is
    /// the kind name; its arguments are stored as authored, to be checked
    /// by `verify`, not here.
    pub fn create(
        &self,
        kind: &str,
        source: SourceHandle,
        args: Vec<Arg>,
    ) -> Result<Box<dyn Pointcut>, RegistryError> {
        let constructor = self
            .kinds
            .get(kind)
            .ok_or_else(|| RegistryError::UnknownKind(kind.to_string()))?;

        let mut core = PointcutCore::new(kind, source);
        for arg in args {
            core.push_arg(arg);
        }
        Ok(constructor(core))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{AnalysisContext, CallRecord};
    use crate::result::{Candidate, MatchResult};

    #[test]
    fn test_builtin_kinds_present() {
        let registry = Registry::builtin();
        assert_eq!(
            registry.kinds(),
            vec![
                "enclosing-call-declaring-type",
                "enclosing-call-name",
                "name",
                "name-regex",
            ]
        );
    }

    #[test]
    fn test_unknown_kind_errors() {
        let registry = Registry::builtin();
        let err = registry
            .create("no-such-kind", SourceHandle::unknown(), Vec::new())
            .unwrap_err();
        assert_eq!(err, RegistryError::UnknownKind("no-such-kind".to_string()));
        assert_eq!(format!("{}", err), "unknown rule kind 'no-such-kind'");
    }

    #[test]
    fn test_created_node_carries_kind_and_args() {
        let registry = Registry::builtin();
        let node = registry
            .create(
                "enclosing-call-name",
                SourceHandle::new("r.yaml"),
                vec![Arg::literal("foo")],
            )
            .unwrap();

        assert_eq!(node.name(), "enclosing-call-name");
        assert_eq!(node.source(), &SourceHandle::new("r.yaml"));
        assert_eq!(node.args().len(), 1);

        let ctx =
            AnalysisContext::new(SourceHandle::unknown()).with_call(CallRecord::new("foo", "T"));
        assert_eq!(
            node.matches(&ctx, &Candidate::None),
            MatchResult::Success(vec!["foo".into()])
        );
    }

    #[test]
    fn test_host_defined_kind() {
        use crate::diagnostic::VerificationError;

        // A kind that matches whenever the stack is non-empty, binding
        // nothing: exercises the success-with-no-values outcome.
        #[derive(Debug)]
        struct InsideAnyCall(PointcutCore);

        impl Pointcut for InsideAnyCall {
            fn name(&self) -> &str {
                self.0.name()
            }
            fn source(&self) -> &SourceHandle {
                self.0.source()
            }
            fn args(&self) -> &[Arg] {
                self.0.args()
            }
            fn matches(&self, ctx: &AnalysisContext, _: &Candidate<'_>) -> MatchResult {
                if ctx.enclosing_calls().is_empty() {
                    MatchResult::Fail
                } else {
                    MatchResult::empty()
                }
            }
            fn verify(&self) -> Result<(), VerificationError> {
                self.0.one_or_no_args()
            }
        }

        let mut registry = Registry::empty();
        registry.register("inside-any-call", |core| Box::new(InsideAnyCall(core)));

        let node = registry
            .create("inside-any-call", SourceHandle::unknown(), Vec::new())
            .unwrap();

        let empty = AnalysisContext::new(SourceHandle::unknown());
        assert_eq!(node.matches(&empty, &Candidate::None), MatchResult::Fail);

        let ctx =
            AnalysisContext::new(SourceHandle::unknown()).with_call(CallRecord::new("f", "T"));
        assert_eq!(node.matches(&ctx, &Candidate::None), MatchResult::empty());
    }
}
