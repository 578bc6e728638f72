//! The rule-node contract: `Pointcut`, its arguments, and shared plumbing
//!
//! A pointcut tests one structural condition against an analysis context.
//! Concrete kinds implement the same two-operation contract (`matches` for
//! evaluation, `verify` for pre-flight argument checking) and compose
//! through nested-rule arguments rather than inheritance.

use crate::context::AnalysisContext;
use crate::diagnostic::{SourceHandle, VerificationError};
use crate::result::{Candidate, MatchResult};
use std::fmt;

/// One authored argument of a rule node.
///
/// A node with no arguments simply has an empty argument list; that absence
/// is itself meaningful to most kinds (see the enclosing-call family's
/// report-all mode).
#[derive(Debug)]
pub enum Arg {
    /// A literal string value.
    Literal(String),
    /// A nested rule, evaluated against values produced by the outer rule.
    Pointcut(Box<dyn Pointcut>),
}

impl Arg {
    pub fn literal(value: impl Into<String>) -> Self {
        Arg::Literal(value.into())
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Arg::Literal(value) => Some(value),
            Arg::Pointcut(_) => None,
        }
    }
}

/// A composable unit testing one structural condition.
///
/// Implementations are stateless after construction: `matches` must be
/// side-effect free, and any per-evaluation data travels in the context or
/// the candidate. Verified trees are therefore safe to share across
/// concurrent analysis requests.
pub trait Pointcut: fmt::Debug + Send + Sync {
    /// Kind name, used in diagnostics and registry lookups.
    fn name(&self) -> &str;

    /// Where this node was declared.
    fn source(&self) -> &SourceHandle;

    /// Raw authored arguments, in declaration order.
    fn args(&self) -> &[Arg];

    /// Evaluate this rule against the context and candidate.
    ///
    /// "Does not apply here" is `MatchResult::Fail`, never an error; the
    /// error channel is reserved for malformed configuration, which
    /// [`verify`](Pointcut::verify) catches before matching ever runs.
    fn matches(&self, context: &AnalysisContext, candidate: &Candidate<'_>) -> MatchResult;

    /// Check this node's arguments against the kind's declared shape,
    /// recursing into nested rules. Idempotent; must pass before the node
    /// is used for matching.
    fn verify(&self) -> Result<(), VerificationError>;
}

/// Shared identity and argument storage for rule nodes.
///
/// Concrete kinds embed one of these and delegate the identity accessors to
/// it; the arity helpers below are the checks the built-in kinds share.
#[derive(Debug)]
pub struct PointcutCore {
    name: String,
    source: SourceHandle,
    args: Vec<Arg>,
}

impl PointcutCore {
    pub fn new(name: impl Into<String>, source: SourceHandle) -> Self {
        Self {
            name: name.into(),
            source,
            args: Vec::new(),
        }
    }

    /// Builder-style: append an authored argument.
    pub fn with_arg(mut self, arg: Arg) -> Self {
        self.args.push(arg);
        self
    }

    pub fn push_arg(&mut self, arg: Arg) {
        self.args.push(arg);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &SourceHandle {
        &self.source
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// The first argument, if any. Kinds that declare at most one argument
    /// read it through this after verification has passed.
    pub fn first_arg(&self) -> Option<&Arg> {
        self.args.first()
    }

    fn error(&self, message: impl Into<String>) -> VerificationError {
        VerificationError::new(message, &self.name, self.source.clone())
    }

    /// Arity check: zero or one argument of any shape.
    pub fn one_or_no_args(&self) -> Result<(), VerificationError> {
        if self.args.len() > 1 {
            return Err(self.error(format!(
                "expecting one or no arguments, found {}",
                self.args.len()
            )));
        }
        Ok(())
    }

    /// Arity check: exactly one literal argument; returns its value.
    pub fn exactly_one_literal(&self) -> Result<&str, VerificationError> {
        if self.args.len() != 1 {
            return Err(self.error(format!(
                "expecting exactly one argument, found {}",
                self.args.len()
            )));
        }
        self.args[0]
            .as_literal()
            .ok_or_else(|| self.error("expecting a literal argument, found a nested rule"))
    }

    /// Recursively verify every nested-rule argument. First failure wins.
    pub fn verify_nested(&self) -> Result<(), VerificationError> {
        for arg in &self.args {
            if let Arg::Pointcut(nested) = arg {
                nested.verify()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointcuts::EnclosingCallName;

    fn core(args: Vec<Arg>) -> PointcutCore {
        let mut core = PointcutCore::new("test-kind", SourceHandle::unknown());
        for arg in args {
            core.push_arg(arg);
        }
        core
    }

    #[test]
    fn test_one_or_no_args() {
        assert!(core(vec![]).one_or_no_args().is_ok());
        assert!(core(vec![Arg::literal("x")]).one_or_no_args().is_ok());

        let err = core(vec![Arg::literal("x"), Arg::literal("y")])
            .one_or_no_args()
            .unwrap_err();
        assert_eq!(err.node, "test-kind");
        assert!(err.message.contains("found 2"));
    }

    #[test]
    fn test_exactly_one_literal() {
        assert_eq!(
            core(vec![Arg::literal("x")]).exactly_one_literal().unwrap(),
            "x"
        );
        assert!(core(vec![]).exactly_one_literal().is_err());

        let nested = EnclosingCallName::new(SourceHandle::unknown());
        let err = core(vec![Arg::Pointcut(Box::new(nested))])
            .exactly_one_literal()
            .unwrap_err();
        assert!(err.message.contains("nested rule"));
    }

    #[test]
    fn test_verify_nested_reports_inner_node() {
        // Inner node has two arguments: invalid. The outer check must
        // surface the inner node's identity.
        let bad_inner = EnclosingCallName::new(SourceHandle::new("inner.yaml"))
            .with_arg(Arg::literal("a"))
            .with_arg(Arg::literal("b"));
        let outer = core(vec![Arg::Pointcut(Box::new(bad_inner))]);

        let err = outer.verify_nested().unwrap_err();
        assert_eq!(err.node, "enclosing-call-name");
        assert_eq!(err.declared_in, SourceHandle::new("inner.yaml"));
    }

    #[test]
    fn test_arg_literal_accessor() {
        assert_eq!(Arg::literal("v").as_literal(), Some("v"));
        let nested = Arg::Pointcut(Box::new(EnclosingCallName::new(SourceHandle::unknown())));
        assert_eq!(nested.as_literal(), None);
    }
}
