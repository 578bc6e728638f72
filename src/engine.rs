//! Evaluation engine: verified rule trees and driver-facing batch matching

use crate::context::AnalysisContext;
use crate::definition::{DefinitionError, RuleFile};
use crate::diagnostic::{SourceHandle, VerificationError};
use crate::pointcut::Pointcut;
use crate::registry::Registry;
use crate::result::{Candidate, MatchResult};
use log::debug;
use serde::Serialize;
use thiserror::Error;

/// Error loading rules into the engine.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Verification(#[from] VerificationError),
}

/// A rule tree that passed verification and may be matched.
///
/// `compile` is the only way in, so a `RuleTree` in hand is the proof that
/// the pre-flight pass ran. Trees are immutable configuration from here on
/// and safe to share across analysis threads.
#[derive(Debug)]
pub struct RuleTree {
    root: Box<dyn Pointcut>,
}

impl RuleTree {
    /// Verify the tree; on success, wrap it for matching. The first
    /// violation found anywhere in the tree aborts with that node's
    /// diagnostic.
    pub fn compile(root: Box<dyn Pointcut>) -> Result<Self, VerificationError> {
        root.verify()?;
        Ok(Self { root })
    }

    pub fn matches(&self, context: &AnalysisContext, candidate: &Candidate<'_>) -> MatchResult {
        self.root.matches(context, candidate)
    }

    pub fn root(&self) -> &dyn Pointcut {
        self.root.as_ref()
    }
}

/// One rule's outcome in a batch evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct MatchOutcome {
    /// Rule identifier.
    pub id: String,
    /// The rule's result, untouched.
    pub result: MatchResult,
}

/// Result of evaluating every registered rule against one context.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EvalResult {
    /// Per-rule outcomes, in registration order.
    pub outcomes: Vec<MatchOutcome>,
}

impl EvalResult {
    /// Outcomes that matched (including matches with no bound values).
    pub fn matched(&self) -> impl Iterator<Item = &MatchOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_match())
    }

    pub fn matched_count(&self) -> usize {
        self.matched().count()
    }

    /// A specific rule's result, if the rule exists.
    pub fn get(&self, id: &str) -> Option<&MatchResult> {
        self.outcomes
            .iter()
            .find(|o| o.id == id)
            .map(|o| &o.result)
    }
}

/// A set of named, verified rule trees evaluated together.
///
/// Mirrors how an analysis driver consumes the engine: load rules once at
/// startup (verification failures surface then, never mid-match), then
/// evaluate all of them per analysis position.
#[derive(Debug, Default)]
pub struct Engine {
    rules: Vec<(String, RuleTree)>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of loaded rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule identifiers in registration order.
    pub fn rule_ids(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|(id, _)| id.as_str())
    }

    /// Verify and register a single rule tree.
    pub fn add_rule(
        &mut self,
        id: impl Into<String>,
        root: Box<dyn Pointcut>,
    ) -> Result<(), VerificationError> {
        let id = id.into();
        let tree = RuleTree::compile(root)?;
        debug!("registered rule '{}'", id);
        self.rules.push((id, tree));
        Ok(())
    }

    /// Build, verify, and register every rule in a file. All-or-nothing:
    /// the first definition or verification failure aborts the load and
    /// leaves the engine unchanged.
    pub fn load_rules(
        &mut self,
        file: &RuleFile,
        registry: &Registry,
        source: &SourceHandle,
    ) -> Result<usize, LoadError> {
        let mut loaded = Vec::with_capacity(file.rules.len());
        for entry in &file.rules {
            let root = entry.pointcut.build(registry, source)?;
            let tree = RuleTree::compile(root)?;
            loaded.push((entry.id.clone(), tree));
        }

        let count = loaded.len();
        debug!("loaded {} rules from {}", count, source);
        self.rules.extend(loaded);
        Ok(count)
    }

    /// Evaluate every rule against the context and candidate.
    pub fn evaluate(&self, context: &AnalysisContext, candidate: &Candidate<'_>) -> EvalResult {
        let mut outcomes = Vec::with_capacity(self.rules.len());
        for (id, tree) in &self.rules {
            let result = tree.matches(context, candidate);
            if let MatchResult::Success(values) = &result {
                debug!("rule '{}' matched with {} values", id, values.len());
            }
            outcomes.push(MatchOutcome {
                id: id.clone(),
                result,
            });
        }
        EvalResult { outcomes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CallRecord;
    use crate::pointcut::Arg;
    use crate::pointcuts::{EnclosingCallName, NameEquals};

    fn ctx(names: &[&str]) -> AnalysisContext {
        let mut ctx = AnalysisContext::new(SourceHandle::unknown());
        for name in names {
            ctx.scope_mut().push_call(CallRecord::new(*name, "T"));
        }
        ctx
    }

    #[test]
    fn test_rule_tree_rejects_invalid_roots() {
        let bad = EnclosingCallName::new(SourceHandle::new("r.yaml"))
            .with_arg(Arg::literal("a"))
            .with_arg(Arg::literal("b"));

        let err = RuleTree::compile(Box::new(bad)).unwrap_err();
        assert_eq!(err.node, EnclosingCallName::KIND);
    }

    #[test]
    fn test_rule_tree_rejects_invalid_nested_node() {
        let bad_nested = NameEquals::new(SourceHandle::new("deep.yaml"));
        let root = EnclosingCallName::new(SourceHandle::unknown())
            .with_arg(Arg::Pointcut(Box::new(bad_nested)));

        let err = RuleTree::compile(Box::new(root)).unwrap_err();
        assert_eq!(err.node, NameEquals::KIND);
        assert_eq!(err.declared_in, SourceHandle::new("deep.yaml"));
    }

    #[test]
    fn test_evaluate_reports_every_rule_in_order() {
        let mut engine = Engine::new();
        engine
            .add_rule(
                "in-foo",
                Box::new(
                    EnclosingCallName::new(SourceHandle::unknown()).with_arg(Arg::literal("foo")),
                ),
            )
            .unwrap();
        engine
            .add_rule(
                "in-bar",
                Box::new(
                    EnclosingCallName::new(SourceHandle::unknown()).with_arg(Arg::literal("bar")),
                ),
            )
            .unwrap();

        let result = engine.evaluate(&ctx(&["foo", "foo"]), &Candidate::None);
        let ids: Vec<&str> = result.outcomes.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["in-foo", "in-bar"]);

        assert_eq!(result.matched_count(), 1);
        assert_eq!(
            result.get("in-foo"),
            Some(&MatchResult::Success(vec!["foo".into(), "foo".into()]))
        );
        assert_eq!(result.get("in-bar"), Some(&MatchResult::Fail));
        assert_eq!(result.get("missing"), None);
    }

    #[test]
    fn test_load_rules_from_file() {
        let file = RuleFile::from_yaml_str(
            r#"
rules:
  - id: inside-sources
    kind: enclosing-call-name
    args: [sources]
  - id: inside-task-like
    kind: enclosing-call-name
    args:
      - kind: name-regex
        args: ["^task"]
"#,
        )
        .unwrap();

        let mut engine = Engine::new();
        let count = engine
            .load_rules(&file, &Registry::builtin(), &SourceHandle::new("g.yaml"))
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(engine.len(), 2);

        let result = engine.evaluate(&ctx(&["taskA", "sources"]), &Candidate::None);
        assert_eq!(result.matched_count(), 2);
    }

    #[test]
    fn test_load_aborts_on_first_bad_rule_and_leaves_engine_unchanged() {
        // Second rule's nested node has a bad regex: verification fails,
        // nothing from the file may land in the engine.
        let file = RuleFile::from_yaml_str(
            r#"
rules:
  - id: fine
    kind: enclosing-call-name
  - id: broken
    kind: enclosing-call-name
    args:
      - kind: name-regex
        args: ["(["]
  - id: also-fine
    kind: name
    args: [x]
"#,
        )
        .unwrap();

        let mut engine = Engine::new();
        let err = engine
            .load_rules(&file, &Registry::builtin(), &SourceHandle::unknown())
            .unwrap_err();

        match err {
            LoadError::Verification(v) => assert_eq!(v.node, "name-regex"),
            other => panic!("expected a verification error, got {:?}", other),
        }
        assert!(engine.is_empty());
    }

    #[test]
    fn test_load_aborts_on_unknown_kind() {
        let file = RuleFile::from_yaml_str(
            r#"
rules:
  - id: r
    kind: not-a-kind
"#,
        )
        .unwrap();

        let mut engine = Engine::new();
        let err = engine
            .load_rules(&file, &Registry::builtin(), &SourceHandle::unknown())
            .unwrap_err();
        assert!(matches!(err, LoadError::Definition(_)));
        assert!(engine.is_empty());
    }

    #[test]
    fn test_engine_and_trees_are_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
        assert_send_sync::<RuleTree>();
    }

    #[test]
    fn test_success_with_no_values_counts_as_matched() {
        // NameEquals at the root with a Name candidate that hits: a match
        // carrying one value; with Candidate::None it must fail, not
        // succeed emptily.
        let mut engine = Engine::new();
        engine
            .add_rule(
                "subject-is-run",
                Box::new(NameEquals::new(SourceHandle::unknown()).with_arg(Arg::literal("run"))),
            )
            .unwrap();

        let context = ctx(&[]);
        let hit = engine.evaluate(&context, &Candidate::Name("run"));
        assert_eq!(hit.matched_count(), 1);

        let miss = engine.evaluate(&context, &Candidate::None);
        assert_eq!(miss.matched_count(), 0);
    }
}
