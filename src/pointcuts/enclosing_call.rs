//! Rule kinds over the enclosing call stack

use crate::context::{AnalysisContext, CallRecord};
use crate::diagnostic::{SourceHandle, VerificationError};
use crate::pointcut::{Arg, Pointcut, PointcutCore};
use crate::result::{Candidate, MatchResult};

/// Literal that matches every record, standing in for an absent name
/// constraint in collect mode.
pub const WILDCARD: &str = "*";

/// Evaluate the shared enclosing-call protocol with a projection choosing
/// which field of each record is tested and reported.
///
/// An empty stack is a hard failure for every argument shape: a name cannot
/// match against nothing, and "report what's enclosing" over nothing is a
/// non-match, not an empty success.
fn match_enclosing(
    core: &PointcutCore,
    context: &AnalysisContext,
    project: fn(&CallRecord) -> &str,
) -> MatchResult {
    let calls = context.enclosing_calls();
    if calls.is_empty() {
        return MatchResult::Fail;
    }

    let all = || calls.iter().map(|c| project(c).to_string()).collect();

    match core.first_arg() {
        // Report mode: every value, stack order.
        None => MatchResult::Success(all()),
        Some(Arg::Literal(wanted)) => {
            let hits: Vec<String> = calls
                .iter()
                .map(|c| project(c))
                .filter(|value| wanted == WILDCARD || value == wanted)
                .map(str::to_string)
                .collect();
            if hits.is_empty() {
                MatchResult::Fail
            } else {
                MatchResult::Success(hits)
            }
        }
        // Delegate the full ordered value list; the nested rule's verdict
        // is returned unchanged.
        Some(Arg::Pointcut(nested)) => {
            let values: Vec<String> = all();
            nested.matches(context, &Candidate::Names(&values))
        }
    }
}

/// Tests whether an enclosing call has the given name.
///
/// With a literal argument, collects every matching call name in stack
/// order (duplicates preserved); with no argument, reports all enclosing
/// call names; with a nested rule, hands the full name list down and
/// returns that rule's result.
#[derive(Debug)]
pub struct EnclosingCallName {
    core: PointcutCore,
}

impl EnclosingCallName {
    pub const KIND: &'static str = "enclosing-call-name";

    pub fn new(source: SourceHandle) -> Self {
        Self::from_core(PointcutCore::new(Self::KIND, source))
    }

    pub fn from_core(core: PointcutCore) -> Self {
        Self { core }
    }

    pub fn with_arg(mut self, arg: Arg) -> Self {
        self.core.push_arg(arg);
        self
    }
}

impl Pointcut for EnclosingCallName {
    fn name(&self) -> &str {
        self.core.name()
    }

    fn source(&self) -> &SourceHandle {
        self.core.source()
    }

    fn args(&self) -> &[Arg] {
        self.core.args()
    }

    fn matches(&self, context: &AnalysisContext, _candidate: &Candidate<'_>) -> MatchResult {
        match_enclosing(&self.core, context, CallRecord::name)
    }

    fn verify(&self) -> Result<(), VerificationError> {
        self.core.one_or_no_args()?;
        self.core.verify_nested()
    }
}

/// Tests the inferred type each enclosing call was resolved against, with
/// the same protocol as [`EnclosingCallName`].
#[derive(Debug)]
pub struct EnclosingCallDeclaringType {
    core: PointcutCore,
}

impl EnclosingCallDeclaringType {
    pub const KIND: &'static str = "enclosing-call-declaring-type";

    pub fn new(source: SourceHandle) -> Self {
        Self::from_core(PointcutCore::new(Self::KIND, source))
    }

    pub fn from_core(core: PointcutCore) -> Self {
        Self { core }
    }

    pub fn with_arg(mut self, arg: Arg) -> Self {
        self.core.push_arg(arg);
        self
    }
}

impl Pointcut for EnclosingCallDeclaringType {
    fn name(&self) -> &str {
        self.core.name()
    }

    fn source(&self) -> &SourceHandle {
        self.core.source()
    }

    fn args(&self) -> &[Arg] {
        self.core.args()
    }

    fn matches(&self, context: &AnalysisContext, _candidate: &Candidate<'_>) -> MatchResult {
        match_enclosing(&self.core, context, |c| c.inferred_type().as_str())
    }

    fn verify(&self) -> Result<(), VerificationError> {
        self.core.one_or_no_args()?;
        self.core.verify_nested()
    }
}
