//! Rule kinds over the candidate under test
//!
//! These are the natural payloads of nested-rule delegation: an outer rule
//! computes a name list and hands it down, and one of these decides. Both
//! also accept a single-name candidate, so they work at the root of a tree
//! when the driver supplies the current subject's name directly.

use crate::context::AnalysisContext;
use crate::diagnostic::{SourceHandle, VerificationError};
use crate::pointcut::{Arg, Pointcut, PointcutCore};
use crate::result::{Candidate, MatchResult};
use regex::Regex;

fn collect_matching(candidate: &Candidate<'_>, accept: impl Fn(&str) -> bool) -> MatchResult {
    let hits: Vec<String> = match candidate {
        Candidate::None => return MatchResult::Fail,
        Candidate::Name(name) => std::iter::once(*name)
            .filter(|n| accept(n))
            .map(str::to_string)
            .collect(),
        Candidate::Names(names) => names
            .iter()
            .filter(|n| accept(n))
            .map(String::clone)
            .collect(),
    };
    if hits.is_empty() {
        MatchResult::Fail
    } else {
        MatchResult::Success(hits)
    }
}

/// Keeps the candidate names equal to the literal argument.
///
/// Order and duplicates of the incoming list are preserved in the result.
#[derive(Debug)]
pub struct NameEquals {
    core: PointcutCore,
}

impl NameEquals {
    pub const KIND: &'static str = "name";

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

impl Pointcut for NameEquals {
    fn name(&self) -> &str {
        self.core.name()
    }

    fn source(&self) -> &SourceHandle {
        self.core.source()
    }

    fn args(&self) -> &[Arg] {
        self.core.args()
    }

    fn matches(&self, _context: &AnalysisContext, candidate: &Candidate<'_>) -> MatchResult {
        let wanted = match self.core.first_arg().and_then(Arg::as_literal) {
            Some(value) => value,
            None => return MatchResult::Fail,
        };
        collect_matching(candidate, |name| name == wanted)
    }

    fn verify(&self) -> Result<(), VerificationError> {
        self.core.exactly_one_literal().map(|_| ())
    }
}

/// Keeps the candidate names matching the regex argument.
///
/// The pattern is validated by `verify`; evaluation compiles it on the fly
/// and treats a pattern that will not compile as a plain non-match, since a
/// verified tree can never reach that state.
#[derive(Debug)]
pub struct NameRegex {
    core: PointcutCore,
}

impl NameRegex {
    pub const KIND: &'static str = "name-regex";

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

impl Pointcut for NameRegex {
    fn name(&self) -> &str {
        self.core.name()
    }

    fn source(&self) -> &SourceHandle {
        self.core.source()
    }

    fn args(&self) -> &[Arg] {
        self.core.args()
    }

    fn matches(&self, _context: &AnalysisContext, candidate: &Candidate<'_>) -> MatchResult {
        let pattern = match self.core.first_arg().and_then(Arg::as_literal) {
            Some(value) => value,
            None => return MatchResult::Fail,
        };
        let re = match Regex::new(pattern) {
            Ok(re) => re,
            Err(_) => return MatchResult::Fail,
        };
        collect_matching(candidate, |name| re.is_match(name))
    }

    fn verify(&self) -> Result<(), VerificationError> {
        let pattern = self.core.exactly_one_literal()?;
        Regex::new(pattern).map(|_| ()).map_err(|e| {
            VerificationError::new(
                format!("invalid regex pattern '{}': {}", pattern, e),
                self.core.name(),
                self.core.source().clone(),
            )
        })
    }
}
