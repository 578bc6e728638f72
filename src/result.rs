//! Match result protocol shared by every rule node
//!
//! A rule answers with `Fail` or `Success(values)`. `Success` with an empty
//! value list is a distinct, valid outcome: the condition holds but yields
//! no enumerable bindings. Callers must never collapse the two.

use serde::Serialize;

/// Outcome of evaluating a rule node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchResult {
    /// The condition does not hold here. Ordinary and unexceptional.
    Fail,
    /// The condition holds; the ordered values it bound (possibly none).
    Success(Vec<String>),
}

impl MatchResult {
    /// A match that binds no values ("true with no data").
    pub fn empty() -> Self {
        MatchResult::Success(Vec::new())
    }

    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Success(_))
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, MatchResult::Fail)
    }

    /// The bound values, or `None` on failure. `Some(&[])` is a real match.
    pub fn values(&self) -> Option<&[String]> {
        match self {
            MatchResult::Fail => None,
            MatchResult::Success(values) => Some(values),
        }
    }

    /// Consume the result, yielding the bound values on success.
    pub fn into_values(self) -> Option<Vec<String>> {
        match self {
            MatchResult::Fail => None,
            MatchResult::Success(values) => Some(values),
        }
    }
}

/// The subject a rule node is asked about.
///
/// Interpretation is rule-kind specific: context-querying kinds ignore it,
/// candidate-filtering kinds read it, and outer rules hand `Names` to nested
/// rules when delegating.
#[derive(Debug, Clone, Copy, Default)]
pub enum Candidate<'a> {
    /// No particular subject; the rule consults the context alone.
    #[default]
    None,
    /// A single name under test.
    Name(&'a str),
    /// An ordered list of names produced by an enclosing rule.
    Names(&'a [String]),
}

impl<'a> Candidate<'a> {
    /// The delegated name list, if this candidate carries one.
    pub fn names(&self) -> &[String] {
        match self {
            Candidate::Names(names) => names,
            _ => &[],
        }
    }
}
