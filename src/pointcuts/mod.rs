//! Built-in rule kinds
//!
//! Two families: the enclosing-call kinds query the context's call stack;
//! the candidate kinds filter name lists handed down by an outer rule, which
//! is what nested-rule delegation produces. All follow the same
//! `matches`/`verify` contract.

pub mod candidate;
pub mod enclosing_call;

pub use candidate::{NameEquals, NameRegex};
pub use enclosing_call::{EnclosingCallDeclaringType, EnclosingCallName, WILDCARD};
