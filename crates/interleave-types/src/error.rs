//! The shared, fatal error type for both the heuristic engine and the sort
//! converter.
//!
//! No `thiserror` here: the workspace this crate is modeled on represents
//! its error types as plain enums/structs with a hand-written
//! `std::fmt::Display` (see `Span`'s `Display` impl), and this crate
//! follows the same convention rather than pulling in a derive macro for
//! four variants.

use std::fmt;

use crate::ast::ArgId;

/// All errors are fatal: no partial partition or sort is ever returned on
/// any of these paths (§7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeuristicError {
    /// An expression kind the BDD backend rejects outright (map, sequence,
    /// regex operators).
    UnsupportedForBddBackend(&'static str),
    /// A `Record.union` received differently-shaped records, or
    /// `get_field` was applied to a `Flat` result - an AST construction
    /// bug, not a user-facing condition.
    ShapeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// An `Argument` node referenced an id with no entry in the argument
    /// map.
    MissingArgument(ArgId),
    /// A const-map or list was used as a map value during sort conversion.
    UnsupportedSortComposition(&'static str),
}

impl fmt::Display for HeuristicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedForBddBackend(kind) => {
                write!(f, "expression kind `{kind}` is not supported by the BDD backend")
            }
            Self::ShapeMismatch { expected, found } => {
                write!(f, "interleaving result shape mismatch: expected {expected}, found {found}")
            }
            Self::MissingArgument(id) => write!(f, "no binding for argument {}", id.0),
            Self::UnsupportedSortComposition(reason) => {
                write!(f, "unsupported sort composition: {reason}")
            }
        }
    }
}

impl std::error::Error for HeuristicError {}
