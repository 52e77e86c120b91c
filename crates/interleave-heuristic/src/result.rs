//! The interleaving result domain (§3, §4.3).
//!
//! A tagged value describing, for one sub-expression, either the flat set
//! of symbolic variables it mentions, or - for record-typed expressions -
//! one nested result per declared field. The shape of a result is a
//! function only of the type of the expression it describes; `union` is
//! only ever called on two results produced from expressions of the same
//! type, so a shape mismatch there is a programming error, not user input.

use std::rc::Rc;

use indexmap::IndexMap;
use interleave_types::{HeuristicError, SymbolicVar};
use rustc_hash::FxHashSet;

/// The flat variant carries the full `Rc<SymbolicVar>` handle, not just its
/// `VarId` - `couple` (§4.6) needs each variable's type descriptor to
/// decide boolean-only sets and to pair same-typed variables, and the
/// handle is where that type lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterleavingResult {
    Flat(FxHashSet<Rc<SymbolicVar>>),
    /// Field name -> nested result, one entry per declared record field,
    /// in the record's (name-sorted) field order.
    Record(IndexMap<String, InterleavingResult>),
}

impl InterleavingResult {
    #[must_use]
    pub fn empty_flat() -> Self {
        Self::Flat(FxHashSet::default())
    }

    #[must_use]
    pub fn singleton(var: Rc<SymbolicVar>) -> Self {
        let mut set = FxHashSet::default();
        set.insert(var);
        Self::Flat(set)
    }

    fn shape_name(&self) -> &'static str {
        match self {
            Self::Flat(_) => "Flat",
            Self::Record(_) => "Record",
        }
    }

    /// `Flat.union(Flat) = Flat(a ∪ b)`; `Record.union(Record)` requires
    /// identical field-name key sets and unions field-wise. Cross-shape
    /// union fails loudly rather than silently picking a shape (§4.3).
    pub fn union(self, other: Self) -> Result<Self, HeuristicError> {
        match (self, other) {
            (Self::Flat(mut a), Self::Flat(b)) => {
                a.extend(b);
                Ok(Self::Flat(a))
            }
            (Self::Record(mut a), Self::Record(b)) => {
                if a.len() != b.len() || !b.keys().all(|k| a.contains_key(k)) {
                    return Err(HeuristicError::ShapeMismatch {
                        expected: "Record with matching field set",
                        found: "Record with differing field set",
                    });
                }
                for (field, b_value) in b {
                    let a_value = a.shift_remove(&field).expect("checked above");
                    a.insert(field, a_value.union(b_value)?);
                }
                Ok(Self::Record(a))
            }
            (a, b) => Err(HeuristicError::ShapeMismatch {
                expected: a.shape_name(),
                found: b.shape_name(),
            }),
        }
    }

    /// Flattens a (possibly nested) result into the set of all variables it
    /// mentions, unioning every leaf `Flat` set.
    #[must_use]
    pub fn get_all_variables(&self) -> FxHashSet<Rc<SymbolicVar>> {
        match self {
            Self::Flat(vars) => vars.clone(),
            Self::Record(fields) => {
                let mut all = FxHashSet::default();
                for nested in fields.values() {
                    all.extend(nested.get_all_variables());
                }
                all
            }
        }
    }

    /// `Record.get_field` (§4.5): requires `self` to be a `Record`.
    pub fn get_field(&self, name: &str) -> Result<&Self, HeuristicError> {
        match self {
            Self::Record(fields) => fields.get(name).ok_or(HeuristicError::ShapeMismatch {
                expected: "Record containing the requested field",
                found: "Record without that field",
            }),
            Self::Flat(_) => Err(HeuristicError::ShapeMismatch {
                expected: "Record",
                found: "Flat",
            }),
        }
    }

    /// `Record.with_field` (§4.5): rebuilds an immutable record with `name`
    /// replaced, rather than mutating `self` in place (Design Note,
    /// "Mutating immutable records").
    pub fn with_field(&self, name: &str, value: Self) -> Result<Self, HeuristicError> {
        match self {
            Self::Record(fields) => {
                if !fields.contains_key(name) {
                    return Err(HeuristicError::ShapeMismatch {
                        expected: "Record containing the requested field",
                        found: "Record without that field",
                    });
                }
                let mut updated = fields.clone();
                updated.insert(name.to_string(), value);
                Ok(Self::Record(updated))
            }
            Self::Flat(_) => Err(HeuristicError::ShapeMismatch {
                expected: "Record",
                found: "Flat",
            }),
        }
    }
}
