//! Symbolic-variable identity.
//!
//! A symbolic variable (an "arbitrary") is an opaque, referentially-unique
//! handle. It carries its own type descriptor so the heuristic never needs
//! a side table to recover it, and an id used only for equality/hashing:
//! two handles are equal iff they are the same handle, never by comparing
//! type descriptors structurally.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::descriptor::TypeDescriptor;

/// The identifier half of a symbolic variable's identity. `Copy` so it can
/// be used freely as a map/set key without cloning the handle.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct VarId(u64);

impl fmt::Debug for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VarId({})", self.0)
    }
}

/// A symbolic variable: an id plus the type it was declared with.
///
/// Allocated exclusively by `SymbolicVarFactory::fresh`, which is the only
/// thing permitted to mint a `VarId` - this is what makes two handles with
/// the same type descriptor still distinct variables.
pub struct SymbolicVar {
    id: VarId,
    ty: TypeDescriptor,
}

impl SymbolicVar {
    #[must_use]
    pub fn id(&self) -> VarId {
        self.id
    }

    #[must_use]
    pub fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }
}

impl PartialEq for SymbolicVar {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for SymbolicVar {}

impl Hash for SymbolicVar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for SymbolicVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolicVar")
            .field("id", &self.id)
            .field("ty", &self.ty)
            .finish()
    }
}

/// Mints fresh `SymbolicVar` handles with monotonically increasing ids.
///
/// Mirrors the arena-allocate-and-index pattern used throughout the checker
/// (`SymbolArena`, `FlowNodeArena`): callers hold the factory for the
/// lifetime of whatever is building an AST, not for the lifetime of a
/// single `compute()` call.
#[derive(Default)]
pub struct SymbolicVarFactory {
    next: std::cell::Cell<u64>,
}

impl SymbolicVarFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a brand-new, referentially-unique symbolic variable of the
    /// given type.
    pub fn fresh(&self, ty: TypeDescriptor) -> Rc<SymbolicVar> {
        let id = self.next.get();
        self.next.set(id + 1);
        tracing::trace!(var_id = id, "minted fresh symbolic variable");
        Rc::new(SymbolicVar { id: VarId(id), ty })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_variables_are_never_equal_even_with_same_type() {
        let factory = SymbolicVarFactory::new();
        let a = factory.fresh(TypeDescriptor::Int);
        let b = factory.fresh(TypeDescriptor::Int);
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
    }

    #[test]
    fn same_handle_is_equal_to_itself() {
        let factory = SymbolicVarFactory::new();
        let a = factory.fresh(TypeDescriptor::Bool);
        assert_eq!(a, a);
        assert_eq!(a.id(), a.id());
    }
}
