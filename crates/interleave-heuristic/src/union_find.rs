//! Union-find over symbolic-variable identities.
//!
//! Grounded directly in the workspace's `ena` dependency rather than a
//! hand-rolled disjoint-set forest: `ena::unify::InPlaceUnificationTable`
//! already gives path compression and union-by-rank for the trivial
//! (value-less) union-find case. The one thing it doesn't speak is our
//! opaque `VarId` keys, so - per the design note "Union-find over
//! heterogeneous keys... use an index-indirection table" - we keep a
//! parallel `IndexMap<VarId, VarToken>` (insertion-order preserving, from
//! the workspace's `indexmap` dependency) plus its reverse, and that pair
//! is what makes `get_disjoint_sets` able to report groups of `VarId`
//! rather than of `ena`'s internal tokens.

use ena::unify::{InPlaceUnificationTable, UnifyKey};
use indexmap::IndexMap;
use interleave_types::VarId;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct VarToken(u32);

impl UnifyKey for VarToken {
    type Value = ();

    fn index(&self) -> u32 {
        self.0
    }

    fn from_index(u: u32) -> Self {
        Self(u)
    }

    fn tag() -> &'static str {
        "VarToken"
    }
}

/// Disjoint-set forest over `VarId`. Owned exclusively by one `compute()`
/// call (§5): not `Clone`, not shared across traversals.
#[derive(Default)]
pub struct UnionFind {
    table: InPlaceUnificationTable<VarToken>,
    tokens: IndexMap<VarId, VarToken>,
    reverse: Vec<VarId>,
}

impl UnionFind {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `var` as its own singleton if it isn't already tracked.
    /// Idempotent.
    pub fn add(&mut self, var: VarId) {
        self.tokens.entry(var).or_insert_with(|| {
            let token = self.table.new_key(());
            self.reverse.push(var);
            token
        });
    }

    /// Unions the classes containing `a` and `b`. Both must already have
    /// been `add`ed.
    pub fn union(&mut self, a: VarId, b: VarId) {
        let (ta, tb) = (self.tokens[&a], self.tokens[&b]);
        self.table.union(ta, tb);
    }

    /// True if `a` and `b` are currently in the same class.
    #[must_use]
    pub fn same_class(&mut self, a: VarId, b: VarId) -> bool {
        let (ta, tb) = (self.tokens[&a], self.tokens[&b]);
        self.table.unioned(ta, tb)
    }

    /// Enumerates the current partition as a list of lists. Iteration
    /// order is unspecified in the abstract but deterministic for a given
    /// sequence of `add`/`union` calls: groups and their members come out
    /// in first-insertion order, never hash order (§4.2, §5).
    #[must_use]
    pub fn get_disjoint_sets(&mut self) -> Vec<Vec<VarId>> {
        let mut groups: IndexMap<u32, Vec<VarId>> = IndexMap::new();
        for (&var, &token) in &self.tokens {
            let root = self.table.find(token).index();
            groups.entry(root).or_default().push(var);
        }
        groups.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interleave_types::SymbolicVarFactory;
    use interleave_types::TypeDescriptor;

    fn var(factory: &SymbolicVarFactory) -> VarId {
        factory.fresh(TypeDescriptor::Int).id()
    }

    #[test]
    fn singletons_are_their_own_class() {
        let factory = SymbolicVarFactory::new();
        let mut uf = UnionFind::new();
        let a = var(&factory);
        uf.add(a);
        let sets = uf.get_disjoint_sets();
        assert_eq!(sets, vec![vec![a]]);
    }

    #[test]
    fn union_merges_classes_and_is_transitive() {
        let factory = SymbolicVarFactory::new();
        let mut uf = UnionFind::new();
        let (a, b, c) = (var(&factory), var(&factory), var(&factory));
        uf.add(a);
        uf.add(b);
        uf.add(c);
        uf.union(a, b);
        uf.union(b, c);
        assert!(uf.same_class(a, c));
        let sets = uf.get_disjoint_sets();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].len(), 3);
    }

    #[test]
    fn add_is_idempotent() {
        let factory = SymbolicVarFactory::new();
        let mut uf = UnionFind::new();
        let a = var(&factory);
        uf.add(a);
        uf.add(a);
        assert_eq!(uf.get_disjoint_sets(), vec![vec![a]]);
    }

    #[test]
    fn disjoint_sets_preserve_insertion_order() {
        let factory = SymbolicVarFactory::new();
        let mut uf = UnionFind::new();
        let (a, b, c, d) = (var(&factory), var(&factory), var(&factory), var(&factory));
        uf.add(a);
        uf.add(b);
        uf.add(c);
        uf.add(d);
        uf.union(c, d);
        assert_eq!(uf.get_disjoint_sets(), vec![vec![a], vec![b], vec![c, d]]);
    }
}
