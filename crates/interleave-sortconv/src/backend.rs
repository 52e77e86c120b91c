//! The collaborator contract the sort converter drives.
//!
//! `SolverBackend` stands in for the handful of Z3 sort constructors the
//! converter actually needs; production code is generic over it so a real
//! solver binding can be substituted without touching the visitor logic,
//! mirroring how the checker drives an in-memory `NodeArena`/`SymbolArena`
//! rather than hard-coding a concrete backing store.

/// An opaque handle to a sort as produced by the host solver.
///
/// Trait objects returned by a real Z3 binding are not `Copy`, but every
/// sort the converter builds is handed out by value and then only ever
/// stored or compared, so the backend's associated `Sort` type carries
/// whatever clone semantics the concrete backend needs.
pub trait SolverBackend {
    type Sort: Clone;

    fn bool_sort(&mut self) -> Self::Sort;
    fn bitvec_sort(&mut self, width: u32) -> Self::Sort;
    fn int_sort(&mut self) -> Self::Sort;
    fn real_sort(&mut self) -> Self::Sort;
    fn string_sort(&mut self) -> Self::Sort;
    fn array_sort(&mut self, key: &Self::Sort, value: &Self::Sort) -> Self::Sort;
    fn option_sort(&mut self, inner: &Self::Sort) -> Self::Sort;
    fn sequence_sort(&mut self, elem: &Self::Sort) -> Self::Sort;
    fn datatype_sort(&mut self, name: &str, fields: &[(String, Self::Sort)]) -> Self::Sort;
    /// Registers a compound type's display name with the host solver so a
    /// later decoder can recover it. Called once per distinct record shape,
    /// never per cache hit.
    fn register_compound_name(&mut self, name: &str);
}

#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    use super::SolverBackend;

    /// A fake backend that logs every call instead of touching a real
    /// solver, the way the checker is tested against an in-memory arena
    /// rather than a real file system.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum RecordedSort {
        Bool,
        BitVec(u32),
        Int,
        Real,
        String,
        Array(Box<RecordedSort>, Box<RecordedSort>),
        Option(Box<RecordedSort>),
        Sequence(Box<RecordedSort>),
        Datatype(String, Vec<(String, RecordedSort)>),
    }

    #[derive(Debug, Default)]
    pub struct RecordingBackend {
        pub registered_names: Vec<String>,
    }

    impl RecordingBackend {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl SolverBackend for RecordingBackend {
        type Sort = RecordedSort;

        fn bool_sort(&mut self) -> Self::Sort {
            RecordedSort::Bool
        }
        fn bitvec_sort(&mut self, width: u32) -> Self::Sort {
            RecordedSort::BitVec(width)
        }
        fn int_sort(&mut self) -> Self::Sort {
            RecordedSort::Int
        }
        fn real_sort(&mut self) -> Self::Sort {
            RecordedSort::Real
        }
        fn string_sort(&mut self) -> Self::Sort {
            RecordedSort::String
        }
        fn array_sort(&mut self, key: &Self::Sort, value: &Self::Sort) -> Self::Sort {
            RecordedSort::Array(Box::new(key.clone()), Box::new(value.clone()))
        }
        fn option_sort(&mut self, inner: &Self::Sort) -> Self::Sort {
            RecordedSort::Option(Box::new(inner.clone()))
        }
        fn sequence_sort(&mut self, elem: &Self::Sort) -> Self::Sort {
            RecordedSort::Sequence(Box::new(elem.clone()))
        }
        fn datatype_sort(&mut self, name: &str, fields: &[(String, Self::Sort)]) -> Self::Sort {
            RecordedSort::Datatype(name.to_string(), fields.to_vec())
        }
        fn register_compound_name(&mut self, name: &str) {
            self.registered_names.push(name.to_string());
        }
    }
}
