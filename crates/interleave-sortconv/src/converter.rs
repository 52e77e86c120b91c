//! The sort converter (§4.7): a type-directed visitor mapping each
//! `TypeDescriptor` to an opaque sort handle from a host `SolverBackend`,
//! with per-type caching so recursive record types don't diverge.

use interleave_types::{HeuristicError, RecordShape, TypeDescriptor, TypeVisitor};
use rustc_hash::FxHashMap;
use std::rc::Rc;

use crate::backend::SolverBackend;

/// Owned by exactly one solver instance for its lifetime; never safe to
/// share across concurrent traversals (§5) - that's a documented
/// constraint here, not a type-level one, the way the checker documents
/// rather than enforces `ModuleResolutionDebugger`'s single-writer rule.
pub struct SortConverter<B: SolverBackend> {
    backend: B,
    cache: FxHashMap<TypeDescriptor, B::Sort>,
}

impl<B: SolverBackend> SortConverter<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            cache: FxHashMap::default(),
        }
    }

    /// Idempotent per `ty`: a cache hit never calls into the backend again.
    pub fn get_sort_for(&mut self, ty: &TypeDescriptor) -> Result<B::Sort, HeuristicError> {
        if let Some(sort) = self.cache.get(ty) {
            tracing::trace!(cache_size = self.cache.len(), "sort cache hit");
            return Ok(sort.clone());
        }
        let sort = self.convert(ty)?;
        self.cache.insert(ty.clone(), sort.clone());
        tracing::debug!(cache_size = self.cache.len(), "converted and cached a new sort");
        Ok(sort)
    }

    fn convert(&mut self, ty: &TypeDescriptor) -> Result<B::Sort, HeuristicError> {
        match ty {
            TypeDescriptor::Record(shape) => self.convert_record(shape),
            TypeDescriptor::Sequence(elem) => {
                let elem_sort = self.get_sort_for(elem)?;
                Ok(self.backend.sequence_sort(&elem_sort))
            }
            TypeDescriptor::Map(key, value) | TypeDescriptor::ConstMap(key, value) => {
                self.convert_map(key, value)
            }
            TypeDescriptor::Set(_) => Ok(self.backend.bool_sort()),
            other => other.accept(&mut PrimitiveVisitor { backend: &mut self.backend }),
        }
    }

    fn convert_record(&mut self, shape: &Rc<RecordShape>) -> Result<B::Sort, HeuristicError> {
        let mut field_sorts = Vec::with_capacity(shape.fields.len());
        for (name, field_ty) in &shape.fields {
            field_sorts.push((name.clone(), self.get_sort_for(field_ty)?));
        }
        let display_name = shape.name.as_deref().unwrap_or("anonymous_record");
        let sort = self.backend.datatype_sort(display_name, &field_sorts);
        self.backend.register_compound_name(display_name);
        Ok(sort)
    }

    fn convert_map(
        &mut self,
        key: &TypeDescriptor,
        value: &TypeDescriptor,
    ) -> Result<B::Sort, HeuristicError> {
        match value {
            TypeDescriptor::ConstMap(..) => {
                return Err(HeuristicError::UnsupportedSortComposition(
                    "const-map used as a map value",
                ));
            }
            TypeDescriptor::Sequence(..) => {
                return Err(HeuristicError::UnsupportedSortComposition(
                    "sequence used as a map value",
                ));
            }
            _ => {}
        }
        let key_sort = self.get_sort_for(key)?;
        let value_sort = self.get_sort_for(value)?;
        // Set-membership maps (V = unit-set) drop the option wrapper: the
        // array's codomain is the value sort directly.
        let codomain = if matches!(value, TypeDescriptor::Set(_)) {
            value_sort
        } else {
            self.backend.option_sort(&value_sort)
        };
        Ok(self.backend.array_sort(&key_sort, &codomain))
    }
}

/// Handles the leaf primitives via the shared `TypeVisitor` framework so the
/// converter and the empty-result generator dispatch on type the same way.
/// Record/sequence/map/set are intercepted in `convert` above instead of
/// here, since they need access to `self.cache` that a borrowed `&mut B`
/// alone can't provide.
struct PrimitiveVisitor<'a, B: SolverBackend> {
    backend: &'a mut B,
}

impl<B: SolverBackend> TypeVisitor<Result<B::Sort, HeuristicError>> for PrimitiveVisitor<'_, B> {
    fn visit_bool(&mut self) -> Result<B::Sort, HeuristicError> {
        Ok(self.backend.bool_sort())
    }
    fn visit_byte(&mut self) -> Result<B::Sort, HeuristicError> {
        Ok(self.backend.bitvec_sort(8))
    }
    fn visit_char(&mut self) -> Result<B::Sort, HeuristicError> {
        Ok(self.backend.bitvec_sort(16))
    }
    fn visit_short(&mut self) -> Result<B::Sort, HeuristicError> {
        Ok(self.backend.bitvec_sort(16))
    }
    fn visit_ushort(&mut self) -> Result<B::Sort, HeuristicError> {
        Ok(self.backend.bitvec_sort(16))
    }
    fn visit_int(&mut self) -> Result<B::Sort, HeuristicError> {
        Ok(self.backend.bitvec_sort(32))
    }
    fn visit_uint(&mut self) -> Result<B::Sort, HeuristicError> {
        Ok(self.backend.bitvec_sort(32))
    }
    fn visit_long(&mut self) -> Result<B::Sort, HeuristicError> {
        Ok(self.backend.bitvec_sort(64))
    }
    fn visit_ulong(&mut self) -> Result<B::Sort, HeuristicError> {
        Ok(self.backend.bitvec_sort(64))
    }
    fn visit_big_integer(&mut self) -> Result<B::Sort, HeuristicError> {
        Ok(self.backend.int_sort())
    }
    fn visit_real(&mut self) -> Result<B::Sort, HeuristicError> {
        Ok(self.backend.real_sort())
    }
    fn visit_string(&mut self) -> Result<B::Sort, HeuristicError> {
        Ok(self.backend.string_sort())
    }
    fn visit_fixed_integer(&mut self, bits: u32) -> Result<B::Sort, HeuristicError> {
        Ok(self.backend.bitvec_sort(bits))
    }
    fn visit_record(&mut self, _shape: &Rc<RecordShape>) -> Result<B::Sort, HeuristicError> {
        unreachable!("records are intercepted in SortConverter::convert before dispatch")
    }
    fn visit_sequence(&mut self, _elem: &TypeDescriptor) -> Result<B::Sort, HeuristicError> {
        unreachable!("sequences are intercepted in SortConverter::convert before dispatch")
    }
    fn visit_map(
        &mut self,
        _key: &TypeDescriptor,
        _value: &TypeDescriptor,
    ) -> Result<B::Sort, HeuristicError> {
        unreachable!("maps are intercepted in SortConverter::convert before dispatch")
    }
    fn visit_const_map(
        &mut self,
        _key: &TypeDescriptor,
        _value: &TypeDescriptor,
    ) -> Result<B::Sort, HeuristicError> {
        unreachable!("const-maps are intercepted in SortConverter::convert before dispatch")
    }
    fn visit_set(&mut self, _elem: &TypeDescriptor) -> Result<B::Sort, HeuristicError> {
        unreachable!("sets are intercepted in SortConverter::convert before dispatch")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::test_support::{RecordedSort, RecordingBackend};

    fn converter() -> SortConverter<RecordingBackend> {
        SortConverter::new(RecordingBackend::new())
    }

    #[test]
    fn primitives_map_to_expected_sorts() {
        let mut conv = converter();
        assert_eq!(conv.get_sort_for(&TypeDescriptor::Bool).unwrap(), RecordedSort::Bool);
        assert_eq!(conv.get_sort_for(&TypeDescriptor::Int).unwrap(), RecordedSort::BitVec(32));
        assert_eq!(conv.get_sort_for(&TypeDescriptor::Long).unwrap(), RecordedSort::BitVec(64));
        assert_eq!(conv.get_sort_for(&TypeDescriptor::BigInteger).unwrap(), RecordedSort::Int);
        assert_eq!(conv.get_sort_for(&TypeDescriptor::Real).unwrap(), RecordedSort::Real);
        assert_eq!(conv.get_sort_for(&TypeDescriptor::String).unwrap(), RecordedSort::String);
        assert_eq!(
            conv.get_sort_for(&TypeDescriptor::FixedInteger { bits: 4 }).unwrap(),
            RecordedSort::BitVec(4)
        );
    }

    #[test]
    fn set_is_converted_as_a_unit_set_boolean() {
        let mut conv = converter();
        let sort = conv.get_sort_for(&TypeDescriptor::set(TypeDescriptor::Int)).unwrap();
        assert_eq!(sort, RecordedSort::Bool);
    }

    #[test]
    fn record_registers_its_compound_name_once() {
        let mut conv = converter();
        let ty = TypeDescriptor::record(
            Some("Packet"),
            vec![
                ("src".to_string(), TypeDescriptor::UInt),
                ("dst".to_string(), TypeDescriptor::UInt),
            ],
        );
        conv.get_sort_for(&ty).unwrap();
        conv.get_sort_for(&ty).unwrap();
        assert_eq!(conv.backend.registered_names, vec!["Packet".to_string()]);
    }

    #[test]
    fn map_to_non_set_value_is_wrapped_in_option() {
        let mut conv = converter();
        let ty = TypeDescriptor::map(TypeDescriptor::Int, TypeDescriptor::Bool);
        let sort = conv.get_sort_for(&ty).unwrap();
        assert_eq!(
            sort,
            RecordedSort::Array(
                Box::new(RecordedSort::BitVec(32)),
                Box::new(RecordedSort::Option(Box::new(RecordedSort::Bool)))
            )
        );
    }

    #[test]
    fn map_to_set_value_drops_the_option_wrapper() {
        let mut conv = converter();
        let ty = TypeDescriptor::map(TypeDescriptor::Int, TypeDescriptor::set(TypeDescriptor::Int));
        let sort = conv.get_sort_for(&ty).unwrap();
        assert_eq!(
            sort,
            RecordedSort::Array(Box::new(RecordedSort::BitVec(32)), Box::new(RecordedSort::Bool))
        );
    }

    #[test]
    fn const_map_as_map_value_is_rejected() {
        let mut conv = converter();
        let inner = TypeDescriptor::const_map(TypeDescriptor::Int, TypeDescriptor::Bool);
        let ty = TypeDescriptor::map(TypeDescriptor::Int, inner);
        let err = conv.get_sort_for(&ty).unwrap_err();
        assert_eq!(
            err,
            HeuristicError::UnsupportedSortComposition("const-map used as a map value")
        );
    }

    #[test]
    fn sequence_as_map_value_is_rejected() {
        let mut conv = converter();
        let ty = TypeDescriptor::map(TypeDescriptor::Int, TypeDescriptor::sequence(TypeDescriptor::Int));
        let err = conv.get_sort_for(&ty).unwrap_err();
        assert_eq!(
            err,
            HeuristicError::UnsupportedSortComposition("sequence used as a map value")
        );
    }

    #[test]
    fn recursive_field_reuse_hits_the_cache() {
        let mut conv = converter();
        let shared_field = TypeDescriptor::Int;
        let ty = TypeDescriptor::record(
            Some("Pair"),
            vec![
                ("a".to_string(), shared_field.clone()),
                ("b".to_string(), shared_field),
            ],
        );
        // Two structurally-identical primitive fields still resolve through
        // the same cache entry without any special-casing.
        let sort = conv.get_sort_for(&ty).unwrap();
        assert!(matches!(sort, RecordedSort::Datatype(name, _) if name == "Pair"));
    }
}
