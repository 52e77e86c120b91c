//! The empty-result generator (§4.4): given a type descriptor, produces the
//! empty interleaving result of the correct shape.
//!
//! Implemented as a `TypeVisitor<InterleavingResult>` so record recursion
//! goes back through `TypeDescriptor::accept` rather than a direct
//! recursive call in the handler body (§4.1).

use interleave_types::{RecordShape, TypeDescriptor, TypeVisitor};
use std::rc::Rc;

use crate::result::InterleavingResult;

struct EmptyResultVisitor;

impl TypeVisitor<InterleavingResult> for EmptyResultVisitor {
    fn visit_bool(&mut self) -> InterleavingResult {
        InterleavingResult::empty_flat()
    }
    fn visit_byte(&mut self) -> InterleavingResult {
        InterleavingResult::empty_flat()
    }
    fn visit_char(&mut self) -> InterleavingResult {
        InterleavingResult::empty_flat()
    }
    fn visit_short(&mut self) -> InterleavingResult {
        InterleavingResult::empty_flat()
    }
    fn visit_ushort(&mut self) -> InterleavingResult {
        InterleavingResult::empty_flat()
    }
    fn visit_int(&mut self) -> InterleavingResult {
        InterleavingResult::empty_flat()
    }
    fn visit_uint(&mut self) -> InterleavingResult {
        InterleavingResult::empty_flat()
    }
    fn visit_long(&mut self) -> InterleavingResult {
        InterleavingResult::empty_flat()
    }
    fn visit_ulong(&mut self) -> InterleavingResult {
        InterleavingResult::empty_flat()
    }
    fn visit_big_integer(&mut self) -> InterleavingResult {
        InterleavingResult::empty_flat()
    }
    fn visit_real(&mut self) -> InterleavingResult {
        InterleavingResult::empty_flat()
    }
    fn visit_string(&mut self) -> InterleavingResult {
        InterleavingResult::empty_flat()
    }
    fn visit_fixed_integer(&mut self, _bits: u32) -> InterleavingResult {
        InterleavingResult::empty_flat()
    }
    fn visit_record(&mut self, shape: &Rc<RecordShape>) -> InterleavingResult {
        let fields = shape
            .fields
            .iter()
            .map(|(name, ty)| (name.clone(), ty.accept(self)))
            .collect();
        InterleavingResult::Record(fields)
    }
    // Sequences, maps, const-maps and sets are atomic from the domain's
    // perspective: only the variable identity matters, never its bit
    // decomposition, so they get the same `Flat(∅)` as any primitive.
    fn visit_sequence(&mut self, _elem: &TypeDescriptor) -> InterleavingResult {
        InterleavingResult::empty_flat()
    }
    fn visit_map(&mut self, _key: &TypeDescriptor, _value: &TypeDescriptor) -> InterleavingResult {
        InterleavingResult::empty_flat()
    }
    fn visit_const_map(
        &mut self,
        _key: &TypeDescriptor,
        _value: &TypeDescriptor,
    ) -> InterleavingResult {
        InterleavingResult::empty_flat()
    }
    fn visit_set(&mut self, _elem: &TypeDescriptor) -> InterleavingResult {
        InterleavingResult::empty_flat()
    }
}

/// Returns the shaped empty interleaving result for `ty`: `Flat(∅)` for
/// every primitive/atomic type, `Record` recursively for record types.
#[must_use]
pub fn empty_of(ty: &TypeDescriptor) -> InterleavingResult {
    let mut visitor = EmptyResultVisitor;
    ty.accept(&mut visitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_is_empty_flat() {
        assert_eq!(empty_of(&TypeDescriptor::Int), InterleavingResult::empty_flat());
    }

    #[test]
    fn record_is_shaped_recursively() {
        let ty = TypeDescriptor::record(
            None,
            vec![
                ("a".to_string(), TypeDescriptor::Int),
                ("b".to_string(), TypeDescriptor::record(
                    None,
                    vec![("c".to_string(), TypeDescriptor::Bool)],
                )),
            ],
        );
        let result = empty_of(&ty);
        match result {
            InterleavingResult::Record(fields) => {
                assert_eq!(fields.len(), 2);
                assert!(matches!(fields.get("a"), Some(InterleavingResult::Flat(_))));
                assert!(matches!(fields.get("b"), Some(InterleavingResult::Record(_))));
            }
            InterleavingResult::Flat(_) => panic!("expected Record"),
        }
    }

    #[test]
    fn sequence_map_set_are_atomic_flat() {
        assert_eq!(
            empty_of(&TypeDescriptor::sequence(TypeDescriptor::Int)),
            InterleavingResult::empty_flat()
        );
        assert_eq!(
            empty_of(&TypeDescriptor::map(TypeDescriptor::Int, TypeDescriptor::Bool)),
            InterleavingResult::empty_flat()
        );
        assert_eq!(
            empty_of(&TypeDescriptor::set(TypeDescriptor::Int)),
            InterleavingResult::empty_flat()
        );
    }

    #[test]
    fn empty_union_with_self_is_idempotent() {
        let ty = TypeDescriptor::record(None, vec![("a".to_string(), TypeDescriptor::Int)]);
        let a = empty_of(&ty);
        let b = empty_of(&ty);
        assert_eq!(a.clone().union(b).unwrap(), a);
    }
}
