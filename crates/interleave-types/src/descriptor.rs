//! Type descriptors and the type-directed visitor framework.
//!
//! A `TypeDescriptor` is the runtime-available shape of a statically-typed
//! value. Record shapes carry their field list behind an `Rc` so that
//! recursive record types keep a stable identity: two `TypeDescriptor`s
//! built from the same `Rc<RecordShape>` are the same node as far as
//! caching visitors (the sort converter) are concerned, even though the
//! fields themselves are never compared structurally for that purpose.

use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// A record's fields, ordered by field name for deterministic iteration.
///
/// The optional `name` is the compound type's display name, used by the
/// sort converter to register algebraic datatypes with the host solver.
#[derive(Debug)]
pub struct RecordShape {
    pub name: Option<String>,
    pub fields: Vec<(String, TypeDescriptor)>,
}

impl RecordShape {
    /// Builds a record shape, sorting fields by name once at construction
    /// time rather than re-sorting on every visit.
    #[must_use]
    pub fn new(name: Option<String>, mut fields: Vec<(String, TypeDescriptor)>) -> Self {
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        Self { name, fields }
    }
}

/// The shape of a statically-typed value, as the heuristic sees it.
#[derive(Debug, Clone)]
pub enum TypeDescriptor {
    Bool,
    Byte,
    Char,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    BigInteger,
    Real,
    String,
    /// Fixed-width integer of `bits` bits (the width lives on the descriptor
    /// itself rather than being recovered reflectively, per the design note
    /// on `FixedInteger` width).
    FixedInteger { bits: u32 },
    Record(Rc<RecordShape>),
    Sequence(Box<TypeDescriptor>),
    Map(Box<TypeDescriptor>, Box<TypeDescriptor>),
    ConstMap(Box<TypeDescriptor>, Box<TypeDescriptor>),
    Set(Box<TypeDescriptor>),
}

impl TypeDescriptor {
    #[must_use]
    pub fn record(name: Option<&str>, fields: Vec<(String, TypeDescriptor)>) -> Self {
        Self::Record(Rc::new(RecordShape::new(name.map(str::to_owned), fields)))
    }

    #[must_use]
    pub fn sequence(elem: TypeDescriptor) -> Self {
        Self::Sequence(Box::new(elem))
    }

    #[must_use]
    pub fn set(elem: TypeDescriptor) -> Self {
        Self::Set(Box::new(elem))
    }

    #[must_use]
    pub fn map(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        Self::Map(Box::new(key), Box::new(value))
    }

    #[must_use]
    pub fn const_map(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        Self::ConstMap(Box::new(key), Box::new(value))
    }

    /// True only for the boolean primitive. Used by `couple` to decide
    /// whether a variable set is "all boolean" (§4.6, rule 1).
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Self::Bool)
    }
}

/// Equality used to decide whether two symbolic variables may be coupled
/// (§4.6: "the type descriptors of `a` and `b` are identical"). Primitives
/// compare structurally; records compare by the identity of their shared
/// shape, matching the "shared node identity... required" invariant for
/// recursive record types rather than deep structural comparison.
impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        use TypeDescriptor::{
            BigInteger, Bool, Byte, Char, ConstMap, FixedInteger, Int, Long, Map, Real, Record,
            Sequence, Set, Short, String as TString, UInt, ULong, UShort,
        };
        match (self, other) {
            (Bool, Bool)
            | (Byte, Byte)
            | (Char, Char)
            | (Short, Short)
            | (UShort, UShort)
            | (Int, Int)
            | (Long, Long)
            | (ULong, ULong)
            | (UInt, UInt)
            | (BigInteger, BigInteger)
            | (Real, Real)
            | (TString, TString) => true,
            (FixedInteger { bits: a }, FixedInteger { bits: b }) => a == b,
            (Record(a), Record(b)) => Rc::ptr_eq(a, b),
            (Sequence(a), Sequence(b)) | (Set(a), Set(b)) => a == b,
            (Map(ak, av), Map(bk, bv)) | (ConstMap(ak, av), ConstMap(bk, bv)) => {
                ak == bk && av == bv
            }
            _ => false,
        }
    }
}
impl Eq for TypeDescriptor {}

/// Must agree with the `PartialEq` impl above: records hash by the shared
/// shape's address, never by field content, or a `FxHashMap<TypeDescriptor,
/// _>` (the sort converter's cache) could put two `Eq` keys in different
/// buckets.
impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Bool
            | Self::Byte
            | Self::Char
            | Self::Short
            | Self::UShort
            | Self::Int
            | Self::UInt
            | Self::Long
            | Self::ULong
            | Self::BigInteger
            | Self::Real
            | Self::String => {}
            Self::FixedInteger { bits } => bits.hash(state),
            Self::Record(shape) => (Rc::as_ptr(shape) as usize).hash(state),
            Self::Sequence(elem) | Self::Set(elem) => elem.hash(state),
            Self::Map(key, value) | Self::ConstMap(key, value) => {
                key.hash(state);
                value.hash(state);
            }
        }
    }
}

/// Polymorphic type-directed double dispatch: a caller-chosen result type
/// `R`, one handler per `TypeDescriptor` variant. Implementations recurse
/// into nested types via `TypeDescriptor::accept`, never by matching
/// directly, so a caching visitor (the sort converter) can intercept
/// recursive calls.
pub trait TypeVisitor<R> {
    fn visit_bool(&mut self) -> R;
    fn visit_byte(&mut self) -> R;
    fn visit_char(&mut self) -> R;
    fn visit_short(&mut self) -> R;
    fn visit_ushort(&mut self) -> R;
    fn visit_int(&mut self) -> R;
    fn visit_uint(&mut self) -> R;
    fn visit_long(&mut self) -> R;
    fn visit_ulong(&mut self) -> R;
    fn visit_big_integer(&mut self) -> R;
    fn visit_real(&mut self) -> R;
    fn visit_string(&mut self) -> R;
    fn visit_fixed_integer(&mut self, bits: u32) -> R;
    fn visit_record(&mut self, shape: &Rc<RecordShape>) -> R;
    fn visit_sequence(&mut self, elem: &TypeDescriptor) -> R;
    fn visit_map(&mut self, key: &TypeDescriptor, value: &TypeDescriptor) -> R;
    fn visit_const_map(&mut self, key: &TypeDescriptor, value: &TypeDescriptor) -> R;
    fn visit_set(&mut self, elem: &TypeDescriptor) -> R;
}

impl TypeDescriptor {
    /// Double-dispatch entry point: `ty.accept(&mut visitor)`.
    pub fn accept<R>(&self, visitor: &mut dyn TypeVisitor<R>) -> R {
        match self {
            Self::Bool => visitor.visit_bool(),
            Self::Byte => visitor.visit_byte(),
            Self::Char => visitor.visit_char(),
            Self::Short => visitor.visit_short(),
            Self::UShort => visitor.visit_ushort(),
            Self::Int => visitor.visit_int(),
            Self::UInt => visitor.visit_uint(),
            Self::Long => visitor.visit_long(),
            Self::ULong => visitor.visit_ulong(),
            Self::BigInteger => visitor.visit_big_integer(),
            Self::Real => visitor.visit_real(),
            Self::String => visitor.visit_string(),
            Self::FixedInteger { bits } => visitor.visit_fixed_integer(*bits),
            Self::Record(shape) => visitor.visit_record(shape),
            Self::Sequence(elem) => visitor.visit_sequence(elem),
            Self::Map(key, value) => visitor.visit_map(key, value),
            Self::ConstMap(key, value) => visitor.visit_const_map(key, value),
            Self::Set(elem) => visitor.visit_set(elem),
        }
    }
}
