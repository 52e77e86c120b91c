//! The expression AST the heuristic walks.
//!
//! Encoded as a tagged `enum` rather than a visitor-per-node-kind object
//! hierarchy (Design Note, §9: "Polymorphic visitor over an open AST") -
//! the engine in `interleave-heuristic` pattern-matches over it directly.
//! Every node is wrapped in `Rc` so that structural sharing gives it a
//! stable referential identity (`expr_id`), which is what the memoization
//! cache keys on.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::descriptor::TypeDescriptor;
use crate::variable::SymbolicVar;

/// An opaque argument identifier ("argument reference (by id)" in §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct ArgId(pub u32);

/// The binding from argument id to the sub-expression it stands for, per
/// §6: "a mapping from argument identifiers to sub-expressions".
pub type ArgMap = FxHashMap<ArgId, Rc<Expr>>;

/// A stable, referential identity for an `Expr` node, used as a memoization
/// key. Derived from the `Rc` allocation's address, not node contents -
/// two structurally identical but separately-built nodes get different ids,
/// matching "memoization... requires structural sharing of AST nodes".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprId(usize);

#[must_use]
pub fn expr_id(e: &Rc<Expr>) -> ExprId {
    ExprId(Rc::as_ptr(e) as usize)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqOp {
    Eq,
    Ne,
}

/// A node in the typed AST the heuristic is computed over.
#[derive(Debug)]
pub enum Expr {
    /// A literal value. Only its shape matters to the heuristic, so no
    /// value is carried - just the type.
    Constant(TypeDescriptor),
    /// A free symbolic variable ("arbitrary").
    Arbitrary(Rc<SymbolicVar>),
    /// A reference to a sub-expression bound in the caller-supplied
    /// argument map.
    Argument(ArgId),
    EmptySequence(TypeDescriptor),
    /// Always rejected by the heuristic (§3); carried through so the AST
    /// can represent it and the engine can fail loudly on encountering it.
    EmptyMap(TypeDescriptor, TypeDescriptor),
    EmptySet(TypeDescriptor),

    LogicalNot(Rc<Expr>),
    LogicalAnd(Rc<Expr>, Rc<Expr>),
    LogicalOr(Rc<Expr>, Rc<Expr>),

    /// The trailing `TypeDescriptor` is the node's own static type, carried
    /// explicitly rather than derived from the operands at lookup time - see
    /// `ty()` below.
    Arithmetic(ArithOp, Rc<Expr>, Rc<Expr>, TypeDescriptor),
    Compare(CompareOp, Rc<Expr>, Rc<Expr>),
    Equality(EqOp, Rc<Expr>, Rc<Expr>),

    BitwiseAnd(Rc<Expr>, Rc<Expr>, TypeDescriptor),
    BitwiseOr(Rc<Expr>, Rc<Expr>, TypeDescriptor),
    BitwiseXor(Rc<Expr>, Rc<Expr>, TypeDescriptor),
    BitwiseNot(Rc<Expr>, TypeDescriptor),

    If(Rc<Expr>, Rc<Expr>, Rc<Expr>, TypeDescriptor),
    Cast(Rc<Expr>, TypeDescriptor),

    RecordCreate(TypeDescriptor, Vec<(String, Rc<Expr>)>),
    RecordGetField(Rc<Expr>, String, TypeDescriptor),
    RecordWithField(Rc<Expr>, String, Rc<Expr>, TypeDescriptor),

    ListEmpty(TypeDescriptor),
    ListCons(Rc<Expr>, Rc<Expr>, TypeDescriptor),
    /// `list-case` (destructure). Per the open question in §9, only the
    /// empty-branch result is traversed; `result_ty` is the static type of
    /// the whole case expression since the cons branch is never visited to
    /// recover it structurally.
    ListCase {
        scrutinee: Rc<Expr>,
        result_ty: TypeDescriptor,
    },

    /// Any map / const-map / sequence / regex operator beyond the leaves
    /// above. Always rejected; `op_name` is surfaced in the resulting
    /// `UnsupportedForBddBackend` error.
    Unsupported {
        op_name: &'static str,
        children: Vec<Rc<Expr>>,
        result_ty: TypeDescriptor,
    },
}

impl Expr {
    /// Recovers this node's static type in O(1) (§6: "a type descriptor
    /// reachable in O(1)"). Every kind either has only one possible type
    /// (the logical/comparison operators, always `Bool`) or carries its own
    /// type explicitly on the node - never by walking into a child's
    /// subtree, which is what would make this proportional to expression
    /// depth instead of constant.
    #[must_use]
    pub fn ty(&self, args: &ArgMap) -> TypeDescriptor {
        match self {
            Self::Constant(ty)
            | Self::EmptySequence(ty)
            | Self::EmptySet(ty)
            | Self::Cast(_, ty)
            | Self::ListEmpty(ty)
            | Self::RecordCreate(ty, _)
            | Self::Arithmetic(_, _, _, ty)
            | Self::BitwiseAnd(_, _, ty)
            | Self::BitwiseOr(_, _, ty)
            | Self::BitwiseXor(_, _, ty)
            | Self::BitwiseNot(_, ty)
            | Self::If(_, _, _, ty)
            | Self::RecordGetField(_, _, ty)
            | Self::RecordWithField(_, _, _, ty)
            | Self::ListCons(_, _, ty)
            | Self::ListCase { result_ty: ty, .. }
            | Self::Unsupported { result_ty: ty, .. } => ty.clone(),
            Self::Arbitrary(v) => v.ty().clone(),
            // One hashmap lookup plus one O(1) `ty()` read on the bound
            // node, never a walk into the bound node's own children.
            //
            // A missing binding is a `MissingArgument` error in the
            // engine's `evaluate`, which checks before ever calling `ty`;
            // this arm only needs a placeholder shape for unreachable
            // callers.
            Self::Argument(id) => args
                .get(id)
                .map(|bound| bound.ty(args))
                .unwrap_or(TypeDescriptor::Bool),
            Self::EmptyMap(key, value) => TypeDescriptor::map(key.clone(), value.clone()),
            Self::LogicalNot(_)
            | Self::LogicalAnd(..)
            | Self::LogicalOr(..)
            | Self::Compare(..)
            | Self::Equality(..) => TypeDescriptor::Bool,
        }
    }
}
