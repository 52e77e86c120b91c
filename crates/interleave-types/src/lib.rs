//! Shared foundations for the interleaving heuristic.
//!
//! This crate provides:
//! - `TypeDescriptor` / `TypeVisitor` - the type-directed double-dispatch framework
//! - `SymbolicVar` / `SymbolicVarFactory` - referentially-unique symbolic-variable handles
//! - `Expr` - the tagged-variant expression AST the heuristic walks
//! - `HeuristicError` - the shared, fatal error type
//! - `HeuristicOptions` / `limits` - the tunables threaded through `compute`

pub mod ast;
pub mod descriptor;
pub mod error;
pub mod limits;
pub mod options;
pub mod variable;

pub use ast::{ArgId, ArgMap, ArithOp, CompareOp, EqOp, Expr, ExprId, expr_id};
pub use descriptor::{RecordShape, TypeDescriptor, TypeVisitor};
pub use error::HeuristicError;
pub use options::HeuristicOptions;
pub use variable::{SymbolicVar, SymbolicVarFactory, VarId};
