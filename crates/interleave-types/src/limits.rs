//! Centralized limits for the interleaving heuristic.
//!
//! Mirrors the checker's centralized `limits.rs`: a single place to tune
//! recursion depths and operation-count thresholds, with the rationale for
//! each recorded alongside it rather than scattered at call sites.

/// Maximum recursion depth for `evaluate`.
///
/// Guards against stack overflow on pathologically deep expression trees
/// (e.g. a chain of thousands of nested `if`s). The heuristic walks the AST
/// recursively with no trampoline, so this is a hard cap, not a soft one.
pub const MAX_EXPR_DEPTH: usize = 512;

/// Soft threshold on the number of `(a, b)` pairs `couple` examines in a
/// single call before it logs a warning.
///
/// The quadratic pairing in §4.6 is "acceptable... in practice" because
/// symbolic formulas have small variable sets per sub-expression; this
/// constant is where that assumption is checked, not enforced - a formula
/// that blows past it still completes, just noisily.
pub const MAX_COUPLE_PAIRS: usize = 10_000;
