//! The heuristic engine (§4.5, §4.6): walks the expression AST, evaluating
//! each node to an `InterleavingResult`, memoizing per node identity, and
//! calling the union-find whenever an operation couples its operands.

use std::rc::Rc;

use indexmap::IndexMap;
use interleave_types::{ArgId, ArgMap, Expr, ExprId, HeuristicError};
use interleave_types::{HeuristicOptions, TypeDescriptor, VarId, expr_id};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::empty::empty_of;
use crate::result::InterleavingResult;
use crate::union_find::UnionFind;

struct EngineCtx<'a> {
    args: &'a ArgMap,
    uf: UnionFind,
    memo: FxHashMap<ExprId, InterleavingResult>,
    opts: HeuristicOptions,
}

/// Computes the interleaving partition for `root`, given the bindings for
/// any `Argument` nodes it (transitively) references, using default
/// `HeuristicOptions`.
pub fn compute(root: Rc<Expr>, args: &ArgMap) -> Result<Vec<Vec<VarId>>, HeuristicError> {
    compute_with_options(root, args, HeuristicOptions::default())
}

/// As `compute`, with explicit tunables (§9, "Config").
#[tracing::instrument(level = "debug", skip(root, args))]
pub fn compute_with_options(
    root: Rc<Expr>,
    args: &ArgMap,
    opts: HeuristicOptions,
) -> Result<Vec<Vec<VarId>>, HeuristicError> {
    let mut ctx = EngineCtx {
        args,
        uf: UnionFind::new(),
        memo: FxHashMap::default(),
        opts,
    };
    let result = evaluate(&root, &mut ctx, 0)?;
    // Every variable reachable from the root must appear in the partition,
    // even if it was never coupled with anything (invariant 2, §8).
    for var in result.get_all_variables() {
        ctx.uf.add(var.id());
    }
    let partition = ctx.uf.get_disjoint_sets();
    tracing::debug!(groups = partition.len(), "interleaving partition computed");
    Ok(partition)
}

fn check_depth(depth: usize, ctx: &EngineCtx<'_>) -> Result<(), HeuristicError> {
    if depth > ctx.opts.max_expr_depth {
        return Err(HeuristicError::UnsupportedForBddBackend(
            "expression tree exceeds maximum depth",
        ));
    }
    Ok(())
}

fn evaluate(
    e: &Rc<Expr>,
    ctx: &mut EngineCtx<'_>,
    depth: usize,
) -> Result<InterleavingResult, HeuristicError> {
    check_depth(depth, ctx)?;
    let id = expr_id(e);
    if let Some(cached) = ctx.memo.get(&id) {
        return Ok(cached.clone());
    }
    let result = evaluate_uncached(e, ctx, depth)?;
    ctx.memo.insert(id, result.clone());
    Ok(result)
}

fn evaluate_uncached(
    e: &Expr,
    ctx: &mut EngineCtx<'_>,
    depth: usize,
) -> Result<InterleavingResult, HeuristicError> {
    match e {
        Expr::Constant(ty) => Ok(empty_of(ty)),

        Expr::Arbitrary(v) => {
            ctx.uf.add(v.id());
            Ok(InterleavingResult::singleton(v.clone()))
        }

        Expr::Argument(id) => evaluate_argument(*id, ctx, depth),

        Expr::EmptySequence(ty) | Expr::EmptySet(ty) | Expr::ListEmpty(ty) => Ok(empty_of(ty)),

        Expr::EmptyMap(..) => Err(HeuristicError::UnsupportedForBddBackend("empty-map")),

        Expr::LogicalNot(child) => evaluate(child, ctx, depth + 1),
        Expr::BitwiseNot(child, _ty) => evaluate(child, ctx, depth + 1),
        Expr::Cast(child, _) => evaluate(child, ctx, depth + 1),

        Expr::LogicalAnd(l, r) | Expr::LogicalOr(l, r) => {
            let el = evaluate(l, ctx, depth + 1)?;
            let er = evaluate(r, ctx, depth + 1)?;
            el.union(er)
        }

        Expr::Arithmetic(_, l, r, _) => evaluate_coupled(l, r, ctx, depth),
        Expr::Compare(_, l, r) => evaluate_coupled(l, r, ctx, depth),
        Expr::Equality(_, l, r) => evaluate_coupled(l, r, ctx, depth),
        Expr::BitwiseAnd(l, r, _) | Expr::BitwiseXor(l, r, _) => evaluate_coupled(l, r, ctx, depth),

        Expr::BitwiseOr(l, r, _) => {
            let el = evaluate(l, ctx, depth + 1)?;
            let er = evaluate(r, ctx, depth + 1)?;
            el.union(er)
        }

        Expr::If(cond, then_branch, else_branch, _) => {
            // Evaluated for side effects on the union-find only; the
            // condition's variables are never unioned with the branches.
            evaluate(cond, ctx, depth + 1)?;
            let et = evaluate(then_branch, ctx, depth + 1)?;
            let ef = evaluate(else_branch, ctx, depth + 1)?;
            et.union(ef)
        }

        Expr::RecordCreate(_ty, fields) => {
            let mut sorted: Vec<_> = fields.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(&b.0));
            let mut built = IndexMap::new();
            for (name, field_expr) in sorted {
                built.insert(name.clone(), evaluate(field_expr, ctx, depth + 1)?);
            }
            Ok(InterleavingResult::Record(built))
        }

        Expr::RecordGetField(inner, field, _) => {
            let inner_result = evaluate(inner, ctx, depth + 1)?;
            inner_result.get_field(field).map(InterleavingResult::clone)
        }

        Expr::RecordWithField(inner, field, value, _) => {
            let inner_result = evaluate(inner, ctx, depth + 1)?;
            let value_result = evaluate(value, ctx, depth + 1)?;
            inner_result.with_field(field, value_result)
        }

        Expr::ListCons(head, tail, _) => {
            let eh = evaluate(head, ctx, depth + 1)?;
            let et = evaluate(tail, ctx, depth + 1)?;
            eh.union(et)
        }

        Expr::ListCase {
            scrutinee,
            result_ty,
        } => {
            // Open question (§9): the cons branch is never traversed, so
            // any coupling it would have induced is lost. Preserved
            // deliberately, not a bug to fix here.
            evaluate(scrutinee, ctx, depth + 1)?;
            Ok(empty_of(result_ty))
        }

        Expr::Unsupported { op_name, .. } => {
            Err(HeuristicError::UnsupportedForBddBackend(*op_name))
        }
    }
}

fn evaluate_argument(
    id: ArgId,
    ctx: &mut EngineCtx<'_>,
    depth: usize,
) -> Result<InterleavingResult, HeuristicError> {
    let bound = ctx
        .args
        .get(&id)
        .cloned()
        .ok_or(HeuristicError::MissingArgument(id))?;
    evaluate(&bound, ctx, depth + 1)
}

fn evaluate_coupled(
    l: &Rc<Expr>,
    r: &Rc<Expr>,
    ctx: &mut EngineCtx<'_>,
    depth: usize,
) -> Result<InterleavingResult, HeuristicError> {
    debug_assert_eq!(
        l.ty(ctx.args),
        r.ty(ctx.args),
        "evaluate_coupled operands must share a static type in a well-typed tree"
    );
    let el = evaluate(l, ctx, depth + 1)?;
    let er = evaluate(r, ctx, depth + 1)?;
    couple(&el, &er, &mut ctx.uf, &ctx.opts);
    el.union(er)
}

/// `couple(l, r)` (§4.6): the union rule shared by arithmetic, comparison,
/// equality and the non-disjunctive bitwise operators. The variable sets
/// backing the pairing loop are collected into `SmallVec`s rather than left
/// as hash sets: one operand's variables is typically a handful of leaves,
/// small enough to stay inline rather than spill to the heap.
fn couple(l: &InterleavingResult, r: &InterleavingResult, uf: &mut UnionFind, opts: &HeuristicOptions) {
    let vl: SmallVec<[_; 8]> = l.get_all_variables().into_iter().collect();
    let vr: SmallVec<[_; 8]> = r.get_all_variables().into_iter().collect();

    // Boolean variables occupy a single bit; interleaving them is
    // meaningless, so an all-boolean side opts the whole call out.
    if vl.iter().all(|v| v.ty().is_bool()) || vr.iter().all(|v| v.ty().is_bool()) {
        return;
    }

    let pair_count = vl.len().saturating_mul(vr.len());
    if pair_count > opts.max_couple_pairs {
        tracing::warn!(pair_count, "couple: unusually large variable-pair count");
    }

    for a in &vl {
        for b in &vr {
            if a.ty() != b.ty() {
                continue;
            }
            uf.add(a.id());
            uf.add(b.id());
            uf.union(a.id(), b.id());
            tracing::trace!(a = ?a.id(), b = ?b.id(), "coupled");
        }
    }
}
