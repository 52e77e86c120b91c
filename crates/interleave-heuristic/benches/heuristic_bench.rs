//! Heuristic engine microbenchmarks (wide record coupling, deep chains).

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use interleave_heuristic::compute;
use interleave_types::{ArgMap, ArithOp, EqOp, Expr, SymbolicVarFactory, TypeDescriptor};
use rustc_hash::FxHashMap;
use std::rc::Rc;

fn build_wide_record_equality(width: usize) -> Rc<Expr> {
    let factory = SymbolicVarFactory::new();
    let fields: Vec<(String, TypeDescriptor)> = (0..width)
        .map(|i| (format!("f{i}"), TypeDescriptor::UInt))
        .collect();
    let ty = TypeDescriptor::record(Some("Wide"), fields);

    let lhs_fields: Vec<(String, Rc<Expr>)> = (0..width)
        .map(|i| {
            (
                format!("f{i}"),
                Rc::new(Expr::Arbitrary(factory.fresh(TypeDescriptor::UInt))),
            )
        })
        .collect();
    let rhs_fields: Vec<(String, Rc<Expr>)> = (0..width)
        .map(|i| {
            (
                format!("f{i}"),
                Rc::new(Expr::Arbitrary(factory.fresh(TypeDescriptor::UInt))),
            )
        })
        .collect();

    let lhs = Rc::new(Expr::RecordCreate(ty.clone(), lhs_fields));
    let rhs = Rc::new(Expr::RecordCreate(ty, rhs_fields));
    Rc::new(Expr::Equality(EqOp::Eq, lhs, rhs))
}

fn build_deep_arithmetic_chain(depth: usize) -> Rc<Expr> {
    let factory = SymbolicVarFactory::new();
    let mut acc: Rc<Expr> = Rc::new(Expr::Arbitrary(factory.fresh(TypeDescriptor::Int)));
    for _ in 0..depth {
        let next = Rc::new(Expr::Arbitrary(factory.fresh(TypeDescriptor::Int)));
        acc = Rc::new(Expr::Arithmetic(ArithOp::Add, acc, next, TypeDescriptor::Int));
    }
    acc
}

fn no_args() -> ArgMap {
    FxHashMap::default()
}

fn bench_wide_record_coupling(c: &mut Criterion) {
    let root = build_wide_record_equality(64);
    c.bench_function("compute_wide_record_equality_64", |b| {
        b.iter(|| black_box(compute(root.clone(), &no_args())))
    });
}

fn bench_deep_arithmetic_chain(c: &mut Criterion) {
    let root = build_deep_arithmetic_chain(256);
    c.bench_function("compute_deep_arithmetic_chain_256", |b| {
        b.iter(|| black_box(compute(root.clone(), &no_args())))
    });
}

criterion_group!(
    heuristic_benches,
    bench_wide_record_coupling,
    bench_deep_arithmetic_chain
);
criterion_main!(heuristic_benches);
