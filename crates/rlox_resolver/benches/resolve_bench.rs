use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rlox_ast::*;
use rlox_core::{AstArena, StringInterner};
use rlox_nodebuilder::NodeFactory;
use rlox_options::ResolverOptions;
use rlox_resolver::{resolve_program, Locals};

/// Generates `classes` subclass pairs and `functions` closures that each
/// nest a few blocks deep.
fn generate_program<'a>(f: &NodeFactory<'a>, classes: usize, functions: usize) -> Program<'a> {
    let mut statements = Vec::new();

    for i in 0..classes {
        let base = format!("Base{}", i);
        let derived = format!("Derived{}", i);
        statements.push(f.class(&base, None, vec![
            f.function_decl("init", &["x"], vec![f.expression(f.set(f.this(), "x", f.variable("x")))]),
            f.function_decl("get", &[], vec![f.return_(Some(f.get(f.this(), "x")))]),
        ]));
        statements.push(f.class(&derived, Some(&base), vec![
            f.function_decl("get", &[], vec![f.return_(Some(f.binary(
                f.call(f.super_("get"), vec![]),
                BinaryOperator::Add,
                f.number(1.0),
            )))]),
        ]));
    }

    for i in 0..functions {
        let name = format!("make{}", i);
        statements.push(f.function(&name, &["seed"], vec![
            f.var("total", Some(f.variable("seed"))),
            f.function("step", &["n"], vec![
                f.block(vec![
                    f.var("next", Some(f.binary(f.variable("total"), BinaryOperator::Add, f.variable("n")))),
                    f.block(vec![f.expression(f.assign("total", f.variable("next")))]),
                ]),
                f.return_(Some(f.variable("total"))),
            ]),
            f.block(vec![f.for_(
                Some(f.var("i", Some(f.number(0.0)))),
                Some(f.binary(f.variable("i"), BinaryOperator::Less, f.number(10.0))),
                Some(f.assign("i", f.binary(f.variable("i"), BinaryOperator::Add, f.number(1.0)))),
                Some(f.expression(f.call(f.variable("step"), vec![f.variable("i")]))),
            )]),
            f.return_(Some(f.variable("step"))),
        ]));
    }

    f.program("bench.lox", statements)
}

// ============================================================================
// Resolver Benchmarks
// ============================================================================

fn bench_resolve(c: &mut Criterion) {
    let arena = AstArena::new();
    let interner = StringInterner::new();
    let factory = NodeFactory::new(&arena, &interner);
    let program = generate_program(&factory, 20, 20);
    let options = ResolverOptions::default();

    c.bench_function("resolve_medium", |b| {
        b.iter(|| {
            let mut locals = Locals::new();
            let diagnostics = resolve_program(black_box(&program), &mut locals, &interner, &options);
            black_box((locals, diagnostics));
        });
    });
}

fn bench_unused_locals(c: &mut Criterion) {
    let arena = AstArena::new();
    let interner = StringInterner::new();
    let factory = NodeFactory::new(&arena, &interner);
    let program = generate_program(&factory, 20, 20);
    let options = ResolverOptions {
        report_unused_locals: true,
        ..ResolverOptions::default()
    };

    c.bench_function("resolve_medium_unused_locals", |b| {
        b.iter(|| {
            let mut locals = Locals::new();
            let diagnostics = resolve_program(black_box(&program), &mut locals, &interner, &options);
            black_box((locals, diagnostics));
        });
    });
}

// ============================================================================
// Scaling Benchmarks
// ============================================================================

fn bench_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("scaling");
    let options = ResolverOptions::default();

    for size in [10, 50, 100, 200] {
        let arena = AstArena::new();
        let interner = StringInterner::new();
        let factory = NodeFactory::new(&arena, &interner);
        let program = generate_program(&factory, size / 2, size / 2);
        group.bench_with_input(
            BenchmarkId::new("classes_and_functions", size),
            &program,
            |b, program| {
                b.iter(|| {
                    let mut locals = Locals::new();
                    let diagnostics = resolve_program(black_box(program), &mut locals, &interner, &options);
                    black_box((locals, diagnostics));
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_unused_locals, bench_scaling);
criterion_main!(benches);
