use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use formula_tokenizer::tokenize;

fn nested_functions(depth: usize) -> String {
    let mut formula = String::from("=");
    for _ in 0..depth {
        formula.push_str("SUM(");
    }
    formula.push('1');
    for _ in 0..depth {
        formula.push(')');
    }
    formula
}

fn long_argument_list(n: usize) -> String {
    let args: Vec<String> = (0..n).map(|i| format!("A{i}")).collect();
    format!("=SUM({})", args.join(","))
}

fn array_literal(rows: usize, cols: usize) -> String {
    let row = (0..cols).map(|i| i.to_string()).collect::<Vec<_>>().join(",");
    let rows = vec![row; rows].join(";");
    format!("={{{rows}}}")
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");

    group.bench_function("short_arithmetic", |b| {
        b.iter(|| tokenize("=1+2*3-4/5"));
    });

    for depth in [4, 16, 64] {
        let formula = nested_functions(depth);
        group.bench_with_input(BenchmarkId::new("nested_functions", depth), &formula, |b, f| {
            b.iter(|| tokenize(f));
        });
    }

    for n in [10, 100, 1000] {
        let formula = long_argument_list(n);
        group.bench_with_input(BenchmarkId::new("long_argument_list", n), &formula, |b, f| {
            b.iter(|| tokenize(f));
        });
    }

    let array = array_literal(50, 50);
    group.bench_function("large_array_literal", |b| {
        b.iter(|| tokenize(&array));
    });

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
