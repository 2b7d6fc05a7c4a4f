use criterion::{Criterion, BenchmarkId, criterion_group, criterion_main};
use quad1d::{qags, qaws};

mod common;

fn bench_problems(c: &mut Criterion) {
    let mut group = c.benchmark_group("problems");
    for (i, p) in common::test_problems().into_iter().enumerate() {
        let f = p.f;
        group.bench_function(
            BenchmarkId::new("qags", i + 1),
            |b| b.iter(|| qags(f, p.a, p.b).limit(0).integral()));
        if !p.singular {
            // About as many evaluations as two bisections of qags.
            group.bench_function(
                BenchmarkId::new("simpson", i + 1),
                |b| b.iter(|| common::simpson(f, p.a, p.b, 100)));
        }
    }
}

fn bench_weighted(c: &mut Criterion) {
    const A: f64 = 1.3;
    const B: f64 = 2.2;
    const BETA: f64 = 5. / 6.;
    let mut group = c.benchmark_group("weighted");
    let f = common::weighted_integrand;
    group.bench_function("qaws", |b| {
        b.iter(|| qaws(f, A, B, 0., BETA).integral())
    });
    group.bench_function("qags", |b| {
        b.iter(|| qags(|x: f64| f(x) * (B - x).powf(BETA), A, B).integral())
    });
    group.finish();
}

criterion_group!(benches, bench_problems, bench_weighted);
criterion_main!(benches);
