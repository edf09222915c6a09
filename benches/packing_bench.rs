use criterion::{criterion_group, criterion_main, Criterion};
use cutplan::config::{OptimizeParams, Strategy};
use cutplan::optimizer::optimize;
use cutplan::synthetic::OrderGenerator;
use std::hint::black_box;

fn criterion_benchmark(c: &mut Criterion) {
    let order = OrderGenerator::with_seed(2024).order(12, 15);
    let ffd = OptimizeParams::default().with_kerf(4.0).with_paint_margin(10.0);
    let auto = ffd.clone().with_strategy(Strategy::Auto);

    c.bench_function("optimize ffd (12 profiles x 15 lines)", |b| {
        b.iter(|| optimize(black_box(&order), black_box(&ffd)))
    });

    c.bench_function("optimize auto (12 profiles x 15 lines)", |b| {
        b.iter(|| optimize(black_box(&order), black_box(&auto)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
