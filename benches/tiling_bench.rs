use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use wire_tiling::{DetectorParams, Tiling};

fn params_for(num_y_wires: usize) -> DetectorParams {
    let mut p = DetectorParams::default();
    p.num_y_wires = num_y_wires;
    p
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("tiling_build");
    group.sample_size(10);

    for size in [10, 20, 40].iter() {
        group.bench_with_input(BenchmarkId::new("num_y_wires", size), size, |b, &size| {
            b.iter(|| {
                Tiling::build(params_for(size)).unwrap();
            });
        });
    }
    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("tiling_classify");
    group.sample_size(10);

    for size in [10, 20, 40].iter() {
        group.bench_with_input(BenchmarkId::new("num_y_wires", size), size, |b, &size| {
            let mut tiling = Tiling::build(params_for(size)).unwrap();
            let n = tiling.cells().len();
            for i in (0..n).step_by(3) {
                tiling.inject_charge(i, 1.0);
            }
            b.iter(|| {
                tiling.classify_hits();
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_classify);
criterion_main!(benches);
