//! Criterion benchmarks: serial vs both blocked strategies.

use blockmul::{
    Accumulation, BlockMultiplier, BlockMultiplierConfig, BlockPartition, Matrix, multiply_serial,
};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

fn input(n: usize) -> (Matrix, Matrix) {
    let a = Matrix::from_fn(n, |r, c| ((r * n + c) % 100) as i64);
    let b = Matrix::from_fn(n, |r, c| ((c * n + r) % 100) as i64);
    (a, b)
}

fn bench_serial(c: &mut Criterion) {
    let mut group = c.benchmark_group("serial");
    group.sample_size(20);

    for n in [64, 128, 256] {
        let (a, b) = input(n);
        group.throughput(Throughput::Elements((2 * n * n * n) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |bencher, _| {
            bencher.iter(|| multiply_serial(black_box(&a), black_box(&b)).unwrap())
        });
    }

    group.finish();
}

fn bench_blocked(c: &mut Criterion) {
    for accumulation in [Accumulation::PerOutputBlock, Accumulation::AtomicCells] {
        let mut group = c.benchmark_group(format!("blocked_{}", accumulation));
        group.sample_size(20);

        let mul = BlockMultiplier::new(BlockMultiplierConfig::default().with_accumulation(accumulation))
            .unwrap();

        for n in [64, 128, 256] {
            let (a, b) = input(n);
            group.throughput(Throughput::Elements((2 * n * n * n) as u64));

            for block_size in [8, 16, 32, 64] {
                let pa = BlockPartition::build(&a, block_size).unwrap();
                let pb = BlockPartition::build(&b, block_size).unwrap();
                let id = BenchmarkId::new(format!("n{}", n), block_size);

                group.bench_function(id, |bencher| {
                    bencher.iter(|| mul.multiply(&pa, &pb, black_box(&a), black_box(&b)).unwrap())
                });
            }
        }

        group.finish();
    }
}

criterion_group!(benches, bench_serial, bench_blocked);
criterion_main!(benches);
