//! Gate application throughput across register widths

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ketsim_sim::{Circuit, SimConfig};

fn bench_hadamard_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("hadamard_sweep");

    for n in [10, 14, 18] {
        group.bench_with_input(BenchmarkId::new("serial", n), &n, |b, &n| {
            let config = SimConfig::new().with_parallel_threshold(usize::MAX);
            let mut circuit = Circuit::with_config(n, config).unwrap();
            b.iter(|| {
                for q in 0..n {
                    circuit.h(q).unwrap();
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("parallel", n), &n, |b, &n| {
            let config = SimConfig::new().with_parallel_threshold(0);
            let mut circuit = Circuit::with_config(n, config).unwrap();
            b.iter(|| {
                for q in 0..n {
                    circuit.h(q).unwrap();
                }
            });
        });
    }

    group.finish();
}

fn bench_qft(c: &mut Criterion) {
    let mut group = c.benchmark_group("qft");

    for n in [8, 12, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let mut circuit = Circuit::new(n).unwrap();
            b.iter(|| {
                circuit.qft(0, n).unwrap();
                circuit.inv_qft(0, n).unwrap();
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_hadamard_sweep, bench_qft);
criterion_main!(benches);
