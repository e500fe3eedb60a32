//! Criterion micro-benchmarks for the individual update operations.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use yee_bench::reference_profile;
use yee_core::Operation;
use yee_updates::{CpuUpdates, Execution, UpdateStrategy};

fn bench_operations(c: &mut Criterion) {
    let grid = reference_profile().unwrap();
    let mut cpu = CpuUpdates::new(grid);

    // Warm up so the pulse has left zero fields behind.
    for step in 0..20 {
        for op in Operation::SEQUENCE {
            cpu.execute(op, step).unwrap();
        }
    }

    let mut group = c.benchmark_group("operation_48");
    for op in Operation::SEQUENCE {
        group.bench_function(op.name(), |b| {
            b.iter(|| {
                cpu.execute(black_box(op), 20).unwrap();
            });
        });
    }
    group.finish();
}

fn bench_curl_execution(c: &mut Criterion) {
    let grid = reference_profile().unwrap();
    let mut seq = CpuUpdates::new(grid.clone());
    let mut par = CpuUpdates::new(grid).with_execution(Execution::Parallel);

    c.bench_function("update_magnetic_48_sequential", |b| {
        b.iter(|| seq.update_magnetic().unwrap());
    });
    c.bench_function("update_magnetic_48_parallel", |b| {
        b.iter(|| par.update_magnetic().unwrap());
    });
}

criterion_group!(benches, bench_operations, bench_curl_execution);
criterion_main!(benches);
