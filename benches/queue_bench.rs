//! Criterion benchmarks for the wait queue hot paths.
#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use handover::lab::{self, LabFiber};
use handover::{Events, WaitQueue};

fn push_flush(c: &mut Criterion) {
    lab::set_recording(false);
    let mut group = c.benchmark_group("push_flush");
    for &n in &[16usize, 256] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let fiber = LabFiber::new("bench");
            b.iter(|| {
                let queue = WaitQueue::new();
                for _ in 0..n {
                    queue.push(fiber.clone());
                }
                black_box(queue.flush().expect("echo scripts never raise"))
            });
        });
    }
    group.finish();
}

fn transfer_round_trip(c: &mut Criterion) {
    lab::set_recording(false);
    c.bench_function("wait_and_transfer", |b| {
        let queue = WaitQueue::new();
        let target = LabFiber::new("target");
        b.iter(|| {
            black_box(
                queue
                    .wait_and_transfer(&target, Events::READABLE)
                    .expect("echo script never raises"),
            )
        });
    });
}

criterion_group!(benches, push_flush, transfer_round_trip);
criterion_main!(benches);
