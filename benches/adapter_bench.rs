use criterion::{BenchmarkId, Criterion};
use msgbus_rs::adapter::{EndpointId, Envelope, ThreadedAdapter};
use std::hint::black_box;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn make_envelope(marker: usize) -> Envelope {
    Envelope::new(EndpointId(1), None, marker.to_le_bytes().to_vec())
}

pub fn bench_submit_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("adapter_submit_throughput");

    for size in [100usize, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &n| {
            b.iter(|| {
                let processed = Arc::new(AtomicUsize::new(0));
                let counter = processed.clone();

                let mut adapter = ThreadedAdapter::spawn(move |envelope| {
                    black_box(envelope.payload());
                    counter.fetch_add(1, Ordering::Relaxed);
                    true
                });

                for marker in 0..n {
                    adapter.submit(make_envelope(marker));
                }
                while processed.load(Ordering::Relaxed) < n {
                    std::thread::yield_now();
                }

                adapter.stop();
            });
        });
    }

    group.finish();
}
