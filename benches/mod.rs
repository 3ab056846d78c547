use criterion::{criterion_group, criterion_main};

mod adapter_bench;
mod sequence_bench;

criterion_group!(
    benches,
    adapter_bench::bench_submit_throughput,
    sequence_bench::bench_bootstrap_sequence,
);
criterion_main!(benches);
