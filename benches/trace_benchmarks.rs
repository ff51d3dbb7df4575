// Trace replay benchmarks over skewed, seeded key streams
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use slru_policy::admission::{Admittor, AlwaysAdmit};
use slru_policy::config::SegmentedLruConfig;
use slru_policy::traits::Policy;
use slru_policy::SegmentedLruPolicy;
use std::num::NonZeroUsize;

// Benchmark configuration
const CACHE_SIZE: usize = 1_000;
const TRACE_LENGTH: usize = 10_000;

fn make_slru<A: Admittor<u64>>(
    cap: usize,
    percent_protected: f64,
    admittor: A,
) -> SegmentedLruPolicy<u64, A> {
    let config = SegmentedLruConfig {
        maximum_size: NonZeroUsize::new(cap).unwrap(),
        percent_protected,
    };
    SegmentedLruPolicy::new(config, admittor)
}

// Zipf-like trace via inverse transform sampling over a precomputed CDF
fn zipf_trace(n: usize, skew: f64, seed: u64) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut cdf = Vec::with_capacity(n);
    let mut sum = 0.0;
    for i in 1..=n {
        sum += 1.0 / (i as f64).powf(skew);
        cdf.push(sum);
    }

    (0..TRACE_LENGTH)
        .map(|_| {
            let u = rng.gen::<f64>() * sum;
            cdf.partition_point(|&p| p < u) as u64
        })
        .collect()
}

/// Admits the candidate unless its key is smaller than the victim's.
/// Stands in for a frequency sketch with a cost the benchmark can see.
#[derive(Debug, Default)]
struct CompareAdmittor;

impl Admittor<u64> for CompareAdmittor {
    fn record(&mut self, key: &u64) {
        black_box(key);
    }

    fn admit(&mut self, candidate: &u64, victim: &u64) -> bool {
        candidate >= victim
    }
}

fn benchmark_traces(c: &mut Criterion) {
    let mut group = c.benchmark_group("Trace Replay");
    group.throughput(Throughput::Elements(TRACE_LENGTH as u64));

    for skew in [0.6, 0.8, 1.0] {
        let trace = zipf_trace(CACHE_SIZE * 4, skew, 42);

        for percent_protected in [0.0, 0.8] {
            let id = BenchmarkId::new(format!("SLRU p={percent_protected}"), skew);
            group.bench_with_input(id, &trace, |b, trace| {
                b.iter(|| {
                    let mut policy = make_slru(CACHE_SIZE, percent_protected, AlwaysAdmit);
                    policy.record_all(trace.iter().copied());
                    black_box(policy.stats().core.hits)
                });
            });
        }

        let id = BenchmarkId::new("SLRU gated", skew);
        group.bench_with_input(id, &trace, |b, trace| {
            b.iter(|| {
                let mut policy = make_slru(CACHE_SIZE, 0.8, CompareAdmittor);
                policy.record_all(trace.iter().copied());
                black_box(policy.stats().core.hits)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_traces);
criterion_main!(benches);
