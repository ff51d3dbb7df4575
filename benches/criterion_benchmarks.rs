use criterion::{black_box, criterion_group, criterion_main, Criterion};
use slru_policy::admission::{AlwaysAdmit, RejectAll};
use slru_policy::config::SegmentedLruConfig;
use slru_policy::{Admittor, SegmentedLruPolicy};
use std::num::NonZeroUsize;

// Helper function to create a policy with the init pattern
fn make_slru<A: Admittor<usize>>(
    cap: usize,
    percent_protected: f64,
    admittor: A,
) -> SegmentedLruPolicy<usize, A> {
    let config = SegmentedLruConfig {
        maximum_size: NonZeroUsize::new(cap).unwrap(),
        percent_protected,
    };
    SegmentedLruPolicy::new(config, admittor)
}

pub fn criterion_benchmark(c: &mut Criterion) {
    const CACHE_SIZE: usize = 1000;
    let mut group = c.benchmark_group("Policy Operations");

    // Protected hits: every key already promoted
    {
        let mut policy = make_slru(CACHE_SIZE, 1.0, AlwaysAdmit);
        for i in 0..CACHE_SIZE {
            policy.record(i);
            policy.record(i);
        }

        group.bench_function("SLRU protected hit", |b| {
            b.iter(|| {
                for i in 0..100 {
                    policy.record(black_box(i % CACHE_SIZE));
                }
            });
        });
    }

    // Probation hits: promotion and demotion on every access
    {
        let mut policy = make_slru(CACHE_SIZE, 0.5, AlwaysAdmit);
        for i in 0..CACHE_SIZE {
            policy.record(i);
        }

        let mut next = 0;
        group.bench_function("SLRU promote", |b| {
            b.iter(|| {
                for _ in 0..100 {
                    policy.record(black_box(next % CACHE_SIZE));
                    next += 1;
                }
            });
        });
    }

    // Misses that evict the probation head
    {
        let mut policy = make_slru(CACHE_SIZE, 0.8, AlwaysAdmit);
        let mut next = 0;

        group.bench_function("SLRU miss evict", |b| {
            b.iter(|| {
                for _ in 0..100 {
                    policy.record(black_box(next));
                    next += 1;
                }
            });
        });
    }

    // Misses whose candidate is rejected
    {
        let mut policy = make_slru(CACHE_SIZE, 0.8, RejectAll);
        for i in 0..CACHE_SIZE {
            policy.record(i);
        }
        let mut next = CACHE_SIZE;

        group.bench_function("SLRU miss reject", |b| {
            b.iter(|| {
                for _ in 0..100 {
                    policy.record(black_box(next));
                    next += 1;
                }
            });
        });
    }

    // Degraded to plain LRU
    {
        let mut policy = make_slru(CACHE_SIZE, 0.0, AlwaysAdmit);
        for i in 0..CACHE_SIZE {
            policy.record(i);
        }

        group.bench_function("LRU mode hit", |b| {
            b.iter(|| {
                for i in 0..100 {
                    policy.record(black_box(i % CACHE_SIZE));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
