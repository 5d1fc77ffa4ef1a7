use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::{SeedableRng, rngs::StdRng};
use rsfault::fault::generator::FaultGenerator;
use rsfault::prelude::*;
use rsfault::runner::TrialRunner;
use std::{hint::black_box, time::Duration};

const TRIALS: usize = 1000;

fn bench_trials(c: &mut Criterion) {
    let mut group = c.benchmark_group("Trials");
    group.measurement_time(Duration::from_secs(10));

    for config in CodeConfig::DEFAULTS {
        let codec = ReedSolomon::new(config).unwrap();
        let runner = TrialRunner::new(&codec, 13, DecodePolicy::default());
        let generator = FaultGenerator::new(config, FaultDistribution::default(), true);
        let name = config.to_string();

        group.bench_with_input(BenchmarkId::new("random", &name), &config, |b, _| {
            let mut rng = StdRng::seed_from_u64(0);
            b.iter(|| black_box(runner.random(&mut rng, black_box(TRIALS), 1).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("fault-model", &name), &config, |b, _| {
            let mut rng = StdRng::seed_from_u64(0);
            b.iter(|| {
                black_box(
                    runner
                        .fault_model(&mut rng, black_box(TRIALS), &generator)
                        .unwrap(),
                )
            });
        });

        group.bench_with_input(BenchmarkId::new("exhaustive", &name), &config, |b, _| {
            let mut rng = StdRng::seed_from_u64(0);
            b.iter(|| black_box(runner.exhaustive(&mut rng).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_trials);
criterion_main!(benches);
