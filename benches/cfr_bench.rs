//! Benchmarks for the CFR trainer.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use imperfect_info_games::cfr::{CfrTrainer, TrainerConfig, Traversal};
use imperfect_info_games::games::kuhn::KuhnPoker;
use imperfect_info_games::games::rps::RockPaperScissors;

fn kuhn_iteration_benchmark(c: &mut Criterion) {
    let config = TrainerConfig::seeded(1, 42);
    let mut trainer = CfrTrainer::with_default_players(KuhnPoker::new(), config).unwrap();

    c.bench_function("kuhn_single_iteration", |b| {
        b.iter(|| black_box(trainer.run_iteration().unwrap()))
    });
}

fn kuhn_1000_iterations_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("kuhn_1000_iterations");
    for traversal in [Traversal::Recursive, Traversal::WorkList] {
        group.bench_function(format!("{traversal:?}"), |b| {
            b.iter(|| {
                let config = TrainerConfig::seeded(black_box(1000), 42).with_traversal(traversal);
                let mut trainer =
                    CfrTrainer::with_default_players(KuhnPoker::new(), config).unwrap();
                trainer.train().unwrap().info_sets
            })
        });
    }
    group.finish();
}

fn rps_expected_payoffs_benchmark(c: &mut Criterion) {
    let config = TrainerConfig::seeded(1000, 42);
    let mut trainer = CfrTrainer::with_default_players(RockPaperScissors::new(), config).unwrap();
    trainer.train().unwrap();

    c.bench_function("rps_expected_payoffs", |b| {
        b.iter(|| black_box(trainer.expected_payoffs().unwrap()))
    });
}

criterion_group!(
    benches,
    kuhn_iteration_benchmark,
    kuhn_1000_iterations_benchmark,
    rps_expected_payoffs_benchmark
);
criterion_main!(benches);
