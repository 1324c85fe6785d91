//! Full-game throughput benchmark
//!
//! Plays complete seeded random-vs-random games over the bundled dataset,
//! allocating a fresh game per iteration.

use criterion::{criterion_group, criterion_main, Criterion};
use duel_forge::game::{GameController, GameLoop, PlayerAgent, RandomAgent, VerbosityLevel};
use duel_forge::loader;
use std::path::Path;

fn bench_full_game(c: &mut Criterion) {
    let (cards, wonders) =
        loader::load_dataset(Path::new("data")).expect("bundled dataset must load");

    c.bench_function("random_vs_random_full_game", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed += 1;
            let mut controller = GameController::new(
                cards.clone(),
                wonders.clone(),
                ["P1", "P2"],
                seed,
                VerbosityLevel::Silent,
            )
            .expect("dataset is large enough");
            let mut agents: [Box<dyn PlayerAgent>; 2] = [
                Box::new(RandomAgent::new("P1", seed.wrapping_add(1))),
                Box::new(RandomAgent::new("P2", seed.wrapping_add(2))),
            ];
            GameLoop::new(&mut controller)
                .run(&mut agents)
                .expect("agents only submit validated actions")
        })
    });
}

criterion_group!(benches, bench_full_game);
criterion_main!(benches);
