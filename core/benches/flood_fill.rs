use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use sweeper_core::*;

fn sparse_game(seed: u64) -> Minesweeper {
    let mut game = Minesweeper::with_clock(seed, ManualClock::new());
    game.set_custom_difficulty(MAX_SIZE, MAX_SIZE, MIN_MINES);
    game
}

fn bench_flood_fill(c: &mut Criterion) {
    c.bench_function("open_sparse_64x64", |b| {
        b.iter_batched(
            || sparse_game(7),
            |mut game| black_box(game.open(32, 32)),
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_statistics(c: &mut Criterion) {
    let mut game = Minesweeper::with_clock(7, ManualClock::new());
    game.set_difficulty(Difficulty::Expert);

    c.bench_function("count_3bv_expert", |b| b.iter(|| black_box(game.count_3bv())));
    c.bench_function("new_game_expert", |b| b.iter(|| game.new_game()));
}

criterion_group!(benches, bench_flood_fill, bench_statistics);
criterion_main!(benches);
