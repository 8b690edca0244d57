use criterion::{Criterion, criterion_group, criterion_main};
use sapper_core::*;
use std::hint::black_box;

fn layout(size: Coord2, mines: CellCount, seed: u64) -> MineLayout {
    RandomMinefieldGenerator::new(seed, (0, 0), StartTile::AlwaysZero)
        .generate(GameConfig::new(size, mines))
}

fn bench_cascade(c: &mut Criterion) {
    let mut group = c.benchmark_group("cascade");

    for (name, size, mines) in [
        ("open_256x256", (256, 256), 0),
        ("sparse_256x256", (256, 256), 400),
        ("dense_64x64", (64, 64), 600),
    ] {
        let layout = layout(size, mines, 42);
        group.bench_function(name, |b| {
            b.iter_batched(
                || PlayEngine::new(layout.clone()),
                |mut engine| black_box(engine.reveal((0, 0))),
                criterion::BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("session");

    for (name, size, mines) in [("beginner", (9, 9), 10), ("expert", (16, 30), 99)] {
        let layout = layout(size, mines, 7);
        group.bench_function(name, |b| {
            b.iter(|| {
                let config = SessionConfig {
                    start: (0, 0),
                    max_turns: None,
                };
                let mut session = Session::new(layout.clone(), config);
                black_box(session.run().expect("text round trip should not fail"))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_cascade, bench_session);
criterion_main!(benches);
