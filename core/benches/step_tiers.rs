use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use minegym_core::*;

fn env_for(preset: Preset) -> MinesweeperEnv {
    let config = EnvConfig {
        seed: Some(20261018),
        debug_invariants: false,
        ..preset.config()
    };
    MinesweeperEnv::new(config).expect("preset configs are valid")
}

/// Plays one episode, always clicking the first legal cell.
fn play_first_legal(env: &mut MinesweeperEnv) {
    env.reset().expect("reset");
    loop {
        let legal = env.legal_actions().expect("legal actions");
        let Some(&action) = legal.first() else {
            break;
        };
        if black_box(env.step(action).expect("step")).done {
            break;
        }
    }
}

fn bench_episodes(c: &mut Criterion) {
    for preset in Preset::ALL {
        c.bench_function(&format!("episode.first_legal.{}", preset.id()), |b| {
            b.iter_batched(
                || env_for(preset),
                |mut env| play_first_legal(&mut env),
                BatchSize::SmallInput,
            );
        });
    }
}

fn bench_flood_fill(c: &mut Criterion) {
    // a mine-free expert board opens completely from one click
    let layout = MineLayout::from_mine_coords((30, 16), &[]).expect("empty layout");
    c.bench_function("engine.flood_fill.open_board", |b| {
        b.iter_batched(
            || BoardEngine::new(layout.clone(), EngineOptions::default()),
            |mut engine| black_box(engine.open_cell((15, 8)).expect("open")),
            BatchSize::SmallInput,
        );
    });
}

fn bench_generate(c: &mut Criterion) {
    c.bench_function("generator.expert", |b| {
        let mut generator = RandomLayoutGenerator::new(Some(7));
        let config = Preset::Expert.board_config();
        b.iter(|| black_box(generator.generate(&config).expect("generate")));
    });
}

criterion_group!(step_tiers, bench_episodes, bench_flood_fill, bench_generate);
criterion_main!(step_tiers);
