//! Compare sequential vs parallel batch resolution.
//!
//! Run with: `cargo bench --bench batch_parallel`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use attrition::data::{Force, Scenario, UnitType};
use attrition::parallel::{resolve_batch, resolve_batch_sequential};

/// Attacks of growing size against a fixed garrison.
fn scenarios(count: u32) -> Vec<Scenario> {
    let garrison = Force::empty()
        .with(UnitType::Infantry, 6)
        .with(UnitType::Armor, 1)
        .with(UnitType::AntiAir, 1);
    (1..=count)
        .map(|i| {
            let attacker = Force::empty()
                .with(UnitType::Infantry, 2 + i % 6)
                .with(UnitType::Artillery, i % 4)
                .with(UnitType::Armor, 1 + i % 3)
                .with(UnitType::Fighter, i % 3);
            Scenario::new(attacker, garrison).named(format!("wave_{i}"))
        })
        .collect()
}

fn bench_batch_sequential_vs_parallel(c: &mut Criterion) {
    let batch = scenarios(32);

    let mut group = c.benchmark_group("batch");
    group.sample_size(20);
    group.measurement_time(std::time::Duration::from_secs(10));

    group.bench_function("sequential", |b| {
        b.iter(|| black_box(resolve_batch_sequential(&batch)))
    });
    group.bench_function("parallel", |b| {
        b.iter(|| black_box(resolve_batch(&batch)))
    });

    group.finish();
}

criterion_group!(benches, bench_batch_sequential_vs_parallel);
criterion_main!(benches);
