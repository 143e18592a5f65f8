//! Resolver throughput: exact and approximate hit methods on growing battles.
//!
//! Run with: `cargo bench --bench resolver`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use attrition::combat::{resolve_battle_with_rules, resolve_profiles, HitProfile, RemovalOrder};
use attrition::data::{Force, HitMethod, RuleSet, UnitType};

fn army(scale: u32) -> (Force, Force) {
    let attacker = Force::empty()
        .with(UnitType::Infantry, 3 * scale)
        .with(UnitType::Artillery, 2 * scale)
        .with(UnitType::Armor, scale)
        .with(UnitType::Fighter, scale)
        .with(UnitType::Battleship, 1);
    let defender = Force::empty()
        .with(UnitType::Infantry, 4 * scale)
        .with(UnitType::Artillery, scale)
        .with(UnitType::Fighter, scale)
        .with(UnitType::AntiAir, 1);
    (attacker, defender)
}

fn bench_resolver(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolver");
    group.sample_size(20);

    for scale in [1u32, 2, 4] {
        let (attacker, defender) = army(scale);
        for method in [HitMethod::Exact, HitMethod::Approximate] {
            let rules = RuleSet::default().with_hit_method(method);
            group.bench_with_input(
                BenchmarkId::new(format!("{method:?}"), scale),
                &scale,
                |b, _| {
                    b.iter(|| {
                        black_box(resolve_battle_with_rules(
                            &attacker,
                            &defender,
                            &RemovalOrder::default_attack(),
                            &RemovalOrder::default_defense(),
                            true,
                            &rules,
                        ))
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_profiles(c: &mut Criterion) {
    let first = HitProfile([0, 0, 10, 5, 5]);
    let second = HitProfile([0, 5, 5, 5, 5]);
    c.bench_function("profiles_20_vs_20", |b| {
        b.iter(|| black_box(resolve_profiles(&first, &second, HitMethod::Exact)))
    });
}

criterion_group!(benches, bench_resolver, bench_profiles);
criterion_main!(benches);
