pub mod battle;
pub mod casualty;
pub mod hits;
pub mod order;
pub mod outcome;
pub mod profile;
pub mod resolver;

pub use battle::{land_battle, resolve_battle, resolve_battle_with_rules};
pub use casualty::CasualtyBall;
pub use hits::{
    approximate_hits, combine, combine_within, exact_hits, exact_hits_within, hit_distribution,
    hits_for, HitDistribution, HitProfile,
};
pub use order::{RemovalOrder, DEFAULT_ATTACK_ORDER, DEFAULT_DEFENSE_ORDER};
pub use outcome::{aggregate, BattleOdds};
pub use profile::{resolve_profiles, resolve_profiles_with_rules, ProfileOdds};
pub use resolver::{
    anti_air_dice, bombardment_distribution, resolve_states, BattleState, StateTable,
};
