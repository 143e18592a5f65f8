//! Exact odds for dice-based attrition battles.
//!
//! Every reachable casualty state of a battle is enumerated and its probability computed in
//! closed form, so results carry no sampling noise.

pub mod combat;
pub mod data;
pub mod error;
pub mod parallel;

pub use combat::{land_battle, resolve_battle, resolve_battle_with_rules, BattleOdds, RemovalOrder};
pub use data::{Force, Power, RuleSet, Scenario, UnitType};
pub use error::{OddsError, Result, Side};
