//! Entry points: build both casualty balls, resolve the state space, aggregate the outcome.

use crate::combat::casualty::CasualtyBall;
use crate::combat::order::RemovalOrder;
use crate::combat::outcome::{aggregate, BattleOdds};
use crate::combat::resolver::resolve_states;
use crate::data::force::Force;
use crate::data::rules::RuleSet;
use crate::data::unit::Role;
use crate::error::{Result, Side};

/// Resolve a battle under the default rules.
///
/// `preserve_survivor` is set when the attacker must keep a ground unit alive to take the
/// territory; the attacker's most valuable ground unit is then sacrificed last.
pub fn resolve_battle(
    attacking: &Force,
    defending: &Force,
    attacker_order: &RemovalOrder,
    defender_order: &RemovalOrder,
    preserve_survivor: bool,
) -> Result<BattleOdds> {
    resolve_battle_with_rules(
        attacking,
        defending,
        attacker_order,
        defender_order,
        preserve_survivor,
        &RuleSet::default(),
    )
}

pub fn resolve_battle_with_rules(
    attacking: &Force,
    defending: &Force,
    attacker_order: &RemovalOrder,
    defender_order: &RemovalOrder,
    preserve_survivor: bool,
    rules: &RuleSet,
) -> Result<BattleOdds> {
    rules.validate()?;
    let attack_ball = CasualtyBall::new(
        attacking,
        Role::Attack,
        Side::Attacker,
        attacker_order,
        preserve_survivor,
    )?;
    let defense_ball = CasualtyBall::new(
        defending,
        Role::Defense,
        Side::Defender,
        defender_order,
        false,
    )?;

    let table = resolve_states(attacking, defending, &attack_ball, &defense_ball, rules)?;
    let odds = aggregate(&table, &attack_ball, &defense_ball);
    tracing::debug!(
        win = odds.win,
        tie = odds.tie,
        loss = odds.loss,
        "battle resolved"
    );
    Ok(odds)
}

/// Land battle against one or more allied defending forces with the default removal orders.
pub fn land_battle(
    attacking: &Force,
    defenders: &[Force],
    preserve_survivor: bool,
) -> Result<BattleOdds> {
    let defending: Force = defenders.iter().sum();
    resolve_battle(
        attacking,
        &defending,
        &RemovalOrder::default_attack(),
        &RemovalOrder::default_defense(),
        preserve_survivor,
    )
}
