//! Markov-chain resolution of a battle over (attacker casualties, defender casualties,
//! anti-air casualties) states.
//!
//! Casualties are never undone, so every transition moves to a state with a strictly larger
//! `attacker + defender` casualty total. Processing those totals ("classes") in increasing order
//! means each state's probability is final before it is pushed forward. The self-loop where
//! neither side scores a hit is normalized away instead of iterated.

use serde::{Deserialize, Serialize};

use crate::combat::casualty::CasualtyBall;
use crate::combat::hits::{combine_within, hit_distribution, hits_for, HitDistribution};
use crate::data::force::Force;
use crate::data::rules::RuleSet;
use crate::data::unit::UnitType;
use crate::error::{OddsError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BattleState {
    pub attacker_casualties: u32,
    pub defender_casualties: u32,
    pub anti_air_casualties: u32,
}

/// Probability of every battle state, stored as one contiguous plane per anti-air casualty count.
#[derive(Debug, Clone)]
pub struct StateTable {
    attacker_units: usize,
    defender_units: usize,
    anti_air_dice: usize,
    probabilities: Vec<f64>,
}

impl StateTable {
    fn new(attacker_units: usize, defender_units: usize, anti_air_dice: usize) -> Self {
        let size = (attacker_units + 1) * (defender_units + 1) * (anti_air_dice + 1);
        Self {
            attacker_units,
            defender_units,
            anti_air_dice,
            probabilities: vec![0.0; size],
        }
    }

    fn plane_len(&self) -> usize {
        (self.attacker_units + 1) * (self.defender_units + 1)
    }

    #[inline]
    fn index(&self, state: BattleState) -> usize {
        state.anti_air_casualties as usize * self.plane_len()
            + state.attacker_casualties as usize * (self.defender_units + 1)
            + state.defender_casualties as usize
    }

    fn plane_mut(&mut self, anti_air_casualties: usize) -> &mut [f64] {
        let len = self.plane_len();
        let start = anti_air_casualties * len;
        &mut self.probabilities[start..start + len]
    }

    pub fn attacker_units(&self) -> u32 {
        self.attacker_units as u32
    }

    pub fn defender_units(&self) -> u32 {
        self.defender_units as u32
    }

    pub fn anti_air_dice(&self) -> u32 {
        self.anti_air_dice as u32
    }

    pub fn probability(&self, state: BattleState) -> f64 {
        if state.attacker_casualties as usize > self.attacker_units
            || state.defender_casualties as usize > self.defender_units
            || state.anti_air_casualties as usize > self.anti_air_dice
        {
            return 0.0;
        }
        self.probabilities[self.index(state)]
    }

    /// Every state with non-zero probability.
    pub fn iter(&self) -> impl Iterator<Item = (BattleState, f64)> + '_ {
        let columns = self.defender_units + 1;
        let plane = self.plane_len();
        self.probabilities
            .iter()
            .enumerate()
            .filter(|(_, p)| **p > 0.0)
            .map(move |(index, p)| {
                let state = BattleState {
                    anti_air_casualties: (index / plane) as u32,
                    attacker_casualties: ((index % plane) / columns) as u32,
                    defender_casualties: (index % columns) as u32,
                };
                (state, *p)
            })
    }

    pub fn total(&self) -> f64 {
        self.probabilities.iter().sum()
    }
}

/// Walk one anti-air plane of the chain to completion.
///
/// `attacker_dists[g]` / `defender_dists[d]` are the hit distributions of each side after `g` / `d`
/// casualties. The attacker is annihilated at `live_attacker` casualties, the defender at
/// `defender_units`. Returns the number of stalemated states (both alive, neither able to hit);
/// their mass is left in place.
pub(crate) fn walk_classes(
    plane: &mut [f64],
    attacker_dists: &[HitDistribution],
    defender_dists: &[HitDistribution],
    live_attacker: usize,
    defender_units: usize,
    tolerance: f64,
) -> Result<usize> {
    if live_attacker == 0 || defender_units == 0 {
        return Ok(0);
    }
    let columns = defender_units + 1;
    let mut stalemates = 0;

    for class in 0..(live_attacker + defender_units - 1) {
        let lowest = class.saturating_sub(defender_units - 1);
        let highest = class.min(live_attacker - 1);
        for attacker_casualties in lowest..=highest {
            let defender_casualties = class - attacker_casualties;
            let index = attacker_casualties * columns + defender_casualties;
            let mass = plane[index];
            if mass == 0.0 {
                continue;
            }

            let attacker = &attacker_dists[attacker_casualties];
            let defender = &defender_dists[defender_casualties];
            if attacker.max_hits() == 0 && defender.max_hits() == 0 {
                stalemates += 1;
                continue;
            }

            let normalizer = 1.0 / (1.0 - attacker.miss_all() * defender.miss_all());
            let mut outgoing = 0.0;
            plane[index] = 0.0;
            for (attacker_hits, p_attacker) in attacker.iter() {
                for (defender_hits, p_defender) in defender.iter() {
                    if attacker_hits == 0 && defender_hits == 0 {
                        continue;
                    }
                    let weight = p_attacker * p_defender * normalizer;
                    outgoing += weight;
                    let next_attacker = (attacker_casualties + defender_hits).min(live_attacker);
                    let next_defender = (defender_casualties + attacker_hits).min(defender_units);
                    plane[next_attacker * columns + next_defender] += mass * weight;
                }
            }

            if (1.0 - outgoing).abs() > tolerance {
                return Err(OddsError::InvariantViolation {
                    stage: format!(
                        "transition out of {attacker_casualties} attacker and \
                         {defender_casualties} defender casualties"
                    ),
                    total: outgoing,
                });
            }
        }
        tracing::trace!(class, "casualty class resolved");
    }

    Ok(stalemates)
}

/// Bombarding ships: battleships first, cruisers filling the rest, one per attacking ground unit.
pub fn bombardment_distribution(attacking: &Force, tolerance: f64) -> Result<HitDistribution> {
    let capacity = attacking.ground_units();
    let battleships = attacking.count(UnitType::Battleship).min(capacity);
    let cruisers = attacking
        .count(UnitType::Cruiser)
        .min(capacity - battleships);
    combine_within(
        &hit_distribution(battleships, UnitType::Battleship.attack_face()),
        &hit_distribution(cruisers, UnitType::Cruiser.attack_face()),
        tolerance,
    )
}

/// Number of anti-air dice rolled against the attacker's aircraft.
pub fn anti_air_dice(defending: &Force, attacker_air_units: u32, rules: &RuleSet) -> u32 {
    (defending.count(UnitType::AntiAir) * rules.anti_air_shots_per_gun).min(attacker_air_units)
}

/// Resolve the full state table for a battle.
pub fn resolve_states(
    attacking: &Force,
    defending: &Force,
    attack_ball: &CasualtyBall,
    defense_ball: &CasualtyBall,
    rules: &RuleSet,
) -> Result<StateTable> {
    let attacker_units = attack_ball.units() as usize;
    let defender_units = defense_ball.units() as usize;
    let aa_dice = anti_air_dice(defending, attack_ball.air_units(), rules);
    let mut table = StateTable::new(attacker_units, defender_units, aa_dice as usize);
    tracing::debug!(
        attacker_units,
        defender_units,
        anti_air_dice = aa_dice,
        states = table.probabilities.len(),
        "resolving battle state space"
    );

    let defender_dists = (0..=defender_units)
        .map(|casualties| {
            hits_for(
                &defense_ball.remaining_hits(casualties as u32, 0),
                rules.hit_method,
                rules.tolerance,
            )
        })
        .collect::<Result<Vec<_>>>()?;

    let anti_air = hit_distribution(aa_dice, rules.anti_air_face);
    let bombardment = bombardment_distribution(attacking, rules.tolerance)?;
    let defender_first = &defender_dists[0];

    for (anti_air_hits, p_anti_air) in anti_air.iter() {
        let live_attacker = attacker_units - anti_air_hits;
        let attacker_dists = (0..=live_attacker)
            .map(|casualties| {
                hits_for(
                    &attack_ball.remaining_hits(casualties as u32, anti_air_hits as u32),
                    rules.hit_method,
                    rules.tolerance,
                )
            })
            .collect::<Result<Vec<_>>>()
            .map_err(|err| within_plane(err, anti_air_hits))?;

        // Round one: bombardment fires alongside the attacker; a full miss is a real outcome here.
        let attacker_first = combine_within(&attacker_dists[0], &bombardment, rules.tolerance)
            .map_err(|err| within_plane(err, anti_air_hits))?;
        let columns = defender_units + 1;
        let plane = table.plane_mut(anti_air_hits);
        for (attacker_hits, p_attacker) in attacker_first.iter() {
            for (defender_hits, p_defender) in defender_first.iter() {
                let attacker_casualties = defender_hits.min(live_attacker);
                let defender_casualties = attacker_hits.min(defender_units);
                plane[attacker_casualties * columns + defender_casualties] +=
                    p_anti_air * p_attacker * p_defender;
            }
        }

        let stalemates = walk_classes(
            plane,
            &attacker_dists,
            &defender_dists,
            live_attacker,
            defender_units,
            rules.tolerance,
        )
        .map_err(|err| within_plane(err, anti_air_hits))?;
        if stalemates > 0 {
            tracing::warn!(
                anti_air_hits,
                stalemates,
                "neither side can score a hit; battle stalls"
            );
        }
    }

    let total = table.total();
    if (1.0 - total).abs() > rules.tolerance {
        return Err(OddsError::InvariantViolation {
            stage: "final state table".to_string(),
            total,
        });
    }
    Ok(table)
}

/// Tags an invariant failure with the anti-air plane it happened in.
fn within_plane(err: OddsError, anti_air_hits: usize) -> OddsError {
    match err {
        OddsError::InvariantViolation { stage, total } => OddsError::InvariantViolation {
            stage: format!("{stage} (anti-air casualties {anti_air_hits})"),
            total,
        },
        other => other,
    }
}
