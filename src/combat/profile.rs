//! Battles between bare hit profiles: no unit types, no anti-air, no bombardment.
//! Casualties come off the cheapest die face first.

use serde::{Deserialize, Serialize};

use crate::combat::hits::{hits_for, HitProfile};
use crate::combat::resolver::walk_classes;
use crate::data::rules::{HitMethod, RuleSet};
use crate::error::{OddsError, Result};

/// Outcome chances of a profile battle. `loss` includes `stalemate`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileOdds {
    pub win: f64,
    pub tie: f64,
    pub loss: f64,
    /// Share of `loss` where both sides survive but neither can score a hit.
    pub stalemate: f64,
}

impl ProfileOdds {
    pub fn total(&self) -> f64 {
        self.win + self.tie + self.loss
    }
}

/// Chances that `first` destroys `second` (win), both fall together (tie), or `first` fails
/// to destroy `second` (loss).
pub fn resolve_profiles(
    first: &HitProfile,
    second: &HitProfile,
    method: HitMethod,
) -> Result<ProfileOdds> {
    resolve_profiles_with_rules(first, second, &RuleSet::default().with_hit_method(method))
}

/// [resolve_profiles] using the hit method and tolerance of `rules`.
pub fn resolve_profiles_with_rules(
    first: &HitProfile,
    second: &HitProfile,
    rules: &RuleSet,
) -> Result<ProfileOdds> {
    rules.validate()?;
    let first_units = first.units() as usize;
    let second_units = second.units() as usize;
    let columns = second_units + 1;

    let first_dists = (0..=first_units)
        .map(|casualties| {
            hits_for(&first.after_casualties(casualties as u32), rules.hit_method, rules.tolerance)
        })
        .collect::<Result<Vec<_>>>()?;
    let second_dists = (0..=second_units)
        .map(|casualties| {
            hits_for(&second.after_casualties(casualties as u32), rules.hit_method, rules.tolerance)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut plane = vec![0.0; (first_units + 1) * columns];
    plane[0] = 1.0;
    walk_classes(
        &mut plane,
        &first_dists,
        &second_dists,
        first_units,
        second_units,
        rules.tolerance,
    )?;

    let mut odds = ProfileOdds::default();
    for first_casualties in 0..=first_units {
        for second_casualties in 0..=second_units {
            let p = plane[first_casualties * columns + second_casualties];
            if p == 0.0 {
                continue;
            }
            match (first_casualties == first_units, second_casualties == second_units) {
                (true, true) => odds.tie += p,
                (false, true) => odds.win += p,
                (true, false) => odds.loss += p,
                (false, false) => {
                    odds.loss += p;
                    odds.stalemate += p;
                }
            }
        }
    }

    let total = odds.total();
    if (1.0 - total).abs() > rules.tolerance {
        return Err(OddsError::InvariantViolation {
            stage: "profile outcomes".to_string(),
            total,
        });
    }
    Ok(odds)
}
