//! Casualty ball: precomputed residual hit dice for every number of casualties a force can absorb.
//!
//! A force's units are laid out once, in the order they will be sacrificed. Every lookup the
//! resolver makes afterwards (`remaining_hits`) is a constant-time array read, and surviving
//! forces are rebuilt with a single pass over that sequence.
//!
//! Anti-air fire only kills air units, so casualties are tracked in two counters: `ground`
//! (ordinary hits, taken in removal order among units anti-air fire did not already kill) and
//! `air` (anti-air kills, always the first air units in removal order).

use crate::combat::hits::HitProfile;
use crate::combat::order::RemovalOrder;
use crate::data::force::{Force, Power};
use crate::data::unit::{Role, UnitType};
use crate::error::{OddsError, Result, Side};

/// Preference for the unit kept alive to occupy a conquered territory.
const PRESERVE_PRIORITY: [UnitType; 4] = [
    UnitType::Armor,
    UnitType::Artillery,
    UnitType::Infantry,
    UnitType::SupportedInfantry,
];

#[derive(Debug, Clone)]
pub struct CasualtyBall {
    side: Side,
    role: Role,
    owner: Option<Power>,
    /// One entry per combatant in sacrifice order; a reserved survivor is always last.
    sequence: Vec<UnitType>,
    reserved: Option<UnitType>,
    value: u32,
    initial: HitProfile,
    /// `universal[t]`: dice left after the first `t` entries of `sequence` are removed.
    universal: Vec<HitProfile>,
    /// `air_losses[a]`: dice of the first `a` air units in `sequence`.
    air_losses: Vec<HitProfile>,
    /// `ground_losses[g]`: dice of the first `g` non-air units in `sequence`.
    ground_losses: Vec<HitProfile>,
    /// `air_in_prefix[t]`: air units among the first `t` entries of `sequence`.
    air_in_prefix: Vec<u32>,
}

impl CasualtyBall {
    pub fn new(
        force: &Force,
        role: Role,
        side: Side,
        order: &RemovalOrder,
        preserve_survivor: bool,
    ) -> Result<Self> {
        let mut troops = force.without_naval();
        let order = match role {
            Role::Attack => {
                let supported = troops[UnitType::Infantry].min(troops[UnitType::Artillery]);
                troops.set(UnitType::Infantry, troops[UnitType::Infantry] - supported);
                troops.add_units(UnitType::SupportedInfantry, supported);
                order.with_supported_infantry()
            }
            Role::Defense => order.clone(),
        };

        if let Some((unit, _)) = troops.iter().find(|(unit, _)| !order.contains(*unit)) {
            return Err(OddsError::MissingFromRemovalOrder { side, unit });
        }

        let value = troops.value();
        let reserved = if preserve_survivor {
            let unit = PRESERVE_PRIORITY
                .into_iter()
                .find(|unit| troops[*unit] > 0)
                .ok_or(OddsError::NoGroundUnitToPreserve { side })?;
            troops.set(unit, troops[unit] - 1);
            Some(unit)
        } else {
            None
        };

        let mut sequence = Vec::with_capacity(troops.total_units() as usize + 1);
        for &unit in order.units() {
            sequence.extend(std::iter::repeat(unit).take(troops[unit] as usize));
        }
        sequence.extend(reserved);

        let mut ball = Self {
            side,
            role,
            owner: force.owner,
            sequence,
            reserved,
            value,
            initial: HitProfile::EMPTY,
            universal: Vec::new(),
            air_losses: Vec::new(),
            ground_losses: Vec::new(),
            air_in_prefix: Vec::new(),
        };
        ball.precompute();
        Ok(ball)
    }

    fn precompute(&mut self) {
        let units = self.sequence.len();
        let mut initial = HitProfile::EMPTY;
        for unit in &self.sequence {
            initial.add_face(unit.face(self.role), 1);
        }

        let mut universal = Vec::with_capacity(units + 1);
        let mut air_in_prefix = Vec::with_capacity(units + 1);
        let mut air_losses = vec![HitProfile::EMPTY];
        let mut ground_losses = vec![HitProfile::EMPTY];

        let mut remaining = initial;
        let mut air_seen = 0;
        let mut air_taken = HitProfile::EMPTY;
        let mut ground_taken = HitProfile::EMPTY;
        universal.push(remaining);
        air_in_prefix.push(0);

        for unit in &self.sequence {
            let face = unit.face(self.role);
            remaining.0[face as usize] -= 1;
            universal.push(remaining);
            if unit.is_air() {
                air_seen += 1;
                air_taken.add_face(face, 1);
                air_losses.push(air_taken);
            } else {
                ground_taken.add_face(face, 1);
                ground_losses.push(ground_taken);
            }
            air_in_prefix.push(air_seen);
        }

        self.initial = initial;
        self.universal = universal;
        self.air_losses = air_losses;
        self.ground_losses = ground_losses;
        self.air_in_prefix = air_in_prefix;
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Number of units that can become casualties (ships excluded).
    pub fn units(&self) -> u32 {
        self.sequence.len() as u32
    }

    pub fn air_units(&self) -> u32 {
        (self.air_losses.len() - 1) as u32
    }

    /// Value of every casualty-eligible unit, reserved survivor included.
    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn reserved(&self) -> Option<UnitType> {
        self.reserved
    }

    pub fn sequence(&self) -> &[UnitType] {
        &self.sequence
    }

    pub fn initial_hits(&self) -> HitProfile {
        self.initial
    }

    /// Hit dice still in play after `ground` ordinary casualties and `air` anti-air casualties.
    #[inline]
    pub fn remaining_hits(&self, ground: u32, air: u32) -> HitProfile {
        let air = air.min(self.air_units()) as usize;
        let total = (ground as usize + air).min(self.sequence.len());
        if self.air_in_prefix[total] as usize >= air {
            // every anti-air kill lies inside the removed prefix
            return self.universal[total];
        }
        self.initial
            .minus(&self.air_losses[air])
            .minus(&self.ground_losses[ground as usize])
    }

    /// Units that survive `ground` ordinary and `air` anti-air casualties.
    /// Supported infantry is reported as plain infantry; ships are never included.
    pub fn remaining_force(&self, ground: u32, air: u32) -> Force {
        let mut survivors = Force::new(self.owner);
        if ground + air >= self.units() {
            return survivors;
        }

        let mut air_left = air;
        let mut ground_left = ground;
        for &unit in &self.sequence {
            if unit.is_air() && air_left > 0 {
                air_left -= 1;
            } else if ground_left > 0 {
                ground_left -= 1;
            } else {
                let unit = match unit {
                    UnitType::SupportedInfantry => UnitType::Infantry,
                    other => other,
                };
                survivors.add_units(unit, 1);
            }
        }
        survivors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attack_ball(force: &Force, order: &str, preserve: bool) -> Result<CasualtyBall> {
        CasualtyBall::new(
            force,
            Role::Attack,
            Side::Attacker,
            &order.parse().unwrap(),
            preserve,
        )
    }

    #[test]
    fn first_entry_is_live_histogram_and_last_is_empty() {
        let force = Force::empty()
            .with(UnitType::Infantry, 2)
            .with(UnitType::Armor, 1)
            .with(UnitType::Fighter, 1);
        let ball = attack_ball(&force, "IATFB", false).unwrap();
        assert_eq!(ball.remaining_hits(0, 0), HitProfile([0, 2, 0, 2, 0]));
        assert_eq!(ball.remaining_hits(4, 0), HitProfile::EMPTY);
        assert_eq!(ball.remaining_hits(2, 0), HitProfile([0, 0, 0, 2, 0]));
    }

    #[test]
    fn artillery_supports_infantry_one_to_one() {
        let force = Force::empty()
            .with(UnitType::Infantry, 3)
            .with(UnitType::Artillery, 2);
        let ball = attack_ball(&force, "IATFB", false).unwrap();
        assert_eq!(ball.initial_hits(), HitProfile([0, 1, 4, 0, 0]));
        assert_eq!(
            ball.sequence(),
            &[
                UnitType::Infantry,
                UnitType::SupportedInfantry,
                UnitType::SupportedInfantry,
                UnitType::Artillery,
                UnitType::Artillery,
            ]
        );
    }

    #[test]
    fn defenders_do_not_pair_infantry() {
        let force = Force::empty()
            .with(UnitType::Infantry, 2)
            .with(UnitType::Artillery, 1);
        let ball = CasualtyBall::new(
            &force,
            Role::Defense,
            Side::Defender,
            &RemovalOrder::default_defense(),
            false,
        )
        .unwrap();
        assert_eq!(ball.initial_hits(), HitProfile([0, 0, 3, 0, 0]));
    }

    #[test]
    fn ships_are_not_casualties() {
        let force = Force::empty()
            .with(UnitType::Infantry, 1)
            .with(UnitType::Battleship, 2)
            .with(UnitType::Transport, 1);
        let ball = attack_ball(&force, "I", false).unwrap();
        assert_eq!(ball.units(), 1);
        assert_eq!(ball.value(), 3);
    }

    #[test]
    fn reserved_survivor_dies_last() {
        let force = Force::empty()
            .with(UnitType::Infantry, 1)
            .with(UnitType::Armor, 1)
            .with(UnitType::Fighter, 1);
        let ball = attack_ball(&force, "IATFB", true).unwrap();
        assert_eq!(ball.reserved(), Some(UnitType::Armor));
        assert_eq!(ball.sequence().last(), Some(&UnitType::Armor));

        let survivors = ball.remaining_force(2, 0);
        assert_eq!(survivors.count(UnitType::Armor), 1);
        assert_eq!(survivors.total_units(), 1);
    }

    #[test]
    fn preserving_without_ground_units_fails() {
        let force = Force::empty().with(UnitType::Bomber, 2);
        let err = attack_ball(&force, "IATFB", true).unwrap_err();
        assert!(matches!(
            err,
            OddsError::NoGroundUnitToPreserve {
                side: Side::Attacker
            }
        ));
    }

    #[test]
    fn order_must_cover_every_unit_present() {
        let force = Force::empty()
            .with(UnitType::Infantry, 1)
            .with(UnitType::Bomber, 1);
        let err = attack_ball(&force, "IATF", false).unwrap_err();
        assert!(matches!(
            err,
            OddsError::MissingFromRemovalOrder {
                side: Side::Attacker,
                unit: UnitType::Bomber
            }
        ));
    }

    #[test]
    fn anti_air_kills_air_units_regardless_of_order_position() {
        let force = Force::empty()
            .with(UnitType::Infantry, 2)
            .with(UnitType::Fighter, 1)
            .with(UnitType::Bomber, 1);
        let ball = attack_ball(&force, "IATFB", false).unwrap();

        // one fighter shot down, no ordinary casualties yet
        assert_eq!(ball.remaining_hits(0, 1), HitProfile([0, 2, 0, 0, 1]));
        // fighter shot down, then one infantry lost
        assert_eq!(ball.remaining_hits(1, 1), HitProfile([0, 1, 0, 0, 1]));
        // both infantry lost after the fighter: only the bomber is left
        assert_eq!(ball.remaining_hits(2, 1), HitProfile([0, 0, 0, 0, 1]));

        let survivors = ball.remaining_force(1, 1);
        assert_eq!(survivors.count(UnitType::Infantry), 1);
        assert_eq!(survivors.count(UnitType::Fighter), 0);
        assert_eq!(survivors.count(UnitType::Bomber), 1);
    }

    #[test]
    fn air_first_orders_match_a_direct_recount() {
        let force = Force::empty()
            .with(UnitType::Fighter, 2)
            .with(UnitType::Infantry, 1)
            .with(UnitType::Armor, 1);
        let ball = attack_ball(&force, "FITB", false).unwrap();
        for air in 0..=2 {
            for ground in 0..=(4 - air) {
                let survivors = ball.remaining_force(ground, air);
                let mut recount = HitProfile::EMPTY;
                for (unit, count) in survivors.iter() {
                    recount.add_face(unit.attack_face(), count);
                }
                assert_eq!(
                    ball.remaining_hits(ground, air),
                    recount,
                    "ground={ground} air={air}"
                );
            }
        }
    }

    #[test]
    fn zero_casualties_returns_the_combatant_force() {
        let force = Force::new(Some(Power::UnitedStates))
            .with(UnitType::Infantry, 4)
            .with(UnitType::Artillery, 2)
            .with(UnitType::Armor, 1)
            .with(UnitType::Fighter, 1)
            .with(UnitType::Cruiser, 1);
        let ball = attack_ball(&force, "IATFB", true).unwrap();
        assert_eq!(ball.remaining_force(0, 0), force.without_naval());
        assert!(ball.remaining_force(ball.units(), 0).is_empty());
    }
}
