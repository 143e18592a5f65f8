//! Force composition: how many of each unit type one side brings to a battle.

use std::collections::BTreeMap;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Index};

use serde::{Deserialize, Serialize};

use crate::data::unit::UnitType;
use crate::error::{OddsError, Result};

/// Owning power of a force. Informational only; the engine never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Power {
    Russia,
    Germany,
    UnitedKingdom,
    Japan,
    UnitedStates,
}

impl Power {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Russia => "Russia",
            Self::Germany => "Germany",
            Self::UnitedKingdom => "United Kingdom",
            Self::Japan => "Japan",
            Self::UnitedStates => "United States",
        }
    }
}

/// Unit counts keyed by [UnitType]. Counts are unsigned, so non-negativity holds by construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ForceSpec", into = "ForceSpec")]
pub struct Force {
    pub owner: Option<Power>,
    counts: [u32; UnitType::COUNT],
}

/// Serialized shape of a force: `{ owner: germany, units: { infantry: 3 } }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ForceSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    owner: Option<Power>,
    #[serde(default)]
    units: BTreeMap<UnitType, i64>,
}

impl TryFrom<ForceSpec> for Force {
    type Error = OddsError;

    fn try_from(spec: ForceSpec) -> Result<Self> {
        Force::from_signed_counts(spec.owner, spec.units)
    }
}

impl From<Force> for ForceSpec {
    fn from(force: Force) -> Self {
        ForceSpec {
            owner: force.owner,
            units: force
                .iter()
                .map(|(unit, count)| (unit, i64::from(count)))
                .collect(),
        }
    }
}

impl Force {
    pub fn new(owner: Option<Power>) -> Self {
        Self {
            owner,
            counts: [0; UnitType::COUNT],
        }
    }

    pub fn empty() -> Self {
        Self::new(None)
    }

    /// Builder-style helper: adds `count` units of `unit`.
    pub fn with(mut self, unit: UnitType, count: u32) -> Self {
        self.counts[unit.index()] += count;
        self
    }

    /// Builds a force from possibly-negative counts, rejecting any negative entry.
    pub fn from_signed_counts<I>(owner: Option<Power>, counts: I) -> Result<Self>
    where
        I: IntoIterator<Item = (UnitType, i64)>,
    {
        let mut force = Self::new(owner);
        for (unit, count) in counts {
            let count = u32::try_from(count).map_err(|_| OddsError::NegativeCount { unit, count })?;
            force.counts[unit.index()] += count;
        }
        Ok(force)
    }

    #[inline]
    pub fn count(&self, unit: UnitType) -> u32 {
        self.counts[unit.index()]
    }

    pub fn set(&mut self, unit: UnitType, count: u32) {
        self.counts[unit.index()] = count;
    }

    pub fn add_units(&mut self, unit: UnitType, count: u32) {
        self.counts[unit.index()] += count;
    }

    /// Non-zero `(unit, count)` pairs in catalogue order.
    pub fn iter(&self) -> impl Iterator<Item = (UnitType, u32)> + '_ {
        UnitType::ALL
            .into_iter()
            .map(|unit| (unit, self.count(unit)))
            .filter(|(_, count)| *count > 0)
    }

    pub fn total_units(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_units() == 0
    }

    /// Sum over unit types of count × relative value.
    pub fn value(&self) -> u32 {
        self.iter().map(|(unit, count)| count * unit.value()).sum()
    }

    fn count_where(&self, predicate: impl Fn(UnitType) -> bool) -> u32 {
        self.iter()
            .filter(|(unit, _)| predicate(*unit))
            .map(|(_, count)| count)
            .sum()
    }

    pub fn ground_units(&self) -> u32 {
        self.count_where(UnitType::is_ground)
    }

    pub fn air_units(&self) -> u32 {
        self.count_where(UnitType::is_air)
    }

    pub fn naval_units(&self) -> u32 {
        self.count_where(UnitType::is_naval)
    }

    /// The part of the force that takes casualties in a land battle (everything but ships).
    pub fn without_naval(&self) -> Self {
        let mut force = *self;
        for unit in UnitType::ALL.into_iter().filter(|unit| unit.is_naval()) {
            force.set(unit, 0);
        }
        force
    }
}

impl Index<UnitType> for Force {
    type Output = u32;

    fn index(&self, unit: UnitType) -> &u32 {
        &self.counts[unit.index()]
    }
}

impl AddAssign<&Force> for Force {
    fn add_assign(&mut self, other: &Force) {
        for (slot, extra) in self.counts.iter_mut().zip(other.counts) {
            *slot += extra;
        }
        if self.owner.is_none() {
            self.owner = other.owner;
        }
    }
}

impl AddAssign for Force {
    fn add_assign(&mut self, other: Force) {
        *self += &other;
    }
}

impl Add for Force {
    type Output = Force;

    /// Merges allied forces. The left-hand owner is kept.
    fn add(mut self, other: Force) -> Force {
        self += &other;
        self
    }
}

impl Sum for Force {
    fn sum<I: Iterator<Item = Force>>(iter: I) -> Force {
        iter.fold(Force::empty(), Add::add)
    }
}

impl<'a> Sum<&'a Force> for Force {
    fn sum<I: Iterator<Item = &'a Force>>(iter: I) -> Force {
        iter.fold(Force::empty(), |mut total, force| {
            total += force;
            total
        })
    }
}

impl fmt::Display for Force {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.owner {
            Some(owner) => writeln!(f, "{} force:", owner.as_str())?,
            None => writeln!(f, "force:")?,
        }
        for (unit, count) in self.iter() {
            writeln!(f, "  {count} {unit}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_sums_count_times_unit_value() {
        let force = Force::new(Some(Power::UnitedStates))
            .with(UnitType::Infantry, 2)
            .with(UnitType::Armor, 1)
            .with(UnitType::Battleship, 1);
        assert_eq!(force.value(), 2 * 3 + 6 + 20);
        assert_eq!(force.without_naval().value(), 12);
        assert_eq!(force.ground_units(), 3);
        assert_eq!(force.naval_units(), 1);
    }

    #[test]
    fn negative_counts_are_rejected() {
        let err = Force::from_signed_counts(None, [(UnitType::Infantry, 2), (UnitType::Fighter, -1)])
            .unwrap_err();
        assert!(matches!(
            err,
            OddsError::NegativeCount {
                unit: UnitType::Fighter,
                count: -1
            }
        ));
    }

    #[test]
    fn allied_forces_add_component_wise() {
        let german = Force::new(Some(Power::Germany)).with(UnitType::Infantry, 3);
        let japanese = Force::new(Some(Power::Japan))
            .with(UnitType::Infantry, 1)
            .with(UnitType::Fighter, 2);
        let merged: Force = [german, japanese].iter().sum();
        assert_eq!(merged.count(UnitType::Infantry), 4);
        assert_eq!(merged.count(UnitType::Fighter), 2);
        assert_eq!(merged.owner, Some(Power::Germany));
        assert_eq!(merged, german + japanese);
    }

    #[test]
    fn force_deserializes_from_unit_map() {
        let force: Force =
            serde_json::from_str(r#"{"owner":"japan","units":{"infantry":2,"bomber":1}}"#).unwrap();
        assert_eq!(force.owner, Some(Power::Japan));
        assert_eq!(force[UnitType::Infantry], 2);
        assert_eq!(force[UnitType::Bomber], 1);

        let negative = serde_json::from_str::<Force>(r#"{"units":{"infantry":-2}}"#);
        assert!(negative.is_err());
    }

    #[test]
    fn display_lists_only_present_units() {
        let force = Force::new(Some(Power::Russia)).with(UnitType::Artillery, 2);
        let text = force.to_string();
        assert!(text.starts_with("Russia force:"));
        assert!(text.contains("2 artillery"));
        assert!(!text.contains("infantry"));
    }
}
