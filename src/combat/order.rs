use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::unit::UnitType;
use crate::error::{OddsError, Result};

pub const DEFAULT_ATTACK_ORDER: &str = "IATFB";
pub const DEFAULT_DEFENSE_ORDER: &str = "GIABTF";

/// Strict sacrifice priority: the first listed type is removed first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RemovalOrder(Vec<UnitType>);

impl RemovalOrder {
    pub fn new(units: Vec<UnitType>) -> Result<Self> {
        for (position, unit) in units.iter().enumerate() {
            if units[..position].contains(unit) {
                return Err(OddsError::DuplicateRemovalToken(*unit));
            }
        }
        Ok(Self(units))
    }

    pub fn default_attack() -> Self {
        Self(vec![
            UnitType::Infantry,
            UnitType::Artillery,
            UnitType::Armor,
            UnitType::Fighter,
            UnitType::Bomber,
        ])
    }

    pub fn default_defense() -> Self {
        Self(vec![
            UnitType::AntiAir,
            UnitType::Infantry,
            UnitType::Artillery,
            UnitType::Bomber,
            UnitType::Armor,
            UnitType::Fighter,
        ])
    }

    pub fn units(&self) -> &[UnitType] {
        &self.0
    }

    pub fn contains(&self, unit: UnitType) -> bool {
        self.0.contains(&unit)
    }

    /// Places supported infantry right after plain infantry unless the order already ranks it.
    pub fn with_supported_infantry(&self) -> Self {
        if self.contains(UnitType::SupportedInfantry) {
            return self.clone();
        }
        let mut units = Vec::with_capacity(self.0.len() + 1);
        for &unit in &self.0 {
            units.push(unit);
            if unit == UnitType::Infantry {
                units.push(UnitType::SupportedInfantry);
            }
        }
        Self(units)
    }
}

impl FromStr for RemovalOrder {
    type Err = OddsError;

    fn from_str(raw: &str) -> Result<Self> {
        let units = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|token| UnitType::from_token(token).ok_or(OddsError::UnknownRemovalToken(token)))
            .collect::<Result<Vec<_>>>()?;
        Self::new(units)
    }
}

impl TryFrom<String> for RemovalOrder {
    type Error = OddsError;

    fn try_from(raw: String) -> Result<Self> {
        raw.parse()
    }
}

impl From<RemovalOrder> for String {
    fn from(order: RemovalOrder) -> Self {
        order.to_string()
    }
}

impl fmt::Display for RemovalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for unit in &self.0 {
            if let Some(token) = unit.token() {
                write!(f, "{token}")?;
            }
        }
        Ok(())
    }
}
