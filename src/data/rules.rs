//! Rule configuration for a resolution: anti-air dice, hit calculation method and
//! the probability tolerance used by invariant checks.
//!
//! Rules can be loaded from a YAML file; a missing file yields the defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::unit::DIE_SIDES;
use crate::error::{OddsError, Result};

/// Default face anti-air guns hit on during the preliminary strike.
pub const DEFAULT_ANTI_AIR_FACE: u8 = 1;
/// Default number of anti-air dice each gun rolls.
pub const DEFAULT_ANTI_AIR_SHOTS: u32 = 3;
/// Tolerance for "sums to one" checks on distributions and state tables.
pub const PROBABILITY_TOLERANCE: f64 = 1e-5;

/// How hit-count distributions are computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitMethod {
    /// Exact binomial convolution.
    #[default]
    Exact,
    /// Normal approximation; faster for very large forces but inexact.
    Approximate,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    pub anti_air_face: u8,
    pub anti_air_shots_per_gun: u32,
    pub hit_method: HitMethod,
    pub tolerance: f64,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            anti_air_face: DEFAULT_ANTI_AIR_FACE,
            anti_air_shots_per_gun: DEFAULT_ANTI_AIR_SHOTS,
            hit_method: HitMethod::Exact,
            tolerance: PROBABILITY_TOLERANCE,
        }
    }
}

impl RuleSet {
    pub fn with_hit_method(self, hit_method: HitMethod) -> Self {
        Self { hit_method, ..self }
    }

    pub fn validate(&self) -> Result<()> {
        if u32::from(self.anti_air_face) > DIE_SIDES {
            return Err(OddsError::InvalidRule {
                name: "anti_air_face",
                reason: format!("face {} exceeds a {DIE_SIDES}-sided die", self.anti_air_face),
            });
        }
        if !(self.tolerance > 0.0 && self.tolerance < 1.0) {
            return Err(OddsError::InvalidRule {
                name: "tolerance",
                reason: format!("{} is not in (0, 1)", self.tolerance),
            });
        }
        Ok(())
    }
}

/// Parse rules from YAML text and validate them.
pub fn parse_rules(raw: &str) -> Result<RuleSet> {
    let rules: RuleSet = serde_yaml::from_str(raw)?;
    rules.validate()?;
    Ok(rules)
}

/// Load rules from a YAML file. Returns the defaults if the file does not exist.
pub fn load_rules(path: impl AsRef<Path>) -> Result<RuleSet> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::debug!(path = %path.display(), "rules file missing, using defaults");
        return Ok(RuleSet::default());
    }
    let raw = fs::read_to_string(path)?;
    parse_rules(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults_for_missing_keys() {
        let rules = parse_rules("hit_method: approximate\n").unwrap();
        assert_eq!(rules.hit_method, HitMethod::Approximate);
        assert_eq!(rules.anti_air_face, DEFAULT_ANTI_AIR_FACE);
        assert_eq!(rules.anti_air_shots_per_gun, DEFAULT_ANTI_AIR_SHOTS);
    }

    #[test]
    fn out_of_range_face_is_rejected() {
        let err = parse_rules("anti_air_face: 7\n").unwrap_err();
        assert!(matches!(err, OddsError::InvalidRule { name: "anti_air_face", .. }));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let rules = load_rules("does/not/exist/rules.yaml").unwrap();
        assert_eq!(rules, RuleSet::default());
    }
}
