//! Scenario files: a battle setup (forces, removal orders, rules) stored as YAML or JSON.
//!
//! ```yaml
//! name: small landing
//! attacker:
//!   owner: united_states
//!   units: { infantry: 2, armor: 2, battleship: 1 }
//! defenders:
//!   - owner: germany
//!     units: { infantry: 6 }
//! attacker_order: IATFB
//! preserve_survivor: true
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::combat::{resolve_battle_with_rules, BattleOdds, RemovalOrder};
use crate::data::force::Force;
use crate::data::rules::RuleSet;
use crate::error::{OddsError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    pub attacker: Force,
    /// Allied defending forces; they fight as one combined force.
    #[serde(default)]
    pub defenders: Vec<Force>,
    #[serde(default = "RemovalOrder::default_attack")]
    pub attacker_order: RemovalOrder,
    #[serde(default = "RemovalOrder::default_defense")]
    pub defender_order: RemovalOrder,
    #[serde(default = "default_preserve_survivor")]
    pub preserve_survivor: bool,
    #[serde(default)]
    pub rules: RuleSet,
}

fn default_preserve_survivor() -> bool {
    true
}

/// A list of scenarios in one file, resolved together by the batch runner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioSet {
    pub scenarios: Vec<Scenario>,
}

impl Scenario {
    pub fn new(attacker: Force, defender: Force) -> Self {
        Self {
            name: None,
            attacker,
            defenders: vec![defender],
            attacker_order: RemovalOrder::default_attack(),
            defender_order: RemovalOrder::default_defense(),
            preserve_survivor: default_preserve_survivor(),
            rules: RuleSet::default(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn preserving_survivor(mut self, preserve_survivor: bool) -> Self {
        self.preserve_survivor = preserve_survivor;
        self
    }

    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }

    /// Combined defending force.
    pub fn defending(&self) -> Force {
        self.defenders.iter().sum()
    }

    pub fn resolve(&self) -> Result<BattleOdds> {
        let _span = tracing::debug_span!("scenario", name = self.label()).entered();
        resolve_battle_with_rules(
            &self.attacker,
            &self.defending(),
            &self.attacker_order,
            &self.defender_order,
            self.preserve_survivor,
            &self.rules,
        )
    }
}

enum Format {
    Yaml,
    Json,
}

fn format_for(path: &Path) -> Result<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => Ok(Format::Yaml),
        Some("json") => Ok(Format::Json),
        _ => Err(OddsError::InvalidScenario(format!(
            "'{}' is neither .yaml nor .json",
            path.display()
        ))),
    }
}

fn parse<T: for<'de> Deserialize<'de>>(raw: &str, format: Format) -> Result<T> {
    Ok(match format {
        Format::Yaml => serde_yaml::from_str(raw)?,
        Format::Json => serde_json::from_str(raw)?,
    })
}

pub fn parse_scenario_yaml(raw: &str) -> Result<Scenario> {
    parse(raw, Format::Yaml)
}

pub fn parse_scenario_json(raw: &str) -> Result<Scenario> {
    parse(raw, Format::Json)
}

/// Load one scenario; the format is picked from the file extension.
pub fn load_scenario(path: impl AsRef<Path>) -> Result<Scenario> {
    let path = path.as_ref();
    let format = format_for(path)?;
    let raw = fs::read_to_string(path)?;
    parse(&raw, format)
}

/// Load a `{ scenarios: [...] }` file.
pub fn load_scenario_set(path: impl AsRef<Path>) -> Result<ScenarioSet> {
    let path = path.as_ref();
    let format = format_for(path)?;
    let raw = fs::read_to_string(path)?;
    let set: ScenarioSet = parse(&raw, format)?;
    tracing::debug!(path = %path.display(), scenarios = set.scenarios.len(), "loaded scenario set");
    Ok(set)
}
