use std::fmt;
use std::path::Path;

use crate::data::scenario::{load_scenario, Scenario};
use crate::data::unit::UnitType;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

/// Check a scenario for problems that would make resolution fail (errors) or that silently
/// change what gets computed (warnings).
pub fn validate_scenario(scenario: &Scenario) -> ValidationReport {
    let mut report = ValidationReport::default();
    let attacker = &scenario.attacker;
    let defender = scenario.defending();

    if let Err(err) = scenario.rules.validate() {
        report.push(ValidationSeverity::Error, "rules", err.to_string());
    }

    for (unit, _) in attacker.iter().filter(|(unit, _)| !unit.is_naval()) {
        let listed = scenario.attacker_order.contains(unit)
            || (unit == UnitType::SupportedInfantry
                && scenario.attacker_order.contains(UnitType::Infantry));
        if !listed {
            report.push(
                ValidationSeverity::Error,
                "attacker_order",
                format!("{unit} is missing from removal order '{}'", scenario.attacker_order),
            );
        }
    }
    for (unit, _) in defender.iter().filter(|(unit, _)| !unit.is_naval()) {
        if !scenario.defender_order.contains(unit) {
            report.push(
                ValidationSeverity::Error,
                "defender_order",
                format!("{unit} is missing from removal order '{}'", scenario.defender_order),
            );
        }
    }

    if attacker.count(UnitType::SupportedInfantry) > 0 {
        report.push(
            ValidationSeverity::Warning,
            "attacker",
            "supported infantry is derived from infantry and artillery; list plain infantry instead",
        );
    }

    if scenario.preserve_survivor && attacker.ground_units() == 0 {
        report.push(
            ValidationSeverity::Error,
            "attacker",
            "preserve_survivor is set but the attacker has no ground unit to keep alive",
        );
    }

    let bombard_ships =
        attacker.count(UnitType::Battleship) + attacker.count(UnitType::Cruiser);
    if bombard_ships > attacker.ground_units() {
        report.push(
            ValidationSeverity::Warning,
            "attacker",
            format!(
                "{bombard_ships} bombarding ship(s) but only {} ground unit(s); extra ships do not fire",
                attacker.ground_units()
            ),
        );
    }
    for unit in [UnitType::Transport, UnitType::Carrier] {
        if attacker.count(unit) > 0 {
            report.push(
                ValidationSeverity::Warning,
                "attacker",
                format!("{unit} does not fight in a land battle"),
            );
        }
    }
    if defender.naval_units() > 0 {
        report.push(
            ValidationSeverity::Warning,
            "defenders",
            "defending naval units do not fight in a land battle",
        );
    }

    let guns = defender.count(UnitType::AntiAir);
    if guns > 0 && attacker.air_units() == 0 {
        report.push(
            ValidationSeverity::Info,
            "defenders",
            "anti-aircraft guns have no aircraft to fire at",
        );
    }

    if attacker.total_units() == 0 {
        report.push(ValidationSeverity::Info, "attacker", "attacker is empty");
    }
    if defender.total_units() == 0 {
        report.push(ValidationSeverity::Info, "defenders", "defender is empty");
    }

    report
}

/// Load a scenario file and validate it. I/O and parse failures are returned as errors,
/// everything else ends up in the report.
pub fn validate_scenario_file(path: impl AsRef<Path>) -> Result<ValidationReport> {
    let scenario = load_scenario(path)?;
    Ok(validate_scenario(&scenario))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::RemovalOrder;
    use crate::data::force::Force;

    fn scenario(attacker: Force, defender: Force) -> Scenario {
        Scenario::new(attacker, defender)
    }

    #[test]
    fn clean_scenario_has_no_errors_or_warnings() {
        let report = validate_scenario(&scenario(
            Force::empty().with(UnitType::Infantry, 3).with(UnitType::Armor, 1),
            Force::empty().with(UnitType::Infantry, 2),
        ));
        assert!(!report.has_errors());
        assert_eq!(report.count(ValidationSeverity::Warning), 0);
    }

    #[test]
    fn missing_order_entries_are_errors() {
        let mut s = scenario(
            Force::empty().with(UnitType::Infantry, 1).with(UnitType::Bomber, 1),
            Force::empty().with(UnitType::AntiAir, 1),
        );
        s.attacker_order = "I".parse::<RemovalOrder>().unwrap();
        s.defender_order = "I".parse::<RemovalOrder>().unwrap();
        let report = validate_scenario(&s);
        assert!(report.has_errors());
        assert!(report
            .diagnostics
            .iter()
            .any(|d| d.context == "attacker_order"));
        assert!(report
            .diagnostics
            .iter()
            .any(|d| d.context == "defender_order"));
    }

    #[test]
    fn preserving_without_ground_units_is_an_error() {
        let report = validate_scenario(&scenario(
            Force::empty().with(UnitType::Fighter, 2),
            Force::empty().with(UnitType::Infantry, 1),
        ));
        assert!(report.has_errors());
    }

    #[test]
    fn idle_ships_are_warnings() {
        let report = validate_scenario(&scenario(
            Force::empty()
                .with(UnitType::Infantry, 1)
                .with(UnitType::Battleship, 2)
                .with(UnitType::Transport, 1),
            Force::empty().with(UnitType::Infantry, 1),
        ));
        assert!(!report.has_errors());
        assert_eq!(report.count(ValidationSeverity::Warning), 2);
    }
}
