pub mod force;
pub mod rules;
pub mod scenario;
pub mod unit;
pub mod validate;

pub use force::{Force, Power};
pub use rules::{load_rules, parse_rules, HitMethod, RuleSet};
pub use scenario::{
    load_scenario, load_scenario_set, parse_scenario_json, parse_scenario_yaml, Scenario,
    ScenarioSet,
};
pub use unit::{Role, UnitType};
pub use validate::{
    validate_scenario, validate_scenario_file, ValidationDiagnostic, ValidationReport,
    ValidationSeverity,
};
