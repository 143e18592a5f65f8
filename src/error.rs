use thiserror::Error;

use crate::data::unit::UnitType;

/// Which side of an engagement an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Attacker,
    Defender,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attacker => "attacker",
            Self::Defender => "defender",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum OddsError {
    #[error("{side} removal order does not list {unit}")]
    MissingFromRemovalOrder { side: Side, unit: UnitType },

    #[error("unknown removal order token '{0}'")]
    UnknownRemovalToken(char),

    #[error("removal order lists {0} more than once")]
    DuplicateRemovalToken(UnitType),

    #[error("{side} must hold the territory but has no ground unit to preserve")]
    NoGroundUnitToPreserve { side: Side },

    #[error("negative count {count} for {unit}")]
    NegativeCount { unit: UnitType, count: i64 },

    #[error("invalid rule '{name}': {reason}")]
    InvalidRule { name: &'static str, reason: String },

    #[error("probability mass {total} drifted from 1 during {stage}")]
    InvariantViolation { stage: String, total: f64 },

    #[error("invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl OddsError {
    /// True for errors caused by the caller's input rather than a defect in the engine.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::InvariantViolation { .. })
    }
}

pub type Result<T> = std::result::Result<T, OddsError>;
