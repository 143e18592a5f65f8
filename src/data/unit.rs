//! Unit catalogue: hit-die faces, values and class flags for every unit type.
//! The set of types is closed, so every table is a `const` array indexed by `UnitType`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of sides on a combat die.
pub const DIE_SIDES: u32 = 6;

/// Number of hit-die buckets (faces 0..=4) tracked in a histogram.
pub const FACE_BUCKETS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    Infantry,
    /// Infantry paired with an artillery piece while attacking. Never appears in caller forces.
    SupportedInfantry,
    Artillery,
    Armor,
    AntiAir,
    Fighter,
    Bomber,
    Transport,
    Cruiser,
    Carrier,
    Battleship,
}

/// Role a force fights in; selects the hit-die table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Attack,
    Defense,
}

impl UnitType {
    pub const COUNT: usize = 11;

    pub const ALL: [UnitType; Self::COUNT] = [
        Self::Infantry,
        Self::SupportedInfantry,
        Self::Artillery,
        Self::Armor,
        Self::AntiAir,
        Self::Fighter,
        Self::Bomber,
        Self::Transport,
        Self::Cruiser,
        Self::Carrier,
        Self::Battleship,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Die face this unit hits on when attacking (0 = cannot hit).
    pub const fn attack_face(self) -> u8 {
        ATTACK_FACE[self.index()]
    }

    /// Die face this unit hits on when defending (0 = cannot hit).
    pub const fn defense_face(self) -> u8 {
        DEFENSE_FACE[self.index()]
    }

    pub const fn face(self, role: Role) -> u8 {
        match role {
            Role::Attack => self.attack_face(),
            Role::Defense => self.defense_face(),
        }
    }

    /// Relative value used for expected-loss accounting.
    pub const fn value(self) -> u32 {
        VALUE[self.index()]
    }

    pub const fn is_air(self) -> bool {
        matches!(self, Self::Fighter | Self::Bomber)
    }

    pub const fn is_naval(self) -> bool {
        matches!(
            self,
            Self::Transport | Self::Cruiser | Self::Carrier | Self::Battleship
        )
    }

    /// Units that can occupy a conquered territory.
    pub const fn is_ground(self) -> bool {
        matches!(
            self,
            Self::Infantry | Self::SupportedInfantry | Self::Artillery | Self::Armor
        )
    }

    /// Single-character token used in removal orders.
    pub const fn token(self) -> Option<char> {
        match self {
            Self::Infantry => Some('I'),
            Self::SupportedInfantry => Some('S'),
            Self::Artillery => Some('A'),
            Self::Armor => Some('T'),
            Self::AntiAir => Some('G'),
            Self::Fighter => Some('F'),
            Self::Bomber => Some('B'),
            Self::Transport | Self::Cruiser | Self::Carrier | Self::Battleship => None,
        }
    }

    pub fn from_token(token: char) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|unit| unit.token() == Some(token.to_ascii_uppercase()))
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Infantry => "infantry",
            Self::SupportedInfantry => "supported infantry",
            Self::Artillery => "artillery",
            Self::Armor => "armor",
            Self::AntiAir => "anti-air",
            Self::Fighter => "fighter",
            Self::Bomber => "bomber",
            Self::Transport => "transport",
            Self::Cruiser => "cruiser",
            Self::Carrier => "carrier",
            Self::Battleship => "battleship",
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const ATTACK_FACE: [u8; UnitType::COUNT] = [1, 2, 2, 3, 0, 3, 4, 0, 3, 1, 4];
const DEFENSE_FACE: [u8; UnitType::COUNT] = [2, 2, 2, 3, 0, 4, 1, 0, 3, 2, 4];
const VALUE: [u32; UnitType::COUNT] = [3, 3, 4, 6, 5, 10, 12, 7, 12, 14, 20];
