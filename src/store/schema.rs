use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::adventure::AdventureState;
use crate::error::GameError;
use crate::session::result::ProgressRecord;

pub const NAMESPACE: &str = "math_";
pub const PROGRESS_KEY: &str = "progress";
pub const AVATAR_KEY: &str = "avatar";
pub const REWARDS_KEY: &str = "rewards";
pub const ADVENTURE_KEY: &str = "adventure";
pub const ENDLESS_HIGH_SCORE_KEY: &str = "endless_highscore";

pub const ALL_KEYS: &[&str] = &[
    PROGRESS_KEY,
    AVATAR_KEY,
    REWARDS_KEY,
    ADVENTURE_KEY,
    ENDLESS_HIGH_SCORE_KEY,
];

pub const DEFAULT_AVATAR_ID: &str = "1";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Character {
    #[default]
    Robot,
    Astronaut,
    Wizard,
    Superhero,
    Scientist,
    Artist,
}

pub const CHARACTERS: &[Character] = &[
    Character::Robot,
    Character::Astronaut,
    Character::Wizard,
    Character::Superhero,
    Character::Scientist,
    Character::Artist,
];

impl Character {
    pub fn as_str(self) -> &'static str {
        match self {
            Character::Robot => "robot",
            Character::Astronaut => "astronaut",
            Character::Wizard => "wizard",
            Character::Superhero => "superhero",
            Character::Scientist => "scientist",
            Character::Artist => "artist",
        }
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Character {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CHARACTERS
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| GameError::UnknownCharacter(s.to_string()))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvatarColor {
    #[default]
    Blue,
    Pink,
    Green,
    Purple,
    Orange,
    Yellow,
}

pub const AVATAR_COLORS: &[AvatarColor] = &[
    AvatarColor::Blue,
    AvatarColor::Pink,
    AvatarColor::Green,
    AvatarColor::Purple,
    AvatarColor::Orange,
    AvatarColor::Yellow,
];

impl AvatarColor {
    pub fn as_str(self) -> &'static str {
        match self {
            AvatarColor::Blue => "blue",
            AvatarColor::Pink => "pink",
            AvatarColor::Green => "green",
            AvatarColor::Purple => "purple",
            AvatarColor::Orange => "orange",
            AvatarColor::Yellow => "yellow",
        }
    }
}

impl fmt::Display for AvatarColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AvatarColor {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AVATAR_COLORS
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| GameError::UnknownColor(s.to_string()))
    }
}

/// The device's single avatar.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub selected_character: Character,
    #[serde(default)]
    pub selected_color: AvatarColor,
    #[serde(default)]
    pub total_stars: u32,
    pub updated_date: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub earned_date: DateTime<Utc>,
}

pub const EXPORT_VERSION: u32 = 1;

/// Whole-device backup of every persisted entity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportData {
    pub numquest_export_version: u32,
    pub exported_at: DateTime<Utc>,
    pub progress: Vec<ProgressRecord>,
    pub avatar: Option<Avatar>,
    pub rewards: Vec<Reward>,
    pub adventure: AdventureState,
    pub endless_high_score: u32,
}
