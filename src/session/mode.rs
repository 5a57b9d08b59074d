use crate::config::Config;
use crate::engine::adventure::{self, World};
use crate::error::GameError;
use crate::generator::{Difficulty, Operation, Tier};
use crate::session::result::SessionKind;

/// Rule knobs a session runs under, taken from [`Config`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rules {
    pub practice_questions: u32,
    pub timed_seconds: u32,
    pub endless_question_seconds: u32,
    pub boss_question_seconds: u32,
    pub max_lives: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            practice_questions: 10,
            timed_seconds: 60,
            endless_question_seconds: 10,
            boss_question_seconds: 15,
            max_lives: 3,
        }
    }
}

impl From<&Config> for Rules {
    fn from(config: &Config) -> Self {
        Self {
            practice_questions: config.practice_questions,
            timed_seconds: config.timed_seconds,
            endless_question_seconds: config.endless_question_seconds,
            boss_question_seconds: config.boss_question_seconds,
            max_lives: config.max_lives,
        }
    }
}

/// The four ways to play. The variant picks the question source, scoring,
/// life policy and timer policy of a [`Session`](crate::session::Session).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Mode {
    Practice { operation: Operation, timed: bool },
    Endless,
    AdventureLevel { world: &'static World, level: u32 },
    AdventureBoss { world: &'static World },
}

impl Mode {
    pub fn practice(operation: Operation) -> Self {
        Mode::Practice {
            operation,
            timed: false,
        }
    }

    pub fn timed(operation: Operation) -> Self {
        Mode::Practice {
            operation,
            timed: true,
        }
    }

    pub fn adventure_level(world_id: u8, level: u32) -> Result<Self, GameError> {
        Ok(Mode::AdventureLevel {
            world: adventure::world(world_id)?,
            level: adventure::validate_level(level)?,
        })
    }

    pub fn adventure_boss(world_id: u8) -> Result<Self, GameError> {
        Ok(Mode::AdventureBoss {
            world: adventure::world(world_id)?,
        })
    }

    pub fn kind(&self) -> SessionKind {
        match self {
            Mode::Practice { timed: false, .. } => SessionKind::Practice,
            Mode::Practice { timed: true, .. } => SessionKind::Timed,
            Mode::Endless => SessionKind::Endless,
            Mode::AdventureLevel { .. } | Mode::AdventureBoss { .. } => SessionKind::Adventure,
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            Mode::Practice { operation, .. } => *operation,
            Mode::Endless => Operation::Mixed,
            Mode::AdventureLevel { world, .. } | Mode::AdventureBoss { world } => world.operation,
        }
    }

    pub fn world(&self) -> Option<&'static World> {
        match self {
            Mode::AdventureLevel { world, .. } | Mode::AdventureBoss { world } => Some(world),
            _ => None,
        }
    }

    pub fn is_boss(&self) -> bool {
        matches!(self, Mode::AdventureBoss { .. })
    }

    pub fn needs_difficulty(&self) -> bool {
        matches!(self, Mode::Practice { .. })
    }

    pub fn uses_lives(&self) -> bool {
        !matches!(self, Mode::Practice { .. })
    }

    /// Story line shown before play, if this level or boss has one.
    pub fn dialogue(&self) -> Option<&'static str> {
        match self {
            Mode::AdventureLevel { world, level } => world.dialogue_for_level(*level),
            Mode::AdventureBoss { world } => Some(world.boss.taunt),
            _ => None,
        }
    }

    /// Fixed question count, or None when play only ends on lives.
    pub fn question_count(&self, rules: &Rules) -> Option<u32> {
        match self {
            Mode::Practice { .. } => Some(rules.practice_questions),
            Mode::Endless => None,
            Mode::AdventureLevel { level, .. } => Some(adventure::level_question_count(*level)),
            Mode::AdventureBoss { world } => Some(world.boss.hp),
        }
    }

    /// Fixed difficulty for adventure play; practice asks the player.
    pub fn fixed_difficulty(&self) -> Option<Difficulty> {
        match self {
            Mode::AdventureLevel { level, .. } => Some(adventure::level_difficulty(*level)),
            Mode::AdventureBoss { .. } => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn tier(&self, difficulty: Difficulty, endless_level: u32) -> Tier {
        match self {
            Mode::Practice { .. } => Tier::Practice(difficulty),
            Mode::Endless => Tier::Endless(endless_level),
            Mode::AdventureLevel { .. } | Mode::AdventureBoss { .. } => Tier::Adventure(difficulty),
        }
    }
}
