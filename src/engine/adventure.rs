use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::generator::{Difficulty, Operation};

pub const WORLD_COUNT: u8 = 6;
pub const LEVELS_PER_WORLD: u32 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Boss {
    pub name: &'static str,
    pub hp: u32,
    pub taunt: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct World {
    pub id: u8,
    pub name: &'static str,
    pub operation: Operation,
    pub intro: &'static str,
    /// Story lines shown before specific levels.
    pub level_lines: &'static [(u32, &'static str)],
    pub boss: Boss,
}

impl World {
    pub fn dialogue_for_level(&self, level: u32) -> Option<&'static str> {
        self.level_lines
            .iter()
            .find(|(l, _)| *l == level)
            .map(|(_, line)| *line)
    }
}

pub const WORLDS: &[World] = &[
    World {
        id: 1,
        name: "Green Meadows",
        operation: Operation::Addition,
        intro: "Welcome, young hero! The Goblin King has stolen all the plus signs from our village. Help us get them back!",
        level_lines: &[
            (1, "Start with the easy ones. You can do it!"),
            (4, "You're getting stronger! The goblins are getting worried."),
            (8, "The Goblin King awaits. Are you ready?"),
        ],
        boss: Boss {
            name: "Goblin King",
            hp: 3,
            taunt: "So, you think you can defeat ME? Let's see how fast you can add!",
        },
    },
    World {
        id: 2,
        name: "Sandy Desert",
        operation: Operation::Subtraction,
        intro: "The Sand Serpent has cursed our oasis! Only subtraction magic can break the spell.",
        level_lines: &[
            (1, "The desert is hot, but you're hotter!"),
            (4, "Halfway there! The serpent grows restless."),
            (8, "The serpent's lair is near. Be brave!"),
        ],
        boss: Boss {
            name: "Sand Serpent",
            hp: 4,
            taunt: "Ssssso, you dare challenge me? Subtract THIS!",
        },
    },
    World {
        id: 3,
        name: "Crystal Cave",
        operation: Operation::Multiplication,
        intro: "Deep in the Crystal Cave, treasures multiply! But so do the dangers...",
        level_lines: &[
            (1, "These crystals glow with multiplication power!"),
            (4, "The cave gets darker, but your skills shine brighter!"),
            (8, "The Crystal Golem guards the deepest chamber."),
        ],
        boss: Boss {
            name: "Crystal Golem",
            hp: 4,
            taunt: "I am UNBREAKABLE! Multiply or be crushed!",
        },
    },
    World {
        id: 4,
        name: "Frozen Peaks",
        operation: Operation::Division,
        intro: "The Frozen Peaks hold the secret of division. Climb carefully, hero!",
        level_lines: &[
            (1, "The ice is slippery, but your mind is sharp!"),
            (4, "The wind howls, but you press on!"),
            (8, "The Ice Dragon's breath freezes everything. Everything except... math!"),
        ],
        boss: Boss {
            name: "Ice Dragon",
            hp: 5,
            taunt: "My icy breath will freeze your brain! Divide if you can!",
        },
    },
    World {
        id: 5,
        name: "Magic Forest",
        operation: Operation::Fractions,
        intro: "The Magic Forest speaks in fractions. Listen carefully to its wisdom.",
        level_lines: &[
            (1, "The trees whisper fraction secrets to those who listen."),
            (4, "The forest spirits are impressed by your progress!"),
            (8, "The Witch's tower looms ahead. She fears no one... except mathematicians!"),
        ],
        boss: Boss {
            name: "Forest Witch",
            hp: 5,
            taunt: "My potions are 3/4 complete! Can you solve my riddles in time?",
        },
    },
    World {
        id: 6,
        name: "Dragon Castle",
        operation: Operation::Decimals,
        intro: "The Dragon Castle! Home of the Math Dragon, the final boss of all!",
        level_lines: &[
            (1, "Decimals are the dragon's favorite. Learn them well!"),
            (4, "The castle trembles. The dragon knows you're coming!"),
            (8, "This is it. The final challenge awaits!"),
        ],
        boss: Boss {
            name: "Math Dragon",
            hp: 6,
            taunt: "I am the MATH DRAGON! Conquer decimals or perish!",
        },
    },
];

pub fn world(id: u8) -> Result<&'static World, GameError> {
    WORLDS
        .iter()
        .find(|w| w.id == id)
        .ok_or(GameError::UnknownWorld(id))
}

pub fn validate_level(level: u32) -> Result<u32, GameError> {
    if (1..=LEVELS_PER_WORLD).contains(&level) {
        Ok(level)
    } else {
        Err(GameError::InvalidLevel {
            level,
            max: LEVELS_PER_WORLD,
        })
    }
}

pub fn level_difficulty(level: u32) -> Difficulty {
    match level {
        0..=3 => Difficulty::Easy,
        4..=6 => Difficulty::Medium,
        _ => Difficulty::Hard,
    }
}

pub fn level_question_count(level: u32) -> u32 {
    5 + level
}

/// Adventure progression ledger, persisted under `math_adventure`.
///
/// `unlocked_worlds` and `defeated_bosses` only ever grow, and the current
/// world is always unlocked. Moving to another world is explicit navigation
/// through [`AdventureState::enter_world`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdventureState {
    pub current_world: u8,
    pub current_level: u32,
    pub defeated_bosses: BTreeSet<u8>,
    pub unlocked_worlds: BTreeSet<u8>,
    #[serde(rename = "totalXP")]
    pub total_xp: u64,
}

impl Default for AdventureState {
    fn default() -> Self {
        Self {
            current_world: 1,
            current_level: 1,
            defeated_bosses: BTreeSet::new(),
            unlocked_worlds: BTreeSet::from([1]),
            total_xp: 0,
        }
    }
}

impl AdventureState {
    /// Repair a hand-edited or partially written record so the invariants hold.
    pub fn normalize(&mut self) {
        self.current_world = self.current_world.clamp(1, WORLD_COUNT);
        self.current_level = self.current_level.clamp(1, LEVELS_PER_WORLD);
        self.unlocked_worlds.retain(|w| (1..=WORLD_COUNT).contains(w));
        self.defeated_bosses.retain(|w| (1..=WORLD_COUNT).contains(w));
        self.unlocked_worlds.insert(1);
        self.unlocked_worlds.insert(self.current_world);
    }

    pub fn is_world_unlocked(&self, world_id: u8) -> bool {
        self.unlocked_worlds.contains(&world_id)
    }

    pub fn is_boss_defeated(&self, world_id: u8) -> bool {
        self.defeated_bosses.contains(&world_id)
    }

    pub fn is_level_unlocked(&self, world_id: u8, level: u32) -> bool {
        self.current_world > world_id
            || (self.current_world == world_id && self.current_level >= level)
    }

    pub fn is_level_completed(&self, world_id: u8, level: u32) -> bool {
        self.current_world > world_id
            || (self.current_world == world_id && self.current_level > level)
    }

    /// Advance the level frontier after a won level. Returns true if it moved.
    pub fn record_level_victory(&mut self, world_id: u8, level: u32) -> bool {
        if self.current_world != world_id || level < self.current_level {
            return false;
        }
        self.current_level = level + 1;
        if self.current_level > LEVELS_PER_WORLD {
            self.current_level = 1;
        }
        true
    }

    /// Mark a boss beaten and open the next world. Returns true on first defeat.
    pub fn record_boss_victory(&mut self, world_id: u8) -> bool {
        if !self.defeated_bosses.insert(world_id) {
            return false;
        }
        if world_id < WORLD_COUNT {
            self.unlocked_worlds.insert(world_id + 1);
        }
        true
    }

    pub fn enter_world(&mut self, world_id: u8) -> Result<(), GameError> {
        world(world_id)?;
        if !self.is_world_unlocked(world_id) {
            return Err(GameError::WorldLocked(world_id));
        }
        if self.current_world != world_id {
            self.current_world = world_id;
            self.current_level = 1;
        }
        Ok(())
    }

    pub fn add_xp(&mut self, xp: u32) {
        self.total_xp += xp as u64;
    }

    pub fn all_bosses_defeated(&self) -> bool {
        (1..=WORLD_COUNT).all(|w| self.is_boss_defeated(w))
    }
}
