use chrono::{DateTime, Utc};

use crate::session::mode::Mode;
use crate::session::result::SessionOutcome;
use crate::store::schema::Reward;

pub const STREAK_MASTER_STREAK: u32 = 10;
pub const SPEED_DEMON_CORRECT: u32 = 10;
pub const SURVIVOR_SCORE: u32 = 200;
const FINAL_WORLD: u8 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RewardDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

impl RewardDef {
    pub fn earn(&self, earned_date: DateTime<Utc>) -> Reward {
        Reward {
            id: self.id.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            icon: self.icon.to_string(),
            earned_date,
        }
    }
}

pub const FIRST_STEPS: RewardDef = RewardDef {
    id: "first_steps",
    name: "First Steps",
    description: "Finish your first game",
    icon: "👣",
};

pub const PERFECT_ROUND: RewardDef = RewardDef {
    id: "perfect_round",
    name: "Perfect Round",
    description: "Answer every question right",
    icon: "💯",
};

pub const STREAK_MASTER: RewardDef = RewardDef {
    id: "streak_master",
    name: "Streak Master",
    description: "Get 10 answers right in a row",
    icon: "🔥",
};

pub const SPEED_DEMON: RewardDef = RewardDef {
    id: "speed_demon",
    name: "Speed Demon",
    description: "Get 10 right in a timed challenge",
    icon: "⚡",
};

pub const SURVIVOR: RewardDef = RewardDef {
    id: "survivor",
    name: "Survivor",
    description: "Score 200 points in endless mode",
    icon: "🛡️",
};

pub const BOSS_SLAYER: RewardDef = RewardDef {
    id: "boss_slayer",
    name: "Boss Slayer",
    description: "Defeat your first boss",
    icon: "⚔️",
};

pub const DRAGON_TAMER: RewardDef = RewardDef {
    id: "dragon_tamer",
    name: "Dragon Tamer",
    description: "Defeat the Math Dragon",
    icon: "🐉",
};

pub const CATALOG: &[RewardDef] = &[
    FIRST_STEPS,
    PERFECT_ROUND,
    STREAK_MASTER,
    SPEED_DEMON,
    SURVIVOR,
    BOSS_SLAYER,
    DRAGON_TAMER,
];

pub fn find(id: &str) -> Option<&'static RewardDef> {
    CATALOG.iter().find(|r| r.id == id)
}

fn qualifies(def: &RewardDef, outcome: &SessionOutcome) -> bool {
    let boss_won = outcome.victory && outcome.mode.is_boss();
    match def.id {
        "first_steps" => outcome.progress_entry().is_some(),
        "perfect_round" => {
            outcome.victory
                && !matches!(outcome.mode, Mode::Endless)
                && outcome.total_questions > 0
                && outcome.correct == outcome.total_questions
        }
        "streak_master" => outcome.best_streak >= STREAK_MASTER_STREAK,
        "speed_demon" => {
            matches!(outcome.mode, Mode::Practice { timed: true, .. })
                && outcome.correct >= SPEED_DEMON_CORRECT
        }
        "survivor" => outcome.mode == Mode::Endless && outcome.score >= SURVIVOR_SCORE,
        "boss_slayer" => boss_won,
        "dragon_tamer" => boss_won && outcome.world_id() == Some(FINAL_WORLD),
        _ => false,
    }
}

/// Rewards this outcome qualifies for. The store drops ones already held.
pub fn earned_rewards(outcome: &SessionOutcome, now: DateTime<Utc>) -> Vec<Reward> {
    CATALOG
        .iter()
        .filter(|def| qualifies(def, outcome))
        .map(|def| def.earn(now))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Operation;

    fn outcome(mode: Mode) -> SessionOutcome {
        SessionOutcome {
            mode,
            victory: true,
            difficulty: "easy".to_string(),
            score: 0,
            correct: 0,
            answered: 0,
            total_questions: 10,
            best_streak: 0,
            stars: 0,
            xp: 0,
            lives_left: 3,
            endless_level: 1,
        }
    }

    fn ids(rewards: &[Reward]) -> Vec<&str> {
        rewards.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_catalog_ids_unique() {
        for (i, a) in CATALOG.iter().enumerate() {
            assert!(CATALOG[i + 1..].iter().all(|b| b.id != a.id), "{}", a.id);
            assert_eq!(find(a.id), Some(a));
        }
    }

    #[test]
    fn test_perfect_practice_round() {
        let mut o = outcome(Mode::practice(Operation::Addition));
        o.correct = 10;
        o.answered = 10;
        o.best_streak = 10;
        let earned = earned_rewards(&o, Utc::now());
        assert_eq!(ids(&earned), ["first_steps", "perfect_round", "streak_master"]);
    }

    #[test]
    fn test_timed_and_endless_rewards() {
        let mut timed = outcome(Mode::timed(Operation::Multiplication));
        timed.correct = 12;
        timed.answered = 14;
        assert!(ids(&earned_rewards(&timed, Utc::now())).contains(&"speed_demon"));

        let mut endless = outcome(Mode::Endless);
        endless.victory = false;
        endless.score = 230;
        let earned = earned_rewards(&endless, Utc::now());
        assert_eq!(ids(&earned), ["first_steps", "survivor"]);
    }

    #[test]
    fn test_boss_rewards() {
        let beaten = outcome(Mode::adventure_boss(6).unwrap());
        let earned = earned_rewards(&beaten, Utc::now());
        assert!(ids(&earned).contains(&"boss_slayer"));
        assert!(ids(&earned).contains(&"dragon_tamer"));

        let mut lost = outcome(Mode::adventure_boss(1).unwrap());
        lost.victory = false;
        assert!(earned_rewards(&lost, Utc::now()).is_empty());
    }
}
