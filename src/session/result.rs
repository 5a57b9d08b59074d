use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::engine::adventure::AdventureState;
use crate::engine::rewards;
use crate::engine::scoring;
use crate::generator::{Operation, QuestionSource};
use crate::session::mode::Mode;
use crate::session::state::{Phase, Session};
use crate::store::backend::StorageBackend;
use crate::store::json_store::GameStore;
use crate::store::schema::Reward;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    #[default]
    Practice,
    Timed,
    Endless,
    Adventure,
}

impl SessionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionKind::Practice => "practice",
            SessionKind::Timed => "timed",
            SessionKind::Endless => "endless",
            SessionKind::Adventure => "adventure",
        }
    }
}

/// A finished session as it is kept in the progress history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub id: String,
    pub operation: Operation,
    pub difficulty: String,
    pub score: u32,
    pub correct_answers: u32,
    pub total_questions: u32,
    pub stars_earned: u8,
    #[serde(default)]
    pub best_streak: u32,
    #[serde(default)]
    pub mode: SessionKind,
    pub created_date: DateTime<Utc>,
}

/// A progress record before the store assigns its id and date.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressEntry {
    pub operation: Operation,
    pub difficulty: String,
    pub score: u32,
    pub correct_answers: u32,
    pub total_questions: u32,
    pub stars_earned: u8,
    pub best_streak: u32,
    pub mode: SessionKind,
}

impl ProgressRecord {
    pub fn from_entry(entry: ProgressEntry, id: String, created_date: DateTime<Utc>) -> Self {
        Self {
            id,
            operation: entry.operation,
            difficulty: entry.difficulty,
            score: entry.score,
            correct_answers: entry.correct_answers,
            total_questions: entry.total_questions,
            stars_earned: entry.stars_earned,
            best_streak: entry.best_streak,
            mode: entry.mode,
            created_date,
        }
    }
}

/// Summary of a terminal session, independent of how it gets stored.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionOutcome {
    pub mode: Mode,
    pub victory: bool,
    pub difficulty: String,
    pub score: u32,
    pub correct: u32,
    pub answered: u32,
    pub total_questions: u32,
    pub best_streak: u32,
    pub stars: u8,
    pub xp: u32,
    pub lives_left: u32,
    pub endless_level: u32,
}

impl SessionOutcome {
    /// None until the session reaches a terminal phase.
    pub fn from_session<Q: QuestionSource>(session: &Session<Q>) -> Option<Self> {
        if !session.phase().is_terminal() {
            return None;
        }
        let mode = session.mode();
        let victory = session.phase() == Phase::Completed;
        let rules = session.rules();

        let difficulty = match mode {
            Mode::Endless => format!("endless-{}", session.endless_level()),
            _ => session.difficulty().unwrap_or_default().as_str().to_string(),
        };
        let total_questions = match mode {
            Mode::Endless => session.answered(),
            _ => session.total_questions().unwrap_or(session.answered()),
        };
        let stars = match mode {
            Mode::Practice { .. } => scoring::practice_stars(session.correct(), total_questions),
            Mode::Endless => scoring::endless_stars(session.score()),
            Mode::AdventureLevel { .. } | Mode::AdventureBoss { .. } if victory => {
                scoring::adventure_stars(session.lives(), rules.max_lives)
            }
            _ => 0,
        };

        Some(Self {
            mode,
            victory,
            difficulty,
            score: session.score(),
            correct: session.correct(),
            answered: session.answered(),
            total_questions,
            best_streak: session.best_streak(),
            stars,
            xp: session.xp(),
            lives_left: session.lives(),
            endless_level: session.endless_level(),
        })
    }

    pub fn kind(&self) -> SessionKind {
        self.mode.kind()
    }

    pub fn world_id(&self) -> Option<u8> {
        self.mode.world().map(|w| w.id)
    }

    /// Adventure XP including the victory bonus.
    pub fn total_xp(&self) -> u32 {
        let bonus = match (self.mode, self.victory) {
            (Mode::AdventureLevel { .. }, true) => scoring::LEVEL_VICTORY_XP,
            (Mode::AdventureBoss { .. }, true) => scoring::BOSS_VICTORY_XP,
            _ => 0,
        };
        self.xp + bonus
    }

    /// The history entry this outcome produces, if it produces one.
    /// Lost adventure runs leave no trace.
    pub fn progress_entry(&self) -> Option<ProgressEntry> {
        if self.mode.world().is_some() && !self.victory {
            return None;
        }
        let score = match self.mode {
            Mode::AdventureLevel { .. } | Mode::AdventureBoss { .. } => self.total_xp(),
            _ => self.score,
        };
        Some(ProgressEntry {
            operation: self.mode.operation(),
            difficulty: self.difficulty.clone(),
            score,
            correct_answers: self.correct,
            total_questions: self.total_questions,
            stars_earned: self.stars,
            best_streak: self.best_streak,
            mode: self.kind(),
        })
    }
}

/// What a terminal write actually changed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordReceipt {
    pub record: Option<ProgressRecord>,
    /// Endless high score after this run.
    pub high_score: Option<u32>,
    pub new_rewards: Vec<Reward>,
    pub adventure: Option<AdventureState>,
}

/// Persist an outcome. Storage failures are logged and skipped so a full or
/// read-only store never takes the game down.
pub fn record_outcome<B: StorageBackend>(
    outcome: &SessionOutcome,
    store: &GameStore<B>,
) -> RecordReceipt {
    let mut receipt = RecordReceipt::default();

    if outcome.mode == Mode::Endless {
        match store.save_endless_high_score(outcome.score) {
            Ok(best) => receipt.high_score = Some(best),
            Err(e) => warn!(error = %e, "failed to save endless high score"),
        }
    }

    if let (Some(world), true) = (outcome.mode.world(), outcome.victory) {
        let updated = store.update_adventure(|ledger| {
            match outcome.mode {
                Mode::AdventureLevel { level, .. } => {
                    ledger.record_level_victory(world.id, level);
                }
                Mode::AdventureBoss { .. } => {
                    ledger.record_boss_victory(world.id);
                }
                _ => {}
            }
            ledger.add_xp(outcome.total_xp());
        });
        match updated {
            Ok(ledger) => receipt.adventure = Some(ledger),
            Err(e) => warn!(error = %e, world = world.id, "failed to save adventure progress"),
        }
    }

    if let Some(entry) = outcome.progress_entry() {
        let stars = entry.stars_earned;
        match store.append_progress(entry) {
            Ok(record) => {
                info!(
                    id = %record.id,
                    mode = record.mode.as_str(),
                    score = record.score,
                    stars = record.stars_earned,
                    "progress recorded"
                );
                receipt.record = Some(record);
            }
            Err(e) => warn!(error = %e, "failed to append progress"),
        }
        if stars > 0
            && let Err(e) = store.award_stars(u32::from(stars))
        {
            warn!(error = %e, "failed to update avatar stars");
        }
    }

    for reward in rewards::earned_rewards(outcome, Utc::now()) {
        match store.add_reward(reward) {
            Ok(Some(added)) => receipt.new_rewards.push(added),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "failed to save reward"),
        }
    }

    receipt
}

impl<Q: QuestionSource> Session<Q> {
    pub fn outcome(&self) -> Option<SessionOutcome> {
        SessionOutcome::from_session(self)
    }

    /// Write this session's results once it is over. Later calls do nothing.
    pub fn record<B: StorageBackend>(&mut self, store: &GameStore<B>) -> Option<RecordReceipt> {
        if self.recorded {
            return None;
        }
        let outcome = self.outcome()?;
        self.recorded = true;
        Some(record_outcome(&outcome, store))
    }
}
