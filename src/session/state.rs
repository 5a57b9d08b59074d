use tracing::debug;

use crate::config::Config;
use crate::engine::scoring;
use crate::error::SessionError;
use crate::generator::{Difficulty, MAX_ENDLESS_LEVEL, Question, QuestionGenerator, QuestionSource};
use crate::session::input;
use crate::session::mode::{Mode, Rules};
use crate::timer::Countdown;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingDifficulty,
    Dialogue,
    InProgress,
    Feedback,
    Completed,
    Failed,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Completed | Phase::Failed)
    }
}

/// Result of one answered (or timed-out) question, shown before advancing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub correct: bool,
    pub timed_out: bool,
    pub points: u32,
    /// The expected answer, revealed on a miss.
    pub correct_answer: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    /// The timed challenge clock ran out; the session is over.
    TimeUp,
    /// An endless question expired: a life is gone and play moved on.
    QuestionExpired(Feedback),
    /// The boss struck before an answer came in; same question, clock reset.
    BossStrike,
}

/// One play-through of a [`Mode`]: the question flow, counters and clocks.
///
/// Driven from outside with `start`, `choose_difficulty`, `dismiss_dialogue`,
/// `submit`, `advance` and one `tick` per second.
pub struct Session<Q: QuestionSource = QuestionGenerator> {
    mode: Mode,
    rules: Rules,
    source: Q,
    phase: Phase,
    difficulty: Option<Difficulty>,
    question: Option<Question>,
    index: u32,
    answered: u32,
    correct: u32,
    score: u32,
    streak: u32,
    best_streak: u32,
    lives: u32,
    boss_hp: u32,
    xp: u32,
    endless_level: u32,
    session_timer: Option<Countdown>,
    question_timer: Option<Countdown>,
    last_feedback: Option<Feedback>,
    pub(crate) recorded: bool,
}

impl Session<QuestionGenerator> {
    pub fn new(mode: Mode, config: &Config) -> Self {
        Self::with_source(mode, Rules::from(config), QuestionGenerator::new())
    }
}

impl<Q: QuestionSource> Session<Q> {
    pub fn with_source(mode: Mode, rules: Rules, source: Q) -> Self {
        Self {
            mode,
            rules,
            source,
            phase: Phase::Idle,
            difficulty: mode.fixed_difficulty(),
            question: None,
            index: 0,
            answered: 0,
            correct: 0,
            score: 0,
            streak: 0,
            best_streak: 0,
            lives: rules.max_lives,
            boss_hp: 0,
            xp: 0,
            endless_level: 1,
            session_timer: None,
            question_timer: None,
            last_feedback: None,
            recorded: false,
        }
    }

    pub fn start(&mut self) -> Result<Phase, SessionError> {
        if self.phase != Phase::Idle {
            return Err(if self.phase.is_terminal() {
                SessionError::Finished
            } else {
                SessionError::NotStarted
            });
        }
        if self.mode.needs_difficulty() && self.difficulty.is_none() {
            self.set_phase(Phase::AwaitingDifficulty);
        } else if self.mode.dialogue().is_some() {
            self.set_phase(Phase::Dialogue);
        } else {
            self.begin();
        }
        Ok(self.phase)
    }

    pub fn choose_difficulty(&mut self, difficulty: Difficulty) -> Result<Phase, SessionError> {
        if self.phase != Phase::AwaitingDifficulty {
            return Err(SessionError::NotChoosingDifficulty);
        }
        self.difficulty = Some(difficulty);
        self.begin();
        Ok(self.phase)
    }

    pub fn dismiss_dialogue(&mut self) -> Result<Phase, SessionError> {
        if self.phase != Phase::Dialogue {
            return Err(SessionError::NoDialogue);
        }
        self.begin();
        Ok(self.phase)
    }

    /// Play again with the same mode and difficulty. Only a session that is
    /// in play or over can restart.
    pub fn restart(&mut self) -> Result<Phase, SessionError> {
        if !matches!(
            self.phase,
            Phase::InProgress | Phase::Feedback | Phase::Completed | Phase::Failed
        ) {
            return Err(SessionError::NotStarted);
        }
        self.recorded = false;
        self.begin();
        Ok(self.phase)
    }

    fn begin(&mut self) {
        self.index = 0;
        self.answered = 0;
        self.correct = 0;
        self.score = 0;
        self.streak = 0;
        self.best_streak = 0;
        self.lives = self.rules.max_lives;
        self.xp = 0;
        self.endless_level = 1;
        self.last_feedback = None;
        self.boss_hp = match self.mode {
            Mode::AdventureBoss { world } => world.boss.hp,
            _ => 0,
        };
        self.session_timer = match self.mode {
            Mode::Practice { timed: true, .. } => Some(Countdown::new(self.rules.timed_seconds)),
            _ => None,
        };
        self.question_timer = match self.mode {
            Mode::Endless => Some(Countdown::new(self.rules.endless_question_seconds)),
            Mode::AdventureBoss { .. } => Some(Countdown::new(self.rules.boss_question_seconds)),
            _ => None,
        };
        self.next_question();
        self.set_phase(Phase::InProgress);
    }

    fn next_question(&mut self) {
        let difficulty = self.difficulty.unwrap_or_default();
        let tier = self.mode.tier(difficulty, self.endless_level);
        self.question = Some(self.source.generate(self.mode.operation(), tier));
        if let Some(timer) = self.question_timer.as_mut() {
            timer.reset();
        }
    }

    pub fn submit(&mut self, answer: &str) -> Result<Feedback, SessionError> {
        match self.phase {
            Phase::InProgress => {}
            Phase::Feedback => return Err(SessionError::InputLocked),
            Phase::Completed | Phase::Failed => return Err(SessionError::Finished),
            _ => return Err(SessionError::NotStarted),
        }
        if answer.trim().is_empty() {
            return Err(SessionError::EmptyAnswer);
        }
        let question = self.question.as_ref().ok_or(SessionError::NotStarted)?;
        let correct = input::is_correct(answer, &question.answer);
        let feedback = self.apply_answer(correct, false);
        self.last_feedback = Some(feedback.clone());
        self.set_phase(Phase::Feedback);
        Ok(feedback)
    }

    fn apply_answer(&mut self, correct: bool, timed_out: bool) -> Feedback {
        self.answered += 1;
        let mut points = 0;

        if correct {
            self.correct += 1;
            match self.mode {
                Mode::Practice { .. } => {
                    self.streak += 1;
                    points = scoring::practice_points(self.streak);
                    self.score += points;
                }
                Mode::Endless => {
                    points = scoring::endless_points(self.streak, self.endless_level);
                    let before = self.score;
                    self.score += points;
                    self.streak += 1;
                    if scoring::crossed_hundred(before, self.score) {
                        self.endless_level = (self.endless_level + 1).min(MAX_ENDLESS_LEVEL);
                    }
                }
                Mode::AdventureLevel { .. } => {
                    self.streak += 1;
                    points = scoring::LEVEL_XP_PER_CORRECT;
                    self.xp += points;
                    self.score = self.xp;
                }
                Mode::AdventureBoss { .. } => {
                    self.streak += 1;
                    self.boss_hp = self.boss_hp.saturating_sub(1);
                    points = scoring::BOSS_XP_PER_CORRECT;
                    self.xp += points;
                    self.score = self.xp;
                }
            }
            self.best_streak = self.best_streak.max(self.streak);
        } else {
            self.streak = 0;
            if self.mode.uses_lives() {
                self.lives = self.lives.saturating_sub(1);
            }
        }

        Feedback {
            correct,
            timed_out,
            points,
            correct_answer: self
                .question
                .as_ref()
                .map(|q| q.answer.to_string())
                .unwrap_or_default(),
        }
    }

    /// Leave the feedback screen: next question, victory or defeat.
    pub fn advance(&mut self) -> Result<Phase, SessionError> {
        if self.phase != Phase::Feedback {
            return Err(if self.phase.is_terminal() {
                SessionError::Finished
            } else {
                SessionError::NothingToAdvance
            });
        }
        self.last_feedback = None;

        if self.mode.uses_lives() && self.lives == 0 {
            self.finish(Phase::Failed);
            return Ok(self.phase);
        }
        if self.mode.is_boss() && self.boss_hp == 0 {
            self.finish(Phase::Completed);
            return Ok(self.phase);
        }
        if let Some(count) = self.mode.question_count(&self.rules)
            && self.index + 1 >= count
        {
            // A boss still standing after the last attack wins the fight.
            let outcome = if self.mode.is_boss() {
                Phase::Failed
            } else {
                Phase::Completed
            };
            self.finish(outcome);
            return Ok(self.phase);
        }

        self.index += 1;
        self.next_question();
        self.set_phase(Phase::InProgress);
        Ok(self.phase)
    }

    /// Feed one second of wall time into the session's clocks.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if !matches!(self.phase, Phase::InProgress | Phase::Feedback) {
            return None;
        }

        // The challenge clock keeps running through feedback.
        if let Some(timer) = self.session_timer.as_mut()
            && timer.tick()
        {
            self.finish(Phase::Completed);
            return Some(TimerEvent::TimeUp);
        }

        if self.phase != Phase::InProgress {
            return None;
        }
        let expired = self.question_timer.as_mut().is_some_and(|t| t.tick());
        if !expired {
            return None;
        }

        match self.mode {
            Mode::Endless => {
                let feedback = self.apply_answer(false, true);
                if self.lives == 0 {
                    self.finish(Phase::Failed);
                } else {
                    self.index += 1;
                    self.next_question();
                }
                Some(TimerEvent::QuestionExpired(feedback))
            }
            Mode::AdventureBoss { .. } => {
                self.streak = 0;
                self.lives = self.lives.saturating_sub(1);
                if self.lives == 0 {
                    self.finish(Phase::Failed);
                } else if let Some(timer) = self.question_timer.as_mut() {
                    timer.reset();
                }
                Some(TimerEvent::BossStrike)
            }
            _ => None,
        }
    }

    fn finish(&mut self, phase: Phase) {
        self.session_timer = None;
        self.question_timer = None;
        self.set_phase(phase);
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            debug!(from = ?self.phase, to = ?phase, kind = ?self.mode.kind(), "session phase");
        }
        self.phase = phase;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_victory(&self) -> bool {
        self.phase == Phase::Completed
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn dialogue(&self) -> Option<&'static str> {
        (self.phase == Phase::Dialogue)
            .then(|| self.mode.dialogue())
            .flatten()
    }

    pub fn question(&self) -> Option<&Question> {
        if self.phase.is_terminal() {
            return None;
        }
        self.question.as_ref()
    }

    /// 1-based number of the current question.
    pub fn question_number(&self) -> u32 {
        self.index + 1
    }

    pub fn total_questions(&self) -> Option<u32> {
        self.mode.question_count(&self.rules)
    }

    pub fn answered(&self) -> u32 {
        self.answered
    }

    pub fn correct(&self) -> u32 {
        self.correct
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn boss_hp(&self) -> u32 {
        self.boss_hp
    }

    pub fn xp(&self) -> u32 {
        self.xp
    }

    pub fn endless_level(&self) -> u32 {
        self.endless_level
    }

    /// Seconds left on the timed challenge clock.
    pub fn time_left(&self) -> Option<u32> {
        self.session_timer.map(|t| t.remaining())
    }

    /// Seconds left on the per-question clock (endless and boss fights).
    pub fn question_time_left(&self) -> Option<u32> {
        self.question_timer.map(|t| t.remaining())
    }

    pub fn has_active_timers(&self) -> bool {
        self.session_timer.is_some() || self.question_timer.is_some()
    }

    pub fn last_feedback(&self) -> Option<&Feedback> {
        self.last_feedback.as_ref()
    }

    pub fn is_recorded(&self) -> bool {
        self.recorded
    }
}
