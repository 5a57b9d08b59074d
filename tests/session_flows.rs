use std::collections::BTreeSet;

use chrono::Utc;
use numquest::engine::progress::summarize;
use numquest::generator::{
    Difficulty, Operand, Operation, QuestionGenerator, QuestionSource, Tier,
};
use numquest::session::mode::Rules;
use numquest::session::{Mode, Phase, Session, SessionKind, TimerEvent};
use numquest::store::schema::{Avatar, AvatarColor, Character};
use numquest::store::{DirBackend, GameStore, MemoryBackend};
use tempfile::TempDir;

fn session(mode: Mode, seed: u64) -> Session<QuestionGenerator> {
    Session::with_source(mode, Rules::default(), QuestionGenerator::with_seed(seed))
}

/// Submit the right answer (as the player would type it) or a wrong one.
fn answer(s: &mut Session<QuestionGenerator>, right: bool) -> Phase {
    let text = if right {
        s.question().unwrap().answer.to_string()
    } else {
        "-12345".to_string()
    };
    let feedback = s.submit(&text).unwrap();
    assert_eq!(feedback.correct, right, "answer {text}");
    s.advance().unwrap()
}

fn play_practice(store: &GameStore<MemoryBackend>, wrong_at: &[u32]) -> u8 {
    let mut s = session(Mode::practice(Operation::Fractions), 7);
    s.start().unwrap();
    s.choose_difficulty(Difficulty::Medium).unwrap();
    for i in 1..=10 {
        answer(&mut s, !wrong_at.contains(&i));
    }
    assert_eq!(s.phase(), Phase::Completed);
    s.record(store).unwrap().record.unwrap().stars_earned
}

#[test]
fn practice_nine_right_earns_three_stars() {
    let store = GameStore::new(MemoryBackend::new());
    assert_eq!(play_practice(&store, &[5]), 3);

    let history = store.load_progress();
    assert_eq!(history.len(), 1);
    let record = &history[0];
    assert_eq!(record.correct_answers, 9);
    assert_eq!(record.total_questions, 10);
    assert_eq!(record.best_streak, 5);
    assert_eq!(record.operation, Operation::Fractions);
    // Streak 1..4 before the miss, then 1..5 after it.
    assert_eq!(record.score, (15 + 20 + 25 + 30) + (15 + 20 + 25 + 30 + 35));
}

#[test]
fn practice_seven_right_earns_two_stars() {
    let store = GameStore::new(MemoryBackend::new());
    assert_eq!(play_practice(&store, &[2, 5, 8]), 2);
    assert_eq!(play_practice(&store, &[1, 2, 3, 4, 5]), 1);
    assert_eq!(play_practice(&store, &[1, 2, 3, 4, 5, 6]), 0);
}

#[test]
fn timed_challenge_time_up_records_what_was_reached() {
    let store = GameStore::new(MemoryBackend::new());
    let mut s = session(Mode::timed(Operation::Multiplication), 21);
    s.start().unwrap();
    s.choose_difficulty(Difficulty::Easy).unwrap();
    for right in [true, true, false, true, true, true, true] {
        answer(&mut s, right);
    }
    for _ in 0..59 {
        assert!(s.tick().is_none());
    }
    assert_eq!(s.tick(), Some(TimerEvent::TimeUp));
    assert_eq!(s.phase(), Phase::Completed);

    let receipt = s.record(&store).unwrap();
    let record = receipt.record.unwrap();
    assert_eq!(record.mode, SessionKind::Timed);
    assert_eq!(record.total_questions, 10);
    assert_eq!(record.correct_answers, 6);
    assert_eq!(record.stars_earned, 1);
    assert!(receipt.new_rewards.iter().all(|r| r.id != "speed_demon"));

    // Ten right before the clock runs out.
    let mut fast = session(Mode::timed(Operation::Multiplication), 22);
    fast.start().unwrap();
    fast.choose_difficulty(Difficulty::Easy).unwrap();
    for _ in 0..10 {
        fast.tick();
        answer(&mut fast, true);
    }
    assert_eq!(fast.phase(), Phase::Completed);
    assert_eq!(fast.time_left(), None);
    let receipt = fast.record(&store).unwrap();
    assert_eq!(receipt.record.unwrap().stars_earned, 3);
    assert!(receipt.new_rewards.iter().any(|r| r.id == "speed_demon"));
}

#[test]
fn endless_three_misses_ends_the_run() {
    let store = GameStore::new(MemoryBackend::new());
    let mut s = session(Mode::Endless, 11);
    s.start().unwrap();
    assert_eq!(answer(&mut s, false), Phase::InProgress);
    assert_eq!(answer(&mut s, false), Phase::InProgress);
    assert_eq!(answer(&mut s, false), Phase::Failed);
    assert_eq!(s.lives(), 0);
    assert!(s.question().is_none());

    let receipt = s.record(&store).unwrap();
    let record = receipt.record.unwrap();
    assert_eq!(record.best_streak, 0);
    assert_eq!(record.total_questions, 3);
    assert_eq!(record.correct_answers, 0);
    assert_eq!(record.mode, SessionKind::Endless);
    assert_eq!(receipt.high_score, Some(0));
}

#[test]
fn endless_timeouts_count_as_misses() {
    let mut s = session(Mode::Endless, 3);
    s.start().unwrap();
    for _ in 0..30 {
        s.tick();
    }
    assert_eq!(s.phase(), Phase::Failed);
    assert_eq!(s.answered(), 3);
    assert!(!s.has_active_timers());
}

#[test]
fn boss_defeated_in_three_hits_unlocks_next_world() {
    let store = GameStore::new(MemoryBackend::new());
    let mut s = session(Mode::adventure_boss(1).unwrap(), 5);
    assert_eq!(s.start().unwrap(), Phase::Dialogue);
    s.dismiss_dialogue().unwrap();
    assert_eq!(s.boss_hp(), 3);

    assert_eq!(answer(&mut s, true), Phase::InProgress);
    assert_eq!(answer(&mut s, true), Phase::InProgress);
    assert_eq!(answer(&mut s, true), Phase::Completed);
    assert_eq!(s.boss_hp(), 0);
    assert_eq!(s.lives(), 3);

    let receipt = s.record(&store).unwrap();
    let ledger = store.load_adventure();
    assert_eq!(receipt.adventure.as_ref(), Some(&ledger));
    assert_eq!(ledger.defeated_bosses, BTreeSet::from([1]));
    assert_eq!(ledger.unlocked_worlds, BTreeSet::from([1, 2]));
    assert_eq!(ledger.total_xp, 3 * 20 + 50);
    assert!(receipt.new_rewards.iter().any(|r| r.id == "boss_slayer"));

    // A second win changes nothing but XP.
    let mut again = session(Mode::adventure_boss(1).unwrap(), 6);
    again.start().unwrap();
    again.dismiss_dialogue().unwrap();
    for _ in 0..3 {
        answer(&mut again, true);
    }
    let receipt = again.record(&store).unwrap();
    let ledger = store.load_adventure();
    assert_eq!(ledger.defeated_bosses, BTreeSet::from([1]));
    assert_eq!(ledger.unlocked_worlds, BTreeSet::from([1, 2]));
    assert!(receipt.new_rewards.is_empty());
}

#[test]
fn division_never_divides_by_zero() {
    let mut generator = QuestionGenerator::with_seed(1234);
    for tier in [
        Tier::Practice(Difficulty::Easy),
        Tier::Practice(Difficulty::Hard),
        Tier::Adventure(Difficulty::Medium),
        Tier::Endless(10),
    ] {
        for _ in 0..1000 {
            let q = generator.generate(Operation::Division, tier);
            let (Operand::Integer(a), Operand::Integer(b)) = (q.num1, q.num2) else {
                panic!("division operands must be integers: {q:?}");
            };
            assert_ne!(b, 0);
            assert_eq!(a % b, 0);
        }
    }
}

#[test]
fn first_avatar_save_gets_id_one_and_no_stars() {
    let store = GameStore::new(MemoryBackend::new());
    let saved = store
        .save_avatar(&Avatar {
            id: String::new(),
            selected_character: Character::Superhero,
            selected_color: AvatarColor::Orange,
            total_stars: 0,
            updated_date: Utc::now(),
        })
        .unwrap();
    assert_eq!(saved.id, "1");
    assert_eq!(saved.total_stars, 0);

    let again = store
        .customize_avatar(Character::Astronaut, AvatarColor::Blue)
        .unwrap();
    assert_eq!(again.id, "1");
}

#[test]
fn adventure_campaign_on_disk_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let store = GameStore::new(DirBackend::with_base_dir(dir.path().to_path_buf()).unwrap());
        store
            .customize_avatar(Character::Robot, AvatarColor::Green)
            .unwrap();
        let mut s = session(Mode::adventure_level(1, 1).unwrap(), 9);
        s.start().unwrap();
        s.dismiss_dialogue().unwrap();
        for _ in 0..6 {
            answer(&mut s, true);
        }
        assert!(s.is_victory());
        s.record(&store).unwrap();
    }

    let store = GameStore::new(DirBackend::with_base_dir(dir.path().to_path_buf()).unwrap());
    let ledger = store.load_adventure();
    assert_eq!(ledger.current_level, 2);
    assert_eq!(ledger.total_xp, 6 * 10 + 20);
    assert!(ledger.is_level_completed(1, 1));
    assert_eq!(store.load_avatar().unwrap().total_stars, 3);

    let summary = summarize(&store.load_progress());
    assert_eq!(summary.sessions, 1);
    assert_eq!(summary.accuracy, 100);
    assert_eq!(summary.per_operation[&Operation::Addition].sessions, 1);
}
