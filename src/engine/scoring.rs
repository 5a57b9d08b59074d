pub const BASE_POINTS: u32 = 10;
pub const STREAK_BONUS: u32 = 5;
pub const ENDLESS_LEVEL_BONUS: u32 = 2;
pub const LEVEL_XP_PER_CORRECT: u32 = 10;
pub const BOSS_XP_PER_CORRECT: u32 = 20;
pub const LEVEL_VICTORY_XP: u32 = 20;
pub const BOSS_VICTORY_XP: u32 = 50;

/// Practice points for a correct answer. `streak` already includes it.
pub fn practice_points(streak: u32) -> u32 {
    BASE_POINTS + streak * STREAK_BONUS
}

/// Endless points for a correct answer, using the streak before it.
pub fn endless_points(streak_before: u32, level: u32) -> u32 {
    BASE_POINTS + streak_before * STREAK_BONUS + level * ENDLESS_LEVEL_BONUS
}

/// True when going from `before` to `after` passes a multiple of 100.
pub fn crossed_hundred(before: u32, after: u32) -> bool {
    after / 100 > before / 100
}

pub fn accuracy_percent(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (correct as f64 * 100.0 / total as f64).round() as u32
}

/// Practice stars by share of questions right: 90% → 3, 70% → 2, 50% → 1.
/// With ten questions that is 9, 7 and 5 correct.
pub fn practice_stars(correct: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let tenths = correct * 10;
    if tenths >= total * 9 {
        3
    } else if tenths >= total * 7 {
        2
    } else if tenths >= total * 5 {
        1
    } else {
        0
    }
}

pub fn endless_stars(score: u32) -> u8 {
    match score {
        200.. => 3,
        100..=199 => 2,
        50..=99 => 1,
        _ => 0,
    }
}

/// Adventure victories rate by lives lost along the way.
pub fn adventure_stars(lives_left: u32, max_lives: u32) -> u8 {
    match max_lives.saturating_sub(lives_left) {
        0 => 3,
        1 => 2,
        _ => 1,
    }
}
