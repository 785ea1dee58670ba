//! Experience table and level math.

use std::sync::LazyLock;

pub const MAX_LEVEL: i32 = 99;
pub const MIN_LEVEL: i32 = 1;

/// Per-skill experience cap.
pub const MAX_SKILL_EXP: i64 = 200_000_000;

/// Total level of a fully maxed account (99 in every individual skill).
pub const MAXED_TOTAL_LEVEL: i32 = 99 * 23;

/// Combat level of a fully maxed account.
pub const MAXED_COMBAT_LEVEL: i32 = 126;

/// XP_TABLE[level] = experience required to reach `level`.
static XP_TABLE: LazyLock<[i64; 100]> = LazyLock::new(|| {
    let mut table = [0i64; 100];
    let mut points: f64 = 0.0;
    for level in 1..100 {
        table[level] = (points / 4.0).floor() as i64;
        // Each per-level term is truncated before accumulating.
        points += ((level as f64) + 300.0 * 2f64.powf(level as f64 / 7.0)).floor();
    }
    table
});

/// The level a given amount of experience corresponds to, clamped to [1, 99].
pub fn level_for_exp(exp: i64) -> i32 {
    if exp <= 0 {
        return MIN_LEVEL;
    }
    let mut level = MIN_LEVEL;
    for candidate in 2..=MAX_LEVEL {
        if XP_TABLE[candidate as usize] <= exp {
            level = candidate;
        } else {
            break;
        }
    }
    level
}

/// Experience required to reach a level.
pub fn exp_for_level(level: i32) -> i64 {
    let clamped = level.clamp(MIN_LEVEL, MAX_LEVEL);
    XP_TABLE[clamped as usize]
}

/// Standard combat level formula over the seven combat skill levels.
pub fn combat_level(
    attack: i32,
    strength: i32,
    defence: i32,
    hitpoints: i32,
    ranged: i32,
    magic: i32,
    prayer: i32,
) -> i32 {
    let base = 0.25 * (defence as f64 + hitpoints as f64 + (prayer / 2) as f64);
    let melee = 0.325 * (attack as f64 + strength as f64);
    let range = 0.325 * ((ranged / 2) as f64 + ranged as f64);
    let mage = 0.325 * ((magic / 2) as f64 + magic as f64);
    (base + melee.max(range).max(mage)).floor() as i32
}
