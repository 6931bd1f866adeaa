//! Experience and leveling
//!
//! Level curve: `level = floor(sqrt(exp / 100)) + 1`.

/// Experience per "square" of the level curve
pub const EXP_SCALE: u64 = 100;

/// Calculate the level for a total amount of experience
pub fn level_for_exp(exp: u64) -> u32 {
    let level = isqrt(exp / EXP_SCALE).saturating_add(1);
    u32::try_from(level).unwrap_or(u32::MAX)
}

/// Calculate the total experience needed to reach a given level
pub fn exp_for_level(level: u32) -> u64 {
    if level <= 1 {
        0
    } else {
        let steps = u64::from(level - 1);
        steps.saturating_mul(steps).saturating_mul(EXP_SCALE)
    }
}

/// Experience still missing before the next level
pub fn exp_to_next_level(exp: u64) -> u64 {
    let next = level_for_exp(exp).saturating_add(1);
    exp_for_level(next).saturating_sub(exp)
}

/// Integer square root (floor)
fn isqrt(n: u64) -> u64 {
    // f64 gets within one of the answer; correct the rounding either way
    let mut root = (n as f64).sqrt() as u64;
    while root.checked_mul(root).map_or(true, |sq| sq > n) {
        root -= 1;
    }
    while (root + 1).checked_mul(root + 1).is_some_and(|sq| sq <= n) {
        root += 1;
    }
    root
}
