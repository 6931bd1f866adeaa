//! Progression systems

pub mod xp;
pub mod progress;

pub use progress::{LevelChange, PlayerProgress};
pub use xp::{exp_for_level, exp_to_next_level, level_for_exp};
