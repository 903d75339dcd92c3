//! Priority tier classification and the per-tier time allocation.

use crate::config::Config;
use crate::fields::PriorityTier;

/// Tier implied by a subtask count. Thresholds are checked from `A` down;
/// the first one met wins.
pub fn classify(subtask_count: usize, config: &Config) -> PriorityTier {
    let t = &config.thresholds;
    if subtask_count >= t.a {
        PriorityTier::A
    } else if subtask_count >= t.b {
        PriorityTier::B
    } else if subtask_count >= t.c {
        PriorityTier::C
    } else {
        PriorityTier::D
    }
}

/// Effective tier: a manual override always wins over the count.
///
/// Returns the tier and whether it was chosen automatically.
pub fn resolve(subtask_count: usize, manual: Option<PriorityTier>, config: &Config) -> (PriorityTier, bool) {
    match manual {
        Some(tier) => (tier, false),
        None => (classify(subtask_count, config), true),
    }
}

/// Fixed time budget for a tier, in minutes.
pub fn allocated_minutes(tier: PriorityTier, config: &Config) -> u32 {
    config.time.minutes_for(tier)
}
