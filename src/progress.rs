use crate::models::{Goal, Habit};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    completed: u64,
    total: u64,
}

/// Returns `goals` in the same order with `progress` recomputed from `habits`.
///
/// A goal no habit references gets 0. Goal ids on habits that match no goal
/// are counted but never read, so they contribute nothing. A goal named more
/// than once on the same habit counts once.
pub fn compute_progress(goals: &[Goal], habits: &[Habit]) -> Vec<Goal> {
    let mut tallies: HashMap<&str, Tally> = HashMap::new();
    for habit in habits {
        for (index, goal_id) in habit.goal_ids.iter().enumerate() {
            if habit.goal_ids[..index].contains(goal_id) {
                continue;
            }
            let tally = tallies.entry(goal_id.as_str()).or_default();
            tally.total = tally.total.saturating_add(1);
            if habit.completed {
                tally.completed = tally.completed.saturating_add(1);
            }
        }
    }

    goals
        .iter()
        .map(|goal| Goal {
            progress: tallies
                .get(goal.id.as_str())
                .map(|tally| percent(tally.completed, tally.total))
                .unwrap_or(0),
            ..goal.clone()
        })
        .collect()
}

/// Rounds half up: `(200k + n) / 2n` is `round(100k / n)` with ties going up.
fn percent(completed: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let rounded = (200 * completed + total) / (2 * total);
    rounded.min(100) as u8
}
