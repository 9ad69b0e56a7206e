use crate::models::{generate_id, Goal, Habit, HabitTemplate};
use chrono::NaiveDate;
use tracing::warn;

/// Upper bound on instances produced by one repeating habit (about ten years).
pub const MAX_EXPANSION_DAYS: usize = 3660;

/// Turns a submitted template into concrete habit instances.
///
/// Without `repeat` this is a single instance on the template's date. With
/// `repeat` there is one instance per day from the template's date through the
/// latest end date among the goals the template names, inclusive.
pub fn expand(template: &HabitTemplate, repeat: bool, related_goals: &[Goal]) -> Vec<Habit> {
    if !repeat {
        return vec![instance(template, template.date)];
    }

    let end = expansion_end(template, related_goals);
    let mut habits = Vec::new();
    let mut current = template.date;
    while current <= end && habits.len() < MAX_EXPANSION_DAYS {
        habits.push(instance(template, current));
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }

    if current <= end && habits.len() == MAX_EXPANSION_DAYS {
        warn!(
            "repeating habit '{}' truncated at {} days (requested through {end})",
            template.title, MAX_EXPANSION_DAYS
        );
    }

    habits
}

/// Latest date a repeating template should reach; never earlier than its own date.
pub fn expansion_end(template: &HabitTemplate, related_goals: &[Goal]) -> NaiveDate {
    related_goals
        .iter()
        .filter(|goal| template.goal_ids.contains(&goal.id))
        .map(|goal| goal.end_date)
        .fold(template.date, NaiveDate::max)
}

/// Earliest start and latest end among the goals named in `goal_ids`.
pub fn goal_span(goals: &[Goal], goal_ids: &[String]) -> Option<(NaiveDate, NaiveDate)> {
    goals
        .iter()
        .filter(|goal| goal_ids.contains(&goal.id))
        .fold(None, |span, goal| match span {
            None => Some((goal.start_date, goal.end_date)),
            Some((start, end)) => Some((start.min(goal.start_date), end.max(goal.end_date))),
        })
}

fn instance(template: &HabitTemplate, date: NaiveDate) -> Habit {
    Habit {
        id: generate_id(),
        title: template.title.clone(),
        description: template.description.clone(),
        date,
        completed: false,
        goal_ids: template.goal_ids.clone(),
    }
}
