use crate::calendar;
use crate::expander::expand;
use crate::models::{generate_id, Goal, Habit, HabitTemplate, NewGoal, Snapshot};
use crate::period::Period;
use crate::progress::compute_progress;
use chrono::{Duration, NaiveDate};
use tracing::debug;

/// Sole owner of the goal and habit lists for a session.
///
/// Every mutation computes the next lists through the pure helpers and then
/// replaces the old ones, so goal progress always matches the current habits.
#[derive(Debug, Clone, Default)]
pub struct Tracker {
    goals: Vec<Goal>,
    habits: Vec<Habit>,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sample_data(today: NaiveDate) -> Self {
        let mut tracker = Self::new();
        let french = tracker.add_goal(NewGoal {
            title: "Learn French A2".to_string(),
            description: Some("Master basic French conversation skills".to_string()),
            start_date: today,
            end_date: today + Duration::days(31),
        });
        let exercise = tracker.add_goal(NewGoal {
            title: "Daily Exercise Routine".to_string(),
            description: Some("Build a consistent workout habit".to_string()),
            start_date: today,
            end_date: today + Duration::days(31),
        });

        let samples = [
            ("Practice Busuu", "15 minutes of language learning", &french.id),
            ("Listen to French Podcast", "One episode during commute", &french.id),
            ("Morning Workout", "30 minutes exercise", &exercise.id),
        ];
        for (title, description, goal_id) in samples {
            tracker.add_habits(
                HabitTemplate {
                    title: title.to_string(),
                    description: Some(description.to_string()),
                    date: today,
                    goal_ids: vec![goal_id.clone()],
                },
                false,
            );
        }

        let podcast = tracker
            .habits
            .iter()
            .find(|habit| habit.title == "Listen to French Podcast")
            .map(|habit| habit.id.clone());
        if let Some(id) = podcast {
            tracker.toggle_habit(&id);
        }
        tracker
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            goals: self.goals.clone(),
            habits: self.habits.clone(),
        }
    }

    pub fn add_goal(&mut self, new_goal: NewGoal) -> Goal {
        let goal = Goal {
            id: generate_id(),
            title: new_goal.title,
            description: new_goal.description,
            start_date: new_goal.start_date,
            end_date: new_goal.end_date,
            progress: 0,
        };
        debug!("added goal {} ({})", goal.id, goal.title);

        let mut goals = self.goals.clone();
        goals.push(goal.clone());
        self.goals = compute_progress(&goals, &self.habits);
        goal
    }

    /// Adds the habits expanded from `template` and returns them.
    pub fn add_habits(&mut self, template: HabitTemplate, repeat: bool) -> Vec<Habit> {
        let created = expand(&template, repeat, &self.goals);
        debug!("added {} habit instance(s) for '{}'", created.len(), template.title);

        let mut habits = self.habits.clone();
        habits.extend(created.iter().cloned());
        self.replace(habits);
        created
    }

    /// Flips completion of one habit instance. `None` if the id is unknown.
    pub fn toggle_habit(&mut self, habit_id: &str) -> Option<Habit> {
        let mut toggled = None;
        let habits: Vec<Habit> = self
            .habits
            .iter()
            .map(|habit| {
                if habit.id == habit_id {
                    let flipped = Habit {
                        completed: !habit.completed,
                        ..habit.clone()
                    };
                    toggled = Some(flipped.clone());
                    flipped
                } else {
                    habit.clone()
                }
            })
            .collect();

        let toggled = toggled?;
        self.replace(habits);
        Some(toggled)
    }

    pub fn remove_habit(&mut self, habit_id: &str) -> Option<Habit> {
        let index = self.habits.iter().position(|habit| habit.id == habit_id)?;
        let mut habits = self.habits.clone();
        let removed = habits.remove(index);
        self.replace(habits);
        Some(removed)
    }

    pub fn habits_on(&self, date: NaiveDate) -> Vec<Habit> {
        calendar::habits_on(&self.habits, date)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn habits_in(&self, period: Period, today: NaiveDate) -> Vec<Habit> {
        self.habits
            .iter()
            .filter(|habit| period.contains(today, habit.date))
            .cloned()
            .collect()
    }

    fn replace(&mut self, habits: Vec<Habit>) {
        self.goals = compute_progress(&self.goals, &habits);
        self.habits = habits;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn tracker_with_goal() -> (Tracker, Goal) {
        let mut tracker = Tracker::new();
        let goal = tracker.add_goal(NewGoal {
            title: "Learn French A2".to_string(),
            description: None,
            start_date: day(2024, 3, 1),
            end_date: day(2024, 4, 1),
        });
        (tracker, goal)
    }

    fn template(title: &str, date: NaiveDate, goal_id: &str) -> HabitTemplate {
        HabitTemplate {
            title: title.to_string(),
            description: None,
            date,
            goal_ids: vec![goal_id.to_string()],
        }
    }

    #[test]
    fn new_goal_starts_at_zero() {
        let (tracker, goal) = tracker_with_goal();
        assert_eq!(goal.progress, 0);
        assert_eq!(tracker.goals().len(), 1);
    }

    #[test]
    fn completing_and_adding_habits_updates_progress() {
        let (mut tracker, goal) = tracker_with_goal();

        let first = tracker.add_habits(template("H1", day(2024, 3, 10), &goal.id), false);
        assert_eq!(first.len(), 1);
        let toggled = tracker.toggle_habit(&first[0].id).expect("known habit");
        assert!(toggled.completed);
        assert_eq!(tracker.goals()[0].progress, 100);

        tracker.add_habits(template("H2", day(2024, 3, 11), &goal.id), false);
        assert_eq!(tracker.goals()[0].progress, 50);
    }

    #[test]
    fn toggle_twice_restores_progress() {
        let (mut tracker, goal) = tracker_with_goal();
        let created = tracker.add_habits(template("H1", day(2024, 3, 10), &goal.id), false);
        tracker.toggle_habit(&created[0].id);
        tracker.toggle_habit(&created[0].id);
        assert!(!tracker.habits()[0].completed);
        assert_eq!(tracker.goals()[0].progress, 0);
    }

    #[test]
    fn goal_named_twice_on_one_habit_counts_once() {
        let (mut tracker, goal) = tracker_with_goal();
        let mut doubled = template("A", day(2024, 3, 10), &goal.id);
        doubled.goal_ids.push(goal.id.clone());
        let done = tracker.add_habits(doubled, false);
        tracker.toggle_habit(&done[0].id);
        tracker.add_habits(template("B", day(2024, 3, 10), &goal.id), false);
        assert_eq!(tracker.goals()[0].progress, 50);
    }

    #[test]
    fn unknown_habit_is_none() {
        let (mut tracker, _) = tracker_with_goal();
        assert!(tracker.toggle_habit("nope").is_none());
        assert!(tracker.remove_habit("nope").is_none());
    }

    #[test]
    fn repeating_habit_runs_to_goal_end() {
        let (mut tracker, goal) = tracker_with_goal();
        let created = tracker.add_habits(template("Daily", day(2024, 3, 30), &goal.id), true);
        assert_eq!(created.len(), 3);
        assert_eq!(tracker.habits_on(day(2024, 3, 31)).len(), 1);

        tracker.toggle_habit(&created[0].id);
        assert_eq!(tracker.goals()[0].progress, 33);
    }

    #[test]
    fn removing_habit_recomputes() {
        let (mut tracker, goal) = tracker_with_goal();
        let done = tracker.add_habits(template("H1", day(2024, 3, 10), &goal.id), false);
        let open = tracker.add_habits(template("H2", day(2024, 3, 10), &goal.id), false);
        tracker.toggle_habit(&done[0].id);
        assert_eq!(tracker.goals()[0].progress, 50);

        let removed = tracker.remove_habit(&open[0].id).expect("known habit");
        assert_eq!(removed.title, "H2");
        assert_eq!(tracker.goals()[0].progress, 100);
    }

    #[test]
    fn period_filter() {
        let (mut tracker, goal) = tracker_with_goal();
        tracker.add_habits(template("Daily", day(2024, 3, 1), &goal.id), true);
        assert_eq!(tracker.habits().len(), 32);
        // Week of Thursday 2024-03-14 runs Monday 11th through Sunday 17th.
        assert_eq!(tracker.habits_in(Period::Week, day(2024, 3, 14)).len(), 7);
        assert_eq!(tracker.habits_in(Period::Month, day(2024, 3, 14)).len(), 31);
    }

    #[test]
    fn sample_data_has_derived_progress() {
        let tracker = Tracker::with_sample_data(day(2024, 3, 1));
        assert_eq!(tracker.goals().len(), 2);
        assert_eq!(tracker.habits().len(), 3);
        assert_eq!(tracker.goals()[0].progress, 50);
        assert_eq!(tracker.goals()[1].progress, 0);
    }
}
