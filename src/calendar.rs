use crate::models::Habit;
use crate::period::last_day_of_month;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub habit_count: usize,
    pub completed_count: usize,
    pub all_completed: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthRef {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarMonth {
    pub label: String,
    pub year: i32,
    pub month: u32,
    /// Empty cells before the 1st in a Sunday-first week row.
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
    pub previous: MonthRef,
    pub next: MonthRef,
}

pub fn build_month(
    year: i32,
    month: u32,
    selected: Option<NaiveDate>,
    habits: &[Habit],
) -> Option<CalendarMonth> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = last_day_of_month(first);

    let days = first
        .iter_days()
        .take_while(|date| *date <= last)
        .map(|date| {
            let on_day = habits_on(habits, date);
            let completed_count = on_day.iter().filter(|habit| habit.completed).count();
            CalendarDay {
                date,
                habit_count: on_day.len(),
                completed_count,
                all_completed: !on_day.is_empty() && completed_count == on_day.len(),
                selected: selected == Some(date),
            }
        })
        .collect();

    Some(CalendarMonth {
        label: first.format("%B %Y").to_string(),
        year,
        month,
        leading_blanks: first.weekday().num_days_from_sunday(),
        days,
        previous: shift_month(year, month, -1),
        next: shift_month(year, month, 1),
    })
}

/// Habits whose date is the given calendar day.
pub fn habits_on(habits: &[Habit], date: NaiveDate) -> Vec<&Habit> {
    habits.iter().filter(|habit| habit.date == date).collect()
}

fn shift_month(year: i32, month: u32, delta: i32) -> MonthRef {
    let index = year * 12 + month as i32 - 1 + delta;
    MonthRef {
        year: index.div_euclid(12),
        month: index.rem_euclid(12) as u32 + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn habit(date: NaiveDate, completed: bool) -> Habit {
        Habit {
            id: crate::models::generate_id(),
            title: "Morning Workout".to_string(),
            description: None,
            date,
            completed,
            goal_ids: Vec::new(),
        }
    }

    #[test]
    fn march_2024_grid() {
        let month = build_month(2024, 3, None, &[]).expect("valid month");
        assert_eq!(month.label, "March 2024");
        // 2024-03-01 is a Friday.
        assert_eq!(month.leading_blanks, 5);
        assert_eq!(month.days.len(), 31);
        assert_eq!(month.days[30].date, day(2024, 3, 31));
    }

    #[test]
    fn day_markers_reflect_completion() {
        let habits = vec![
            habit(day(2024, 3, 2), true),
            habit(day(2024, 3, 2), true),
            habit(day(2024, 3, 3), true),
            habit(day(2024, 3, 3), false),
            habit(day(2024, 4, 3), false),
        ];
        let month = build_month(2024, 3, Some(day(2024, 3, 3)), &habits).unwrap();

        let second = &month.days[1];
        assert_eq!(second.habit_count, 2);
        assert!(second.all_completed);
        assert!(!second.selected);

        let third = &month.days[2];
        assert_eq!(third.habit_count, 2);
        assert_eq!(third.completed_count, 1);
        assert!(!third.all_completed);
        assert!(third.selected);

        let empty = &month.days[0];
        assert_eq!(empty.habit_count, 0);
        assert!(!empty.all_completed);
    }

    #[test]
    fn navigation_wraps_years() {
        let december = build_month(2023, 12, None, &[]).unwrap();
        assert_eq!(december.next, MonthRef { year: 2024, month: 1 });
        let january = build_month(2024, 1, None, &[]).unwrap();
        assert_eq!(january.previous, MonthRef { year: 2023, month: 12 });
        assert_eq!(january.next, MonthRef { year: 2024, month: 2 });
    }

    #[test]
    fn invalid_month_is_none() {
        assert!(build_month(2024, 13, None, &[]).is_none());
        assert!(build_month(2024, 0, None, &[]).is_none());
    }

    #[test]
    fn habits_on_matches_calendar_day() {
        let habits = vec![habit(day(2024, 3, 2), false), habit(day(2024, 3, 3), false)];
        let found = habits_on(&habits, day(2024, 3, 3));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].date, day(2024, 3, 3));
    }
}
