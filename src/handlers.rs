use crate::calendar::{build_month, CalendarMonth};
use crate::errors::AppError;
use crate::expander;
use crate::models::{
    CalendarQuery, Goal, GoalSpanResponse, Habit, HabitChangeResponse, HabitQuery, HabitTemplate,
    NewGoal, NewGoalRequest, NewHabitRequest, SpanQuery,
};
use crate::period::Period;
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{Path, Query, State},
    response::Html,
    Json,
};
use chrono::{DateTime, Datelike, Local, NaiveDate};
use tracing::info;

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let tracker = state.tracker.lock().await;
    let page = render_index(today(), &tracker.snapshot())?;
    Ok(Html(page))
}

pub async fn list_goals(State(state): State<AppState>) -> Json<Vec<Goal>> {
    let tracker = state.tracker.lock().await;
    Json(tracker.goals().to_vec())
}

pub async fn create_goal(
    State(state): State<AppState>,
    Json(payload): Json<NewGoalRequest>,
) -> Result<Json<Goal>, AppError> {
    let title = required_title(&payload.title)?;
    let start_date = parse_calendar_day(&payload.start_date)?;
    let end_date = parse_calendar_day(&payload.end_date)?;
    if start_date > end_date {
        return Err(AppError::bad_request("startDate must not be after endDate"));
    }

    let mut tracker = state.tracker.lock().await;
    let goal = tracker.add_goal(NewGoal {
        title,
        description: optional_text(payload.description),
        start_date,
        end_date,
    });
    info!("created goal '{}' ({start_date} to {end_date})", goal.title);
    Ok(Json(goal))
}

pub async fn goal_span(
    State(state): State<AppState>,
    Query(query): Query<SpanQuery>,
) -> Result<Json<GoalSpanResponse>, AppError> {
    let goal_ids: Vec<String> = query
        .goal_ids
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();

    let tracker = state.tracker.lock().await;
    let (start, end) = expander::goal_span(tracker.goals(), &goal_ids)
        .ok_or_else(|| AppError::not_found("no matching goals"))?;
    Ok(Json(GoalSpanResponse { start, end }))
}

pub async fn list_habits(
    State(state): State<AppState>,
    Query(query): Query<HabitQuery>,
) -> Result<Json<Vec<Habit>>, AppError> {
    let tracker = state.tracker.lock().await;
    let habits = match (query.date, query.period) {
        (Some(_), Some(_)) => {
            return Err(AppError::bad_request("use either date or period, not both"));
        }
        (Some(date), None) => tracker.habits_on(parse_calendar_day(&date)?),
        (None, Some(period)) => {
            let period: Period = period.parse().map_err(AppError::bad_request)?;
            tracker.habits_in(period, today())
        }
        (None, None) => tracker.habits().to_vec(),
    };
    Ok(Json(habits))
}

pub async fn create_habit(
    State(state): State<AppState>,
    Json(payload): Json<NewHabitRequest>,
) -> Result<Json<Vec<Habit>>, AppError> {
    let template = HabitTemplate {
        title: required_title(&payload.title)?,
        description: optional_text(payload.description),
        date: parse_calendar_day(&payload.date)?,
        goal_ids: distinct_goal_ids(payload.goal_ids),
    };

    let mut tracker = state.tracker.lock().await;
    let created = tracker.add_habits(template, payload.repeat);
    info!(
        "created {} habit instance(s), repeat={}",
        created.len(),
        payload.repeat
    );
    Ok(Json(created))
}

pub async fn toggle_habit(
    State(state): State<AppState>,
    Path(habit_id): Path<String>,
) -> Result<Json<HabitChangeResponse>, AppError> {
    let mut tracker = state.tracker.lock().await;
    let habit = tracker
        .toggle_habit(&habit_id)
        .ok_or_else(|| AppError::not_found(format!("habit {habit_id} not found")))?;
    Ok(Json(HabitChangeResponse {
        habit,
        goals: tracker.goals().to_vec(),
    }))
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Path(habit_id): Path<String>,
) -> Result<Json<HabitChangeResponse>, AppError> {
    let mut tracker = state.tracker.lock().await;
    let habit = tracker
        .remove_habit(&habit_id)
        .ok_or_else(|| AppError::not_found(format!("habit {habit_id} not found")))?;
    info!("removed habit '{}' on {}", habit.title, habit.date);
    Ok(Json(HabitChangeResponse {
        habit,
        goals: tracker.goals().to_vec(),
    }))
}

pub async fn calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarMonth>, AppError> {
    let selected = query
        .selected
        .as_deref()
        .map(parse_calendar_day)
        .transpose()?;
    let anchor = selected.unwrap_or_else(today);
    let year = query.year.unwrap_or(anchor.year());
    let month = query.month.unwrap_or(anchor.month());

    let tracker = state.tracker.lock().await;
    let grid = build_month(year, month, selected, tracker.habits())
        .ok_or_else(|| AppError::bad_request(format!("invalid month {year}-{month}")))?;
    Ok(Json(grid))
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp, keeping only the calendar day.
pub fn parse_calendar_day(value: &str) -> Result<NaiveDate, AppError> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|timestamp| timestamp.date_naive())
        .map_err(|_| AppError::bad_request(format!("invalid date '{value}'")))
}

fn required_title(title: &str) -> Result<String, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::bad_request("title is required"));
    }
    Ok(title.to_string())
}

/// Drops blank and repeated goal ids, keeping first-seen order.
fn distinct_goal_ids(goal_ids: Vec<String>) -> Vec<String> {
    let mut distinct: Vec<String> = Vec::with_capacity(goal_ids.len());
    for goal_id in goal_ids {
        let goal_id = goal_id.trim().to_string();
        if !goal_id.is_empty() && !distinct.contains(&goal_id) {
            distinct.push(goal_id);
        }
    }
    distinct
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_dates_and_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 30).unwrap();
        assert_eq!(parse_calendar_day("2024-03-30").unwrap(), expected);
        assert_eq!(parse_calendar_day(" 2024-03-30T23:15:00+02:00 ").unwrap(), expected);
        assert_eq!(parse_calendar_day("2024-03-30T00:00:00Z").unwrap(), expected);
    }

    #[test]
    fn rejects_garbage_dates() {
        let err = parse_calendar_day("30/03/2024").unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
        assert!(parse_calendar_day("2024-02-30").is_err());
    }

    #[test]
    fn title_is_trimmed_and_required() {
        assert_eq!(required_title("  Morning Workout ").unwrap(), "Morning Workout");
        assert!(required_title("   ").is_err());
    }

    #[test]
    fn goal_ids_are_deduplicated_in_order() {
        let ids = vec!["b".to_string(), "a".to_string(), "b".to_string(), " ".to_string()];
        assert_eq!(distinct_goal_ids(ids), vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn blank_description_becomes_none() {
        assert_eq!(optional_text(Some("  ".to_string())), None);
        assert_eq!(optional_text(Some(" note ".to_string())), Some("note".to_string()));
    }
}
