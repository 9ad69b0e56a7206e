use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Derived from the habits that reference this goal, 0..=100.
    pub progress: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub completed: bool,
    pub goal_ids: Vec<String>,
}

/// What a user submits for a new habit, before ids and dates are assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitTemplate {
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub goal_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGoal {
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub goals: Vec<Goal>,
    pub habits: Vec<Habit>,
}

/// Random 128-bit identifier, safe to generate in bulk within one tick.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoalRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHabitRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: String,
    #[serde(default)]
    pub goal_ids: Vec<String>,
    #[serde(default)]
    pub repeat: bool,
}

#[derive(Debug, Deserialize)]
pub struct HabitQuery {
    pub date: Option<String>,
    pub period: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpanQuery {
    #[serde(default)]
    pub goal_ids: String,
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub selected: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GoalSpanResponse {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct HabitChangeResponse {
    pub habit: Habit,
    pub goals: Vec<Goal>,
}
