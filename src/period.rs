use chrono::{Datelike, Duration, NaiveDate};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    ThirtyDays,
    Week,
    Month,
}

impl Period {
    /// Inclusive date range this period covers as of `today`.
    pub fn range(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Period::ThirtyDays => (today - Duration::days(29), today),
            Period::Week => {
                let start = week_start(today);
                (start, start + Duration::days(6))
            }
            Period::Month => {
                let start = today.with_day(1).unwrap_or(today);
                (start, last_day_of_month(start))
            }
        }
    }

    pub fn contains(self, today: NaiveDate, date: NaiveDate) -> bool {
        let (start, end) = self.range(today);
        start <= date && date <= end
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "30days" => Ok(Period::ThirtyDays),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            other => Err(format!("unknown period '{other}', expected 30days, week or month")),
        }
    }
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

pub(crate) fn last_day_of_month(first: NaiveDate) -> NaiveDate {
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .unwrap_or(first)
}
