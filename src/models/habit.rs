use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Daily => write!(f, "daily"),
            Frequency::Weekly => write!(f, "weekly"),
        }
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            _ => Err(format!(
                "Invalid frequency '{}'. Valid options: daily, weekly",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub frequency: Frequency,
    /// Derived from `completed_dates`; refreshed by every mutation that
    /// touches the dates.
    pub streak: u32,
    /// Sorted ascending, duplicate-free.
    pub completed_dates: Vec<NaiveDate>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Habit {
    pub fn new(name: impl Into<String>, frequency: Frequency) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            frequency,
            streak: 0,
            completed_dates: Vec::new(),
            created_at: Utc::now(),
            reminder_time: None,
            color: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_reminder_time(mut self, reminder_time: impl Into<String>) -> Self {
        self.reminder_time = Some(reminder_time.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn completed_on(&self, date: NaiveDate) -> bool {
        self.completed_dates.binary_search(&date).is_ok()
    }
}

impl fmt::Display for Habit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.len()))?;
        if let Some(desc) = &self.description {
            writeln!(f, "{}", desc)?;
        }
        writeln!(f, "Frequency: {}", self.frequency)?;
        writeln!(f, "Streak: {}", self.streak)?;
        writeln!(f, "Completions: {}", self.completed_dates.len())?;
        Ok(())
    }
}

/// Computes the current streak as a pure function of the completed dates.
///
/// Daily habits count consecutive calendar days ending at `today` or
/// yesterday; weekly habits count consecutive ISO weeks ending at this week
/// or last week. A broken chain yields 0.
///
/// `dates` must be sorted ascending and duplicate-free.
pub fn current_streak(dates: &[NaiveDate], frequency: Frequency, today: NaiveDate) -> u32 {
    match frequency {
        Frequency::Daily => streak_by_step(dates, today, Duration::days(1), |d| *d),
        Frequency::Weekly => streak_by_step(dates, today, Duration::weeks(1), week_start),
    }
}

fn week_start(date: &NaiveDate) -> NaiveDate {
    *date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn streak_by_step(
    dates: &[NaiveDate],
    today: NaiveDate,
    step: Duration,
    bucket: fn(&NaiveDate) -> NaiveDate,
) -> u32 {
    let mut buckets: Vec<NaiveDate> = dates.iter().map(bucket).collect();
    buckets.dedup();

    let contains = |d: NaiveDate| buckets.binary_search(&d).is_ok();

    // Anchor at the current period, or the previous one when the current
    // period has no completion yet.
    let mut cursor = bucket(&today);
    if !contains(cursor) {
        cursor -= step;
        if !contains(cursor) {
            return 0;
        }
    }

    let mut count = 0;
    while contains(cursor) {
        count += 1;
        cursor -= step;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_habit_new_defaults() {
        let habit = Habit::new("Read", Frequency::Daily);
        assert_eq!(habit.name, "Read");
        assert_eq!(habit.streak, 0);
        assert!(habit.completed_dates.is_empty());
        assert!(habit.description.is_none());
    }

    #[test]
    fn test_habit_builders() {
        let habit = Habit::new("Run", Frequency::Weekly)
            .with_description("5k minimum")
            .with_color("#ff0000");
        assert_eq!(habit.description.as_deref(), Some("5k minimum"));
        assert_eq!(habit.color.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn test_frequency_from_str() {
        assert_eq!(Frequency::from_str("daily").unwrap(), Frequency::Daily);
        assert_eq!(Frequency::from_str("WEEKLY").unwrap(), Frequency::Weekly);
        assert!(Frequency::from_str("monthly").is_err());
    }

    #[test]
    fn test_frequency_json() {
        assert_eq!(serde_json::to_string(&Frequency::Daily).unwrap(), "\"daily\"");
        let parsed: Frequency = serde_json::from_str("\"weekly\"").unwrap();
        assert_eq!(parsed, Frequency::Weekly);
    }

    #[test]
    fn test_habit_json_uses_camel_case() {
        let habit = Habit::new("Read", Frequency::Daily);
        let json = serde_json::to_value(&habit).unwrap();
        assert!(json.get("completedDates").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("completed_dates").is_none());
    }

    #[test]
    fn test_daily_streak_empty() {
        assert_eq!(current_streak(&[], Frequency::Daily, d("2025-06-10")), 0);
    }

    #[test]
    fn test_daily_streak_today_only() {
        let dates = [d("2025-06-10")];
        assert_eq!(current_streak(&dates, Frequency::Daily, d("2025-06-10")), 1);
    }

    #[test]
    fn test_daily_streak_consecutive_run() {
        let dates = [d("2025-06-07"), d("2025-06-08"), d("2025-06-09"), d("2025-06-10")];
        assert_eq!(current_streak(&dates, Frequency::Daily, d("2025-06-10")), 4);
    }

    #[test]
    fn test_daily_streak_anchors_at_yesterday() {
        // Not completed today yet; the run through yesterday still counts.
        let dates = [d("2025-06-08"), d("2025-06-09")];
        assert_eq!(current_streak(&dates, Frequency::Daily, d("2025-06-10")), 2);
    }

    #[test]
    fn test_daily_streak_broken_chain() {
        let dates = [d("2025-06-01"), d("2025-06-02")];
        assert_eq!(current_streak(&dates, Frequency::Daily, d("2025-06-10")), 0);
    }

    #[test]
    fn test_daily_streak_ignores_gap_before_run() {
        let dates = [d("2025-06-01"), d("2025-06-09"), d("2025-06-10")];
        assert_eq!(current_streak(&dates, Frequency::Daily, d("2025-06-10")), 2);
    }

    #[test]
    fn test_weekly_streak_consecutive_weeks() {
        // Mondays of three consecutive ISO weeks.
        let dates = [d("2025-05-26"), d("2025-06-02"), d("2025-06-09")];
        assert_eq!(current_streak(&dates, Frequency::Weekly, d("2025-06-11")), 3);
    }

    #[test]
    fn test_weekly_streak_anchors_at_last_week() {
        let dates = [d("2025-06-02")];
        // Today falls in the week of June 9; last week counts.
        assert_eq!(current_streak(&dates, Frequency::Weekly, d("2025-06-11")), 1);
    }

    #[test]
    fn test_weekly_streak_multiple_days_same_week() {
        // Two completions in one week count as a single week.
        let dates = [d("2025-06-09"), d("2025-06-11")];
        assert_eq!(current_streak(&dates, Frequency::Weekly, d("2025-06-11")), 1);
    }

    #[test]
    fn test_weekly_streak_broken() {
        let dates = [d("2025-05-12")];
        assert_eq!(current_streak(&dates, Frequency::Weekly, d("2025-06-11")), 0);
    }
}
