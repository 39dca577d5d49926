use chrono::NaiveDate;
use kanso_application::{HabitStats, WeeklyStats};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `GET /stats/weekly` query parameters. `time_zone` is an IANA name (e.g.
/// `"America/New_York"`); absent defaults to UTC.
#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub time_zone: Option<String>,
}

/// Per-habit progress, transport shape of `HabitStats`.
#[derive(Debug, Serialize)]
pub struct HabitStatsResponse {
    pub habit_id: Uuid,
    pub daily_progress: Vec<f64>,
    pub days_completed: i64,
    pub completion_rate: f64,
}

impl From<&HabitStats> for HabitStatsResponse {
    fn from(stats: &HabitStats) -> Self {
        Self {
            habit_id: stats.habit_id.as_uuid(),
            daily_progress: stats.daily_progress.clone(),
            days_completed: stats.days_completed,
            completion_rate: stats.completion_rate,
        }
    }
}

/// `GET /stats/weekly` response, transport shape of `WeeklyStats`.
#[derive(Debug, Serialize)]
pub struct WeeklyStatsResponse {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub habits: Vec<HabitStatsResponse>,
    pub overall_completion_rate: f64,
}

impl From<&WeeklyStats> for WeeklyStatsResponse {
    fn from(stats: &WeeklyStats) -> Self {
        Self {
            start_date: stats.start_date,
            end_date: stats.end_date,
            habits: stats.habits.iter().map(HabitStatsResponse::from).collect(),
            overall_completion_rate: stats.overall_completion_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use kanso_domain::HabitId;

    use super::*;

    #[test]
    fn weekly_stats_response_flattens_every_habit() {
        let habit_id = HabitId::new();
        let stats = WeeklyStats {
            start_date: NaiveDate::from_ymd_opt(2026, 1, 5).expect("valid date"),
            end_date: NaiveDate::from_ymd_opt(2026, 1, 11).expect("valid date"),
            habits: vec![HabitStats {
                habit_id,
                daily_progress: vec![1.0, 0.0, 1.0],
                days_completed: 2,
                completion_rate: 2.0 / 3.0,
            }],
            overall_completion_rate: 2.0 / 3.0,
        };

        let response = WeeklyStatsResponse::from(&stats);
        assert_eq!(response.habits.len(), 1);
        assert_eq!(response.habits[0].habit_id, habit_id.as_uuid());
        assert_eq!(response.habits[0].days_completed, 2);
        assert_eq!(response.overall_completion_rate, 2.0 / 3.0);
    }
}
