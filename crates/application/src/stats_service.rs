use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use kanso_core::{AppError, AppResult};
use kanso_domain::{HabitId, UserId};

use crate::ports::{EntryRepository, HabitRepository};

/// Maximum inclusive span, in days, a single stats request may cover (§4.7).
pub const MAX_RANGE_DAYS: i64 = 366;

/// Per-habit progress across the requested range.
#[derive(Debug, Clone)]
pub struct HabitStats {
    pub habit_id: HabitId,
    /// Summed entry value per day, in range order, `0.0` for days with no entry.
    pub daily_progress: Vec<f64>,
    /// Count of days where the summed value met `target_value`.
    pub days_completed: i64,
    /// `days_completed / days_in_range`.
    pub completion_rate: f64,
}

/// Aggregate stats response for a date range (§4.7).
#[derive(Debug, Clone)]
pub struct WeeklyStats {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub habits: Vec<HabitStats>,
    /// `(Σ days_completed) / (Σ days_in_range)` across all habits.
    pub overall_completion_rate: f64,
}

/// Computes per-habit and overall completion statistics over a date range,
/// evaluated in the caller's local time zone (§4.7).
pub struct StatsService {
    habit_repository: Arc<dyn HabitRepository>,
    entry_repository: Arc<dyn EntryRepository>,
}

impl StatsService {
    /// Creates a stats service over the habit and entry repositories.
    #[must_use]
    pub fn new(
        habit_repository: Arc<dyn HabitRepository>,
        entry_repository: Arc<dyn EntryRepository>,
    ) -> Self {
        Self {
            habit_repository,
            entry_repository,
        }
    }

    /// Computes stats for `[start_date, end_date]` inclusive, in `time_zone`.
    pub async fn weekly(
        &self,
        user_id: UserId,
        start_date: NaiveDate,
        end_date: NaiveDate,
        time_zone: Tz,
    ) -> AppResult<WeeklyStats> {
        if end_date < start_date {
            return Err(AppError::Validation(
                "end_date must not precede start_date".to_owned(),
            ));
        }

        let days_in_range = (end_date - start_date).num_days() + 1;
        if days_in_range > MAX_RANGE_DAYS {
            return Err(AppError::Validation(format!(
                "range must not exceed {MAX_RANGE_DAYS} days"
            )));
        }

        let range_start_utc = zoned_midnight_to_utc(start_date, time_zone);
        let range_end_utc = zoned_end_of_day_to_utc(end_date, time_zone);

        let habits = self.habit_repository.list_live(user_id).await?;
        let habit_ids: Vec<HabitId> = habits.iter().map(|habit| habit.id).collect();

        let entries = if habit_ids.is_empty() {
            Vec::new()
        } else {
            self.entry_repository
                .list_by_habits_range(user_id, &habit_ids, range_start_utc, range_end_utc)
                .await?
        };

        let mut sums: HashMap<(HabitId, NaiveDate), f64> = HashMap::new();
        for entry in &entries {
            let local_date = entry.completion_date.with_timezone(&time_zone).date_naive();
            *sums.entry((entry.habit_id, local_date)).or_insert(0.0) += entry.value;
        }

        let days: Vec<NaiveDate> = start_date.iter_days().take_while(|day| *day <= end_date).collect();

        let mut habit_stats = Vec::with_capacity(habits.len());
        let mut total_completed = 0i64;
        for habit in &habits {
            let mut daily_progress = Vec::with_capacity(days.len());
            let mut days_completed = 0i64;
            for day in &days {
                let sum = sums.get(&(habit.id, *day)).copied().unwrap_or(0.0);
                if sum >= f64::from(habit.target_value) {
                    days_completed += 1;
                }
                daily_progress.push(sum);
            }
            total_completed += days_completed;

            #[allow(clippy::cast_precision_loss)]
            let completion_rate = days_completed as f64 / days_in_range as f64;

            habit_stats.push(HabitStats {
                habit_id: habit.id,
                daily_progress,
                days_completed,
                completion_rate,
            });
        }

        #[allow(clippy::cast_precision_loss)]
        let overall_completion_rate = if habits.is_empty() {
            0.0
        } else {
            total_completed as f64 / (habits.len() as i64 * days_in_range) as f64
        };

        Ok(WeeklyStats {
            start_date,
            end_date,
            habits: habit_stats,
            overall_completion_rate,
        })
    }
}

fn zoned_midnight_to_utc(date: NaiveDate, time_zone: Tz) -> DateTime<Utc> {
    zoned_to_utc(date.and_time(NaiveTime::MIN), time_zone)
}

fn zoned_end_of_day_to_utc(date: NaiveDate, time_zone: Tz) -> DateTime<Utc> {
    let end_of_day = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    zoned_to_utc(date.and_time(end_of_day), time_zone)
}

fn zoned_to_utc(naive: chrono::NaiveDateTime, time_zone: Tz) -> DateTime<Utc> {
    match time_zone.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => Utc.from_utc_datetime(&naive),
    }
}
