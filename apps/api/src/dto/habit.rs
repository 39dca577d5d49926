use chrono::{DateTime, NaiveDate, Utc};
use kanso_application::HabitPatch;
use kanso_domain::{FrequencyType, HabitType};
use serde::Deserialize;

/// `POST /habits` and `PUT /habits/:id` request body. Every field optional,
/// matching `HabitPatch`'s create-default / update-untouched semantics.
#[derive(Debug, Deserialize, Default)]
pub struct HabitPatchRequest {
    pub id: Option<uuid::Uuid>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub sort_order: Option<i32>,
    pub habit_type: Option<HabitType>,
    pub frequency_type: Option<FrequencyType>,
    pub weekdays: Option<Vec<u8>>,
    pub interval: Option<i32>,
    pub reminder_time: Option<String>,
    pub unit: Option<String>,
    pub target_value: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub archived: Option<bool>,
    pub version: Option<i64>,
}

impl From<HabitPatchRequest> for HabitPatch {
    fn from(value: HabitPatchRequest) -> Self {
        Self {
            title: value.title,
            description: value.description,
            color: value.color,
            icon: value.icon,
            sort_order: value.sort_order,
            habit_type: value.habit_type,
            frequency_type: value.frequency_type,
            weekdays: value.weekdays,
            interval: value.interval,
            reminder_time: value.reminder_time,
            unit: value.unit,
            target_value: value.target_value,
            start_date: value.start_date,
            end_date: value.end_date,
            archived: value.archived,
            version: value.version,
        }
    }
}

/// `GET /habits/sync` query parameters.
#[derive(Debug, Deserialize)]
pub struct HabitSyncQuery {
    pub last_sync: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_request_carries_every_field_into_habit_patch() {
        let request = HabitPatchRequest {
            id: None,
            title: Some("Drink water".to_owned()),
            description: Some("8 glasses a day".to_owned()),
            color: Some("#00ff00".to_owned()),
            icon: Some("droplet".to_owned()),
            sort_order: Some(2),
            habit_type: Some(HabitType::Numeric),
            frequency_type: Some(FrequencyType::Daily),
            weekdays: Some(vec![1, 3, 5]),
            interval: Some(1),
            reminder_time: Some("08:00".to_owned()),
            unit: Some("glasses".to_owned()),
            target_value: Some(8),
            start_date: None,
            end_date: None,
            archived: Some(false),
            version: Some(3),
        };

        let patch = HabitPatch::from(request);
        assert_eq!(patch.title.as_deref(), Some("Drink water"));
        assert_eq!(patch.target_value, Some(8));
        assert_eq!(patch.version, Some(3));
        assert_eq!(patch.weekdays, Some(vec![1, 3, 5]));
    }

    #[test]
    fn default_patch_request_yields_all_none_patch() {
        let patch = HabitPatch::from(HabitPatchRequest::default());
        assert!(patch.title.is_none());
        assert!(patch.version.is_none());
        assert!(patch.archived.is_none());
    }
}
