use chrono::{DateTime, Utc};
use kanso_application::EntryPatch;
use serde::Deserialize;
use uuid::Uuid;

/// `POST /entries` request body.
#[derive(Debug, Deserialize)]
pub struct EntryCreateRequest {
    pub id: Option<Uuid>,
    pub habit_id: Uuid,
    pub completion_date: DateTime<Utc>,
    pub value: f64,
    pub notes: Option<String>,
}

/// `PUT /entries/:id` request body.
#[derive(Debug, Deserialize, Default)]
pub struct EntryPatchRequest {
    pub value: Option<f64>,
    pub notes: Option<String>,
    pub version: Option<i64>,
}

impl From<EntryPatchRequest> for EntryPatch {
    fn from(value: EntryPatchRequest) -> Self {
        Self {
            value: value.value,
            notes: value.notes,
            version: value.version,
        }
    }
}

/// `GET /entries` query parameters.
#[derive(Debug, Deserialize)]
pub struct EntryQuery {
    pub habit_id: Uuid,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// `GET /entries/sync` query parameters.
#[derive(Debug, Deserialize)]
pub struct EntrySyncQuery {
    pub since: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_request_maps_fields_straight_through() {
        let request = EntryPatchRequest {
            value: Some(2.5),
            notes: Some("felt great".to_owned()),
            version: Some(4),
        };

        let patch = EntryPatch::from(request);
        assert_eq!(patch.value, Some(2.5));
        assert_eq!(patch.notes.as_deref(), Some("felt great"));
        assert_eq!(patch.version, Some(4));
    }

    #[test]
    fn default_patch_request_yields_all_none_patch() {
        let patch = EntryPatch::from(EntryPatchRequest::default());
        assert!(patch.value.is_none());
        assert!(patch.notes.is_none());
        assert!(patch.version.is_none());
    }
}
