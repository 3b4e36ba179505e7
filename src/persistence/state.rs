//! Persisted app-state record
//!
//! JSON layout (camelCase, optionals omitted when unset):
//! `{ "version": 1, "savedAt": "2024-05-01T09:30:00.000Z", "events": [...],
//!    "selectedDate": "2024-05-01", "role": "ADMIN" }`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scheduling event owned by the app, stored verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationalEvent(pub serde_json::Value);

impl From<serde_json::Value> for OperationalEvent {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// Role of the signed-in user. The app owns the set of roles, so any string
/// is kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRole(pub String);

impl UserRole {
    pub const ADMIN: &'static str = "ADMIN";
    pub const SUPERVISOR: &'static str = "SUPERVISOR";
    pub const OPERATOR: &'static str = "OPERATOR";
    pub const VIEWER: &'static str = "VIEWER";

    pub fn new(role: impl Into<String>) -> Self {
        Self(role.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserRole {
    fn from(role: &str) -> Self {
        Self::new(role)
    }
}

/// Caller-owned part of the record; everything `save` writes besides the stamp
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub events: Vec<OperationalEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

impl SaveRequest {
    pub fn new(events: Vec<OperationalEvent>) -> Self {
        Self {
            events,
            ..Default::default()
        }
    }

    pub fn with_selected_date(mut self, date: impl Into<String>) -> Self {
        self.selected_date = Some(date.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<UserRole>) -> Self {
        self.role = Some(role.into());
        self
    }
}

/// A complete stored record, as returned by `load`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub version: u32,
    /// `None` when the stored stamp is missing or unreadable
    #[serde(default, with = "lenient_iso", skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
    pub events: Vec<OperationalEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

impl PersistedState {
    /// Drop the stamp, keeping what the app saved
    pub fn into_request(self) -> SaveRequest {
        SaveRequest {
            events: self.events,
            selected_date: self.selected_date,
            role: self.role,
        }
    }
}

/// Borrowed view of a record, used on the write path
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RecordRef<'a> {
    pub version: u32,
    #[serde(serialize_with = "iso_millis::serialize")]
    pub saved_at: DateTime<Utc>,
    pub events: &'a [OperationalEvent],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_date: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'a UserRole>,
}

impl<'a> RecordRef<'a> {
    pub fn stamp(request: &'a SaveRequest, version: u32, saved_at: DateTime<Utc>) -> Self {
        Self {
            version,
            saved_at,
            events: &request.events,
            selected_date: request.selected_date.as_deref(),
            role: request.role.as_ref(),
        }
    }
}

/// UTC timestamps with millisecond precision and a `Z` suffix, the shape
/// JavaScript's `Date#toISOString` produces.
pub(crate) mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::Serializer;

    pub fn format(ts: &DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(ts))
    }
}

/// Optional timestamp that never fails to deserialize: anything that isn't a
/// readable date or date-time becomes `None`.
pub(crate) mod lenient_iso {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(
        ts: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match ts {
            Some(ts) => super::iso_millis::serialize(ts, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_str().and_then(parse))
    }

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(ts.and_utc());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|day| day.and_hms_opt(0, 0, 0))
            .map(|ts| ts.and_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_role_is_opaque() {
        assert_eq!(
            serde_json::to_value(UserRole::new(UserRole::ADMIN)).unwrap(),
            json!("ADMIN")
        );
        let role: UserRole = serde_json::from_value(json!("CAPOTURNO")).unwrap();
        assert_eq!(role.as_str(), "CAPOTURNO");

        let request: SaveRequest =
            serde_json::from_str(r#"{"events":[{"id":"e1"}],"role":"CAPOTURNO"}"#).unwrap();
        assert_eq!(request.role, Some(UserRole::from("CAPOTURNO")));
    }

    #[test]
    fn test_record_layout() {
        let request = SaveRequest::new(vec![json!({"id": "e1"}).into()]).with_role(UserRole::ADMIN);
        let saved_at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let value = serde_json::to_value(RecordRef::stamp(&request, 1, saved_at)).unwrap();

        assert_eq!(
            value,
            json!({
                "version": 1,
                "savedAt": "2024-05-01T09:30:00.000Z",
                "events": [{"id": "e1"}],
                "role": "ADMIN",
            })
        );
    }

    #[test]
    fn test_read_accepts_null_optionals_and_offsets() {
        let state: PersistedState = serde_json::from_value(json!({
            "version": 1,
            "savedAt": "2024-05-01T11:30:00+02:00",
            "events": [],
            "selectedDate": null,
            "role": null,
        }))
        .unwrap();

        assert_eq!(
            state.saved_at,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap())
        );
        assert_eq!(state.selected_date, None);
        assert_eq!(state.role, None);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_saved_at_is_lenient() {
        let missing: PersistedState =
            serde_json::from_value(json!({"version": 1, "events": []})).unwrap();
        assert_eq!(missing.saved_at, None);

        for stamp in [json!("yesterday"), json!(12345), json!(null)] {
            let state: PersistedState =
                serde_json::from_value(json!({"version": 1, "savedAt": stamp, "events": []}))
                    .unwrap();
            assert_eq!(state.saved_at, None);
        }

        assert_eq!(
            lenient_iso::parse("2024-05-01"),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            lenient_iso::parse("2024-05-01T09:30:00.250"),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap() + chrono::Duration::milliseconds(250))
        );
    }

    #[test]
    fn test_events_kept_verbatim() {
        let event = json!({"id": "e1", "nested": {"shift": [1, 2, 3]}, "note": null});
        let request = SaveRequest::new(vec![event.clone().into()]);
        let json = serde_json::to_string(&request).unwrap();
        let back: SaveRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.events[0].0, event);
    }
}
