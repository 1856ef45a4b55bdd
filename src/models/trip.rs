use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripStatus {
    #[default]
    Planning,
    Confirmed,
    Ongoing,
    Completed,
    Cancelled,
}

impl TripStatus {
    pub const ALL: [TripStatus; 5] = [
        TripStatus::Planning,
        TripStatus::Confirmed,
        TripStatus::Ongoing,
        TripStatus::Completed,
        TripStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Planning => "PLANNING",
            TripStatus::Confirmed => "CONFIRMED",
            TripStatus::Ongoing => "ONGOING",
            TripStatus::Completed => "COMPLETED",
            TripStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TripStatus {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        TripStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(raw))
            .ok_or_else(|| AppError::Validation(format!("Unknown trip status: {raw}")))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub destination: String,
    pub organizer_id: i64,
    #[serde(default)]
    pub status: TripStatus,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub participant_usernames: Vec<String>,
}

impl Trip {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    pub fn has_participant(&self, username: &str) -> bool {
        self.participant_usernames.iter().any(|p| p == username)
    }
}

/// Body of `POST /api/trips` and `PUT /api/trips/{id}`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub destination: String,
    pub organizer_id: i64,
    pub status: TripStatus,
}

/// Raw trip form fields as submitted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl TripForm {
    pub fn into_draft(self, organizer_id: i64) -> Result<TripDraft, AppError> {
        let title = self.title.trim();
        let destination = self.destination.trim();
        if title.is_empty()
            || destination.is_empty()
            || self.start_date.trim().is_empty()
            || self.end_date.trim().is_empty()
        {
            return Err(AppError::Validation("All fields are required.".into()));
        }
        if title.chars().count() > 100 || destination.chars().count() > 100 {
            return Err(AppError::Validation(
                "Title and destination must be less than 100 characters.".into(),
            ));
        }

        let start_date = parse_date(&self.start_date, "start date")?;
        let end_date = parse_date(&self.end_date, "end date")?;
        if end_date < start_date {
            return Err(AppError::Validation(
                "The end date must not be before the start date.".into(),
            ));
        }

        let status = if self.status.trim().is_empty() {
            TripStatus::default()
        } else {
            self.status.parse()?
        };

        Ok(TripDraft {
            title: title.to_string(),
            description: crate::models::normalize_optional(self.description),
            start_date,
            end_date,
            destination: destination.to_string(),
            organizer_id,
            status,
        })
    }
}

fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid {field}: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> TripForm {
        TripForm {
            title: " Vienna ".into(),
            destination: "Wien".into(),
            start_date: "2025-06-01".into(),
            end_date: "2025-06-05".into(),
            status: "confirmed".into(),
            description: Some("  ".into()),
        }
    }

    #[test]
    fn builds_draft_from_form() {
        let draft = form().into_draft(3).unwrap();
        assert_eq!(draft.title, "Vienna");
        assert_eq!(draft.status, TripStatus::Confirmed);
        assert_eq!(draft.organizer_id, 3);
        assert_eq!(draft.description, None);
    }

    #[test]
    fn rejects_missing_fields() {
        let mut missing = form();
        missing.destination = "   ".into();
        assert!(matches!(
            missing.into_draft(1),
            Err(AppError::Validation(msg)) if msg == "All fields are required."
        ));
    }

    #[test]
    fn rejects_reversed_dates() {
        let mut reversed = form();
        reversed.end_date = "2025-05-01".into();
        assert!(matches!(reversed.into_draft(1), Err(AppError::Validation(_))));
    }

    #[test]
    fn deserializes_api_payload() {
        let trip: Trip = serde_json::from_str(
            r#"{"id":4,"title":"T","startDate":"2025-01-02","endDate":"2025-01-03",
                "destination":"Graz","organizerId":9,"status":"ONGOING",
                "participantUsernames":["bob"],"locations":[]}"#,
        )
        .unwrap();
        assert_eq!(trip.status, TripStatus::Ongoing);
        assert!(trip.has_participant("bob"));
        assert_eq!(trip.coordinates(), None);
    }
}
