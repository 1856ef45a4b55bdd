use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub trip_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationDraft {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub trip_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub latitude: String,
    #[serde(default)]
    pub longitude: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl LocationForm {
    pub fn into_draft(self, trip_id: i64) -> Result<LocationDraft, AppError> {
        let name = self.name.trim();
        if name.is_empty() || self.latitude.trim().is_empty() || self.longitude.trim().is_empty()
        {
            return Err(AppError::Validation(
                "Name, latitude and longitude are required.".into(),
            ));
        }
        let latitude = parse_coordinate(&self.latitude, 90.0, "latitude")?;
        let longitude = parse_coordinate(&self.longitude, 180.0, "longitude")?;

        Ok(LocationDraft {
            name: name.to_string(),
            latitude,
            longitude,
            address: crate::models::normalize_optional(self.address),
            kind: crate::models::normalize_optional(self.kind),
            description: crate::models::normalize_optional(self.description),
            trip_id,
        })
    }
}

fn parse_coordinate(raw: &str, limit: f64, field: &str) -> Result<f64, AppError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && value.abs() <= limit)
        .ok_or_else(|| AppError::Validation(format!("Invalid {field}: {raw}")))
}

/// Geocoding hit from `GET /api/locations/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub display_name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Point of interest from `GET /api/locations/poi`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl PointOfInterest {
    pub fn type_key(&self) -> String {
        self.kind
            .as_deref()
            .map(str::trim)
            .filter(|kind| !kind.is_empty())
            .unwrap_or("default")
            .to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_form_requires_coordinates() {
        let form = LocationForm {
            name: "Dom".into(),
            latitude: "48.2".into(),
            longitude: "".into(),
            ..Default::default()
        };
        assert!(matches!(form.into_draft(1), Err(AppError::Validation(_))));
    }

    #[test]
    fn location_form_rejects_out_of_range() {
        let form = LocationForm {
            name: "Nowhere".into(),
            latitude: "91".into(),
            longitude: "10".into(),
            ..Default::default()
        };
        assert!(form.into_draft(1).is_err());
    }

    #[test]
    fn poi_type_key_defaults() {
        let poi: PointOfInterest =
            serde_json::from_str(r#"{"name":"X","latitude":1.0,"longitude":2.0,"type":"Cafe"}"#)
                .unwrap();
        assert_eq!(poi.type_key(), "cafe");
        let untyped: PointOfInterest =
            serde_json::from_str(r#"{"name":"Y","latitude":1.0,"longitude":2.0}"#).unwrap();
        assert_eq!(untyped.type_key(), "default");
    }
}
