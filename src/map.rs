//! Map state handed to the browser shell.
//!
//! A `MapView` is built by the loader of the view that shows it and dies with
//! that render; the shell removes the previous map instance before it builds
//! the one described by the next view.

use serde::Serialize;

use crate::{
    error::AppError,
    models::location::{Location, Place, PointOfInterest},
};

pub const WORLD_CENTER: [f64; 2] = [20.0, 0.0];
pub const WORLD_ZOOM: u8 = 2;
pub const CITY_ZOOM: u8 = 13;
pub const TRIP_ZOOM: u8 = 10;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MapView {
    pub center: [f64; 2],
    pub zoom: u8,
    pub fit_bounds: bool,
    pub markers: Vec<Marker>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Marker {
    pub position: [f64; 2],
    pub title: String,
    pub lines: Vec<String>,
    pub link: Option<String>,
    pub icon: &'static str,
    pub color: &'static str,
}

impl MapView {
    pub fn world() -> Self {
        Self::centered(WORLD_CENTER, WORLD_ZOOM)
    }

    pub fn centered(center: [f64; 2], zoom: u8) -> Self {
        Self {
            center,
            zoom,
            fit_bounds: false,
            markers: Vec::new(),
        }
    }

    /// Trip map: framed on its locations when there are any, otherwise on
    /// the trip's own coordinates, otherwise the whole world. A single
    /// location has no bounds to fit, so the view centers on it instead.
    pub fn for_trip(coordinates: Option<(f64, f64)>, locations: &[Location]) -> Self {
        let mut view = match coordinates {
            Some((lat, lon)) => Self::centered([lat, lon], TRIP_ZOOM),
            None => Self::centered([0.0, 0.0], WORLD_ZOOM),
        };
        for location in locations {
            view.markers.push(Marker {
                position: [location.latitude, location.longitude],
                title: location.name.clone(),
                lines: location.address.iter().cloned().collect(),
                link: None,
                icon: "map-marker",
                color: "blue",
            });
        }
        match view.markers.as_slice() {
            [] => {}
            [only] => {
                view.center = only.position;
                view.zoom = CITY_ZOOM;
            }
            _ => view.fit_bounds = true,
        }
        view
    }

    pub fn focus_place(&mut self, place: &Place) {
        self.center = [place.latitude, place.longitude];
        self.zoom = CITY_ZOOM;
        self.markers.push(Marker {
            position: self.center,
            title: place.display_name.clone(),
            lines: Vec::new(),
            link: None,
            icon: "map-marker",
            color: "blue",
        });
    }

    pub fn add_poi(&mut self, poi: &PointOfInterest) {
        let type_key = poi.type_key();
        let (icon, color) = poi_icon(&type_key);
        let mut lines = vec![format!("Type: {}", poi.kind.as_deref().unwrap_or("unknown"))];
        if let Some(phone) = &poi.phone {
            lines.push(format!("Phone: {phone}"));
        }
        self.markers.push(Marker {
            position: [poi.latitude, poi.longitude],
            title: poi.name.clone(),
            lines,
            link: poi.website.clone(),
            icon,
            color,
        });
    }

    pub fn to_json(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Font Awesome icon and marker colour per POI type.
pub fn poi_icon(type_key: &str) -> (&'static str, &'static str) {
    match type_key {
        "restaurant" => ("cutlery", "red"),
        "cafe" => ("coffee", "orange"),
        "bar" => ("martini-glass", "darkred"),
        "pub" => ("beer", "darkgreen"),
        "theatre" => ("music", "purple"),
        "parking" => ("car", "cadetblue"),
        "hotel" => ("bed", "blue"),
        "hostel" => ("home", "blue"),
        "museum" => ("university", "darkblue"),
        "attraction" => ("star", "green"),
        "viewpoint" => ("binoculars", "green"),
        "information" => ("info-circle", "darkpurple"),
        "park" => ("tree", "green"),
        "playground" => ("child", "green"),
        "monument" => ("landmark", "darkred"),
        "castle" => ("chess-rook", "darkblue"),
        "memorial" => ("cross", "purple"),
        "ruins" => ("archway", "darkred"),
        _ => ("map-marker", "blue"),
    }
}

pub const POI_CATEGORIES: [(&str, &[&str]); 4] = [
    (
        "Amenity",
        &["restaurant", "cafe", "theatre", "bar", "pub", "parking"],
    ),
    (
        "Tourism",
        &["hotel", "museum", "attraction", "viewpoint", "hostel", "information"],
    ),
    ("Leisure", &["park", "playground"]),
    ("Historic", &["monument", "castle", "memorial", "ruins"]),
];

pub const POI_RADII: [u32; 4] = [500, 1000, 2000, 5000];

#[cfg(test)]
mod tests {
    use super::*;

    fn location(name: &str, lat: f64, lon: f64) -> Location {
        Location {
            id: 1,
            name: name.into(),
            latitude: lat,
            longitude: lon,
            address: Some("Street 1".into()),
            kind: None,
            description: None,
            trip_id: Some(1),
        }
    }

    #[test]
    fn trip_map_fits_locations() {
        let view = MapView::for_trip(
            Some((48.2, 16.3)),
            &[location("A", 1.0, 2.0), location("B", 3.0, 4.0)],
        );
        assert!(view.fit_bounds);
        assert_eq!(view.markers.len(), 2);
        assert_eq!(view.markers[0].lines, vec!["Street 1"]);
    }

    #[test]
    fn single_location_without_trip_coordinates_is_centered() {
        let view = MapView::for_trip(None, &[location("Innsbruck", 47.26, 11.39)]);
        assert!(!view.fit_bounds);
        assert_eq!(view.center, [47.26, 11.39]);
        assert_eq!(view.zoom, CITY_ZOOM);
        assert_eq!(view.markers.len(), 1);

        let with_trip = MapView::for_trip(Some((48.2, 16.3)), &[location("A", 1.0, 2.0)]);
        assert_eq!(with_trip.center, [1.0, 2.0]);
    }

    #[test]
    fn trip_map_without_locations() {
        let view = MapView::for_trip(Some((48.2, 16.3)), &[]);
        assert!(!view.fit_bounds);
        assert_eq!(view.center, [48.2, 16.3]);
        assert_eq!(MapView::for_trip(None, &[]).zoom, WORLD_ZOOM);
        assert_eq!(MapView::for_trip(None, &[]).center, [0.0, 0.0]);
    }

    #[test]
    fn unknown_poi_type_uses_default_icon() {
        assert_eq!(poi_icon("cafe"), ("coffee", "orange"));
        assert_eq!(poi_icon("spaceport"), ("map-marker", "blue"));
    }
}
