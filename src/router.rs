//! Hash routing: `#<path>?<query>` to a view kind.
//!
//! Parsing is pure so every navigation decision can be checked without a
//! browser; rendering lives in [`crate::views`].

use std::collections::BTreeMap;

use url::form_urlencoded;

pub const DEFAULT_POI_RADIUS: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    pub query: BTreeMap<String, String>,
}

impl Route {
    pub fn parse(hash: &str) -> Self {
        let raw = hash.trim_start();
        let raw = raw.strip_prefix('#').unwrap_or(raw);
        let (path, query) = raw.split_once('?').unwrap_or((raw, ""));

        let path = path.trim().to_lowercase();
        let path = if path.is_empty() {
            "home".to_string()
        } else {
            path
        };

        let query = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();

        Self { path, query }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteKind {
    Home(HomeQuery),
    Trips { page: usize },
    /// `None` when the id segment is not a number; the loader treats it as
    /// an unknown trip.
    TripDetail(Option<i64>),
    Buddies,
    Profile,
}

impl From<&Route> for RouteKind {
    fn from(route: &Route) -> Self {
        if let Some(id) = route.path.strip_prefix("trip/") {
            return RouteKind::TripDetail(id.trim().parse().ok());
        }
        match route.path.as_str() {
            "trips" => RouteKind::Trips {
                page: parse_page(route.param("page")),
            },
            "buddies" => RouteKind::Buddies,
            "profile" => RouteKind::Profile,
            _ => RouteKind::Home(HomeQuery::from_route(route)),
        }
    }
}

impl RouteKind {
    pub fn parse(hash: &str) -> Self {
        RouteKind::from(&Route::parse(hash))
    }

    /// Fragment (with leading `#`) that navigates back to this view.
    pub fn href(&self) -> String {
        match self {
            RouteKind::Home(query) => query.href(),
            RouteKind::Trips { page } if *page > 1 => format!("#trips?page={page}"),
            RouteKind::Trips { .. } => "#trips".to_string(),
            RouteKind::TripDetail(Some(id)) => format!("#trip/{id}"),
            RouteKind::TripDetail(None) => "#trips".to_string(),
            RouteKind::Buddies => "#buddies".to_string(),
            RouteKind::Profile => "#profile".to_string(),
        }
    }
}

fn parse_page(raw: Option<&str>) -> usize {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|page| *page > 0)
        .unwrap_or(1)
}

/// City search state carried in the home fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeQuery {
    pub query: Option<String>,
    pub types: Vec<String>,
    pub radius: u32,
    pub hour: Option<usize>,
    pub day: Option<usize>,
}

impl Default for HomeQuery {
    fn default() -> Self {
        Self {
            query: None,
            types: Vec::new(),
            radius: DEFAULT_POI_RADIUS,
            hour: None,
            day: None,
        }
    }
}

impl HomeQuery {
    fn from_route(route: &Route) -> Self {
        let query = route
            .param("query")
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string);
        let types = route.param("types").map(split_types).unwrap_or_default();
        let radius = route
            .param("radius")
            .and_then(|r| r.trim().parse::<u32>().ok())
            .filter(|r| *r > 0)
            .unwrap_or(DEFAULT_POI_RADIUS);
        let index = |name: &str| route.param(name).and_then(|v| v.trim().parse().ok());

        Self {
            query,
            types,
            radius,
            hour: index("hour"),
            day: index("day"),
        }
    }

    pub fn href(&self) -> String {
        let mut params = form_urlencoded::Serializer::new(String::new());
        if let Some(query) = &self.query {
            params.append_pair("query", query);
        }
        if !self.types.is_empty() {
            params.append_pair("types", &self.types.join(","));
        }
        if self.radius != DEFAULT_POI_RADIUS {
            params.append_pair("radius", &self.radius.to_string());
        }
        if let Some(hour) = self.hour {
            params.append_pair("hour", &hour.to_string());
        }
        if let Some(day) = self.day {
            params.append_pair("day", &day.to_string());
        }
        let params = params.finish();
        if params.is_empty() {
            "#home".to_string()
        } else {
            format!("#home?{params}")
        }
    }
}

pub fn split_types(raw: &str) -> Vec<String> {
    let mut types: Vec<String> = Vec::new();
    for item in raw.split(',') {
        let item = item.trim().to_lowercase();
        if !item.is_empty() && !types.contains(&item) {
            types.push(item);
        }
    }
    types
}

#[derive(Debug, Clone)]
pub struct NavLink {
    pub href: &'static str,
    pub label: &'static str,
    pub current: bool,
}

const NAV_ITEMS: [(&str, &str); 4] = [
    ("#home", "Home"),
    ("#trips", "My Trips"),
    ("#buddies", "My Buddies"),
    ("#profile", "Profile"),
];

/// Navigation entries, marking the one whose href equals the full current
/// hash (query included).
pub fn nav_links(current_hash: &str) -> Vec<NavLink> {
    let current = current_hash.trim();
    let current = if current.is_empty() || current.starts_with('#') {
        current.to_string()
    } else {
        format!("#{current}")
    };
    NAV_ITEMS
        .iter()
        .map(|(href, label)| NavLink {
            href,
            label,
            current: *href == current,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_path_and_query() {
        let route = Route::parse("#Trips?page=3&x=y");
        assert_eq!(route.path, "trips");
        assert_eq!(route.param("page"), Some("3"));
        assert_eq!(route.param("x"), Some("y"));
    }

    #[test]
    fn empty_hash_defaults_to_home() {
        assert_eq!(Route::parse("").path, "home");
        assert_eq!(Route::parse("#").path, "home");
        assert_eq!(Route::parse("#   ?page=2").path, "home");
        assert_eq!(RouteKind::parse(""), RouteKind::Home(HomeQuery::default()));
    }

    #[test]
    fn trip_detail_with_and_without_numeric_id() {
        assert_eq!(RouteKind::parse("#trip/42"), RouteKind::TripDetail(Some(42)));
        assert_eq!(RouteKind::parse("trip/42"), RouteKind::TripDetail(Some(42)));
        assert_eq!(RouteKind::parse("#TRIP/7"), RouteKind::TripDetail(Some(7)));
        assert_eq!(RouteKind::parse("#trip/abc"), RouteKind::TripDetail(None));
        assert_eq!(RouteKind::parse("#trip/"), RouteKind::TripDetail(None));
    }

    #[test]
    fn unknown_paths_fall_back_to_home() {
        for hash in ["#about", "#tripx", "#nope?page=2", "#trips/1"] {
            assert!(
                matches!(RouteKind::parse(hash), RouteKind::Home(_)),
                "{hash}"
            );
        }
    }

    #[test]
    fn trips_page_is_clamped_to_one() {
        assert_eq!(RouteKind::parse("#trips"), RouteKind::Trips { page: 1 });
        assert_eq!(RouteKind::parse("#trips?page="), RouteKind::Trips { page: 1 });
        assert_eq!(RouteKind::parse("#trips?page=0"), RouteKind::Trips { page: 1 });
        assert_eq!(RouteKind::parse("#trips?page=-2"), RouteKind::Trips { page: 1 });
        assert_eq!(RouteKind::parse("#trips?page=2"), RouteKind::Trips { page: 2 });
    }

    #[test]
    fn home_query_round_trips_through_href() {
        let kind = RouteKind::parse("#home?query=Wien&types=Cafe,bar,cafe&radius=500&hour=3");
        let RouteKind::Home(query) = &kind else {
            panic!("expected home");
        };
        assert_eq!(query.query.as_deref(), Some("Wien"));
        assert_eq!(query.types, vec!["cafe", "bar"]);
        assert_eq!(query.radius, 500);
        assert_eq!(query.hour, Some(3));
        assert_eq!(RouteKind::parse(&kind.href()), kind);
    }

    #[test]
    fn nav_marks_exact_hash_only() {
        let current: Vec<_> = nav_links("#trips")
            .into_iter()
            .filter(|l| l.current)
            .map(|l| l.href)
            .collect();
        assert_eq!(current, vec!["#trips"]);
        assert!(nav_links("#trips?page=2").iter().all(|l| !l.current));
        assert!(nav_links("").iter().all(|l| !l.current));
    }
}
