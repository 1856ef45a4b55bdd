use askama::Template;
use tracing::{debug, warn};

use super::{notice, warning, ViewContext};
use crate::{
    error::AppError,
    guard::{self, Access},
    map::MapView,
    models::{
        location::Location,
        trip::{Trip, TripStatus},
        user::Buddy,
    },
};

const NOT_FOUND: &str = "Trip not found.";
const DENIED: &str = "You are not allowed to view this trip.";

#[derive(Template)]
#[template(path = "views/trip_detail.html")]
struct TripDetailTemplate {
    id: i64,
    title: String,
    destination: String,
    start_date: String,
    end_date: String,
    dates: String,
    status: &'static str,
    statuses: Vec<StatusOption>,
    description: String,
    map_json: String,
    locations: Vec<LocationCard>,
    no_locations: bool,
    show_locations_error: bool,
    participants: Vec<String>,
    can_manage: bool,
    buddy_options: Vec<String>,
    show_buddies_error: bool,
}

struct StatusOption {
    value: &'static str,
    selected: bool,
}

struct LocationCard {
    id: i64,
    name: String,
    kind: String,
    latitude: String,
    longitude: String,
    address: String,
    description: String,
}

pub async fn load(ctx: &ViewContext<'_>, id: Option<i64>) -> Result<String, AppError> {
    let Some(id) = id else {
        return notice("secondary", NOT_FOUND);
    };
    let trip = match ctx.api.trip(ctx.session, id).await {
        Ok(trip) => trip,
        Err(err) => {
            debug!(trip_id = id, "trip lookup failed: {err}");
            return notice("secondary", NOT_FOUND);
        }
    };

    let identity = ctx.session.current_user();
    if guard::authorize_trip(identity.as_ref(), &trip) == Access::Deny {
        return warning(DENIED);
    }
    let can_manage = guard::is_organizer(identity.as_ref(), &trip);

    let buddies = async {
        match (&identity, can_manage) {
            (Some(user), true) => ctx.api.buddies(ctx.session, &user.subject).await.map(Some),
            _ => Ok(None),
        }
    };
    let (locations, buddies) = tokio::join!(ctx.api.locations(ctx.session, trip.id), buddies);

    let (locations, show_locations_error) = match locations {
        Ok(locations) => (locations, false),
        Err(err) => {
            warn!(trip_id = trip.id, "failed to load locations: {err}");
            (Vec::new(), true)
        }
    };
    let (buddy_options, show_buddies_error) = match buddies {
        Ok(buddies) => (
            addable_buddies(&trip, buddies.as_deref().unwrap_or_default()),
            false,
        ),
        Err(err) => {
            warn!(trip_id = trip.id, "failed to load buddies: {err}");
            (Vec::new(), true)
        }
    };

    let map = MapView::for_trip(trip.coordinates(), &locations);
    let template = TripDetailTemplate {
        id: trip.id,
        title: trip.title.clone(),
        destination: trip.destination.clone(),
        start_date: trip.start_date.format("%Y-%m-%d").to_string(),
        end_date: trip.end_date.format("%Y-%m-%d").to_string(),
        dates: format!(
            "From: {} - To: {}",
            trip.start_date.format("%d.%m.%Y"),
            trip.end_date.format("%d.%m.%Y")
        ),
        status: trip.status.as_str(),
        statuses: TripStatus::ALL
            .iter()
            .map(|status| StatusOption {
                value: status.as_str(),
                selected: *status == trip.status,
            })
            .collect(),
        description: trip.description.clone().unwrap_or_default(),
        map_json: map.to_json()?,
        no_locations: locations.is_empty() && !show_locations_error,
        locations: locations.iter().map(location_card).collect(),
        show_locations_error,
        participants: trip.participant_usernames.clone(),
        can_manage,
        buddy_options,
        show_buddies_error,
    };
    Ok(template.render()?)
}

/// Accepted buddies that are not on the trip yet.
fn addable_buddies(trip: &Trip, buddies: &[Buddy]) -> Vec<String> {
    buddies
        .iter()
        .filter(|buddy| buddy.accepted && !trip.has_participant(&buddy.username))
        .map(|buddy| buddy.username.clone())
        .collect()
}

fn location_card(location: &Location) -> LocationCard {
    LocationCard {
        id: location.id,
        name: location.name.clone(),
        kind: location.kind.clone().unwrap_or_default(),
        latitude: location.latitude.to_string(),
        longitude: location.longitude.to_string(),
        address: location.address.clone().unwrap_or_default(),
        description: location.description.clone().unwrap_or_default(),
    }
}
