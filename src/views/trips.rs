use askama::Template;

use super::{warning, ViewContext};
use crate::{
    error::AppError,
    models::trip::{Trip, TripStatus},
    pagination::Page,
    router::RouteKind,
};

#[derive(Template)]
#[template(path = "views/trips.html")]
struct TripsTemplate {
    trips: Vec<TripCard>,
    empty: bool,
    has_pages: bool,
    pages: Vec<PageLinkView>,
    statuses: Vec<&'static str>,
}

struct TripCard {
    href: String,
    title: String,
    destination: String,
    dates: String,
    status: &'static str,
}

struct PageLinkView {
    href: String,
    number: usize,
    current: bool,
}

pub async fn load(ctx: &ViewContext<'_>, page: usize) -> Result<String, AppError> {
    let Some(user) = ctx.session.current_user() else {
        return warning("Please log in to view your trips.");
    };

    let (organized, joined) = tokio::join!(
        ctx.api.trips_by_organizer(ctx.session, user.id),
        ctx.api.trips_by_participant(ctx.session, user.id)
    );
    let trips = merge_trips(organized?, joined?);
    let page = Page::paginate(trips, page, ctx.page_size);

    let template = TripsTemplate {
        empty: page.items.is_empty(),
        has_pages: page.has_many_pages(),
        pages: page
            .links()
            .into_iter()
            .map(|link| PageLinkView {
                href: RouteKind::Trips { page: link.number }.href(),
                number: link.number,
                current: link.current,
            })
            .collect(),
        trips: page.items.iter().map(trip_card).collect(),
        statuses: TripStatus::ALL.iter().map(TripStatus::as_str).collect(),
    };
    Ok(template.render()?)
}

/// Organized and joined trips as one list: duplicates dropped by id,
/// earliest start first.
pub fn merge_trips(organized: Vec<Trip>, joined: Vec<Trip>) -> Vec<Trip> {
    let mut trips: Vec<Trip> = Vec::with_capacity(organized.len() + joined.len());
    for trip in organized.into_iter().chain(joined) {
        if !trips.iter().any(|t| t.id == trip.id) {
            trips.push(trip);
        }
    }
    trips.sort_by(|a, b| a.start_date.cmp(&b.start_date).then(a.id.cmp(&b.id)));
    trips
}

fn trip_card(trip: &Trip) -> TripCard {
    TripCard {
        href: RouteKind::TripDetail(Some(trip.id)).href(),
        title: trip.title.clone(),
        destination: trip.destination.clone(),
        dates: format!(
            "{} - {}",
            trip.start_date.format("%d-%m-%Y"),
            trip.end_date.format("%d-%m-%Y")
        ),
        status: trip.status.as_str(),
    }
}
