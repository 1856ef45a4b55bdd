//! View loaders: one per route kind, each fetching what it needs from the
//! API and rendering the HTML that replaces the shell's mount point.

pub mod buddies;
pub mod home;
pub mod profile;
pub mod trip_detail;
pub mod trips;

use askama::Template;
use chrono::NaiveDateTime;

use crate::{
    api::TravelApi, error::AppError, router::RouteKind, services::profiles::ProfileStore,
    session::Session,
};

/// Everything a loader may touch, passed in explicitly per navigation.
pub struct ViewContext<'a> {
    pub api: &'a dyn TravelApi,
    pub session: &'a Session,
    pub profiles: &'a ProfileStore,
    pub page_size: usize,
    pub now: NaiveDateTime,
}

pub async fn render(kind: &RouteKind, ctx: &ViewContext<'_>) -> Result<String, AppError> {
    match kind {
        RouteKind::Home(query) => home::load(ctx, query).await,
        RouteKind::Trips { page } => trips::load(ctx, *page).await,
        RouteKind::TripDetail(id) => trip_detail::load(ctx, *id).await,
        RouteKind::Buddies => buddies::load(ctx).await,
        RouteKind::Profile => profile::load(ctx).await,
    }
}

/// CSS class put on the mount point for a view.
pub fn view_class(kind: &RouteKind) -> &'static str {
    match kind {
        RouteKind::Home(_) => "home-view",
        RouteKind::Trips { .. } => "trip-view",
        RouteKind::TripDetail(_) => "trip-detail-view",
        RouteKind::Buddies => "buddies-view",
        RouteKind::Profile => "profile-view",
    }
}

#[derive(Template)]
#[template(path = "views/notice.html")]
struct NoticeTemplate<'a> {
    level: &'a str,
    message: &'a str,
}

pub fn notice(level: &str, message: &str) -> Result<String, AppError> {
    Ok(NoticeTemplate { level, message }.render()?)
}

pub fn warning(message: &str) -> Result<String, AppError> {
    notice("warning", message)
}
