//! The TravelBuddy REST boundary.
//!
//! Loaders and actions only talk to the API through [`TravelApi`], so they can
//! run against [`RestClient`] in production and an in-memory double in tests.
//! Every call carries the caller's [`Session`]; nothing is retried.

mod rest;

use async_trait::async_trait;

pub use rest::RestClient;

use crate::{
    error::AppError,
    models::{
        location::{Location, LocationDraft, Place, PointOfInterest},
        trip::{Trip, TripDraft},
        user::{Buddy, Credentials, Registration, User},
        weather::Forecast,
    },
    session::Session,
};

#[async_trait]
pub trait TravelApi: Send + Sync {
    async fn trip(&self, session: &Session, id: i64) -> Result<Trip, AppError>;
    async fn create_trip(&self, session: &Session, draft: &TripDraft) -> Result<Trip, AppError>;
    async fn update_trip(
        &self,
        session: &Session,
        id: i64,
        draft: &TripDraft,
    ) -> Result<Trip, AppError>;
    async fn delete_trip(&self, session: &Session, id: i64) -> Result<(), AppError>;
    async fn trips_by_organizer(
        &self,
        session: &Session,
        user_id: i64,
    ) -> Result<Vec<Trip>, AppError>;
    async fn trips_by_participant(
        &self,
        session: &Session,
        user_id: i64,
    ) -> Result<Vec<Trip>, AppError>;
    async fn add_participant(
        &self,
        session: &Session,
        trip_id: i64,
        user_id: i64,
    ) -> Result<(), AppError>;
    async fn remove_participant(
        &self,
        session: &Session,
        trip_id: i64,
        user_id: i64,
    ) -> Result<(), AppError>;

    async fn locations(&self, session: &Session, trip_id: i64) -> Result<Vec<Location>, AppError>;
    async fn create_location(
        &self,
        session: &Session,
        trip_id: i64,
        draft: &LocationDraft,
    ) -> Result<Location, AppError>;
    async fn update_location(
        &self,
        session: &Session,
        id: i64,
        draft: &LocationDraft,
    ) -> Result<Location, AppError>;
    async fn delete_location(&self, session: &Session, id: i64) -> Result<(), AppError>;
    async fn search_places(&self, session: &Session, query: &str) -> Result<Vec<Place>, AppError>;
    async fn points_of_interest(
        &self,
        session: &Session,
        latitude: f64,
        longitude: f64,
        radius: u32,
        types: &[String],
    ) -> Result<Vec<PointOfInterest>, AppError>;

    async fn user(&self, session: &Session, username: &str) -> Result<User, AppError>;
    async fn buddies(&self, session: &Session, username: &str) -> Result<Vec<Buddy>, AppError>;
    async fn pending_buddy_requests(
        &self,
        session: &Session,
        username: &str,
    ) -> Result<Vec<Buddy>, AppError>;
    async fn sent_buddy_requests(
        &self,
        session: &Session,
        username: &str,
    ) -> Result<Vec<Buddy>, AppError>;
    async fn send_buddy_request(
        &self,
        session: &Session,
        username: &str,
        buddy_username: &str,
    ) -> Result<(), AppError>;
    async fn accept_buddy_request(
        &self,
        session: &Session,
        username: &str,
        buddy_id: i64,
    ) -> Result<(), AppError>;
    async fn reject_buddy_request(
        &self,
        session: &Session,
        username: &str,
        buddy_id: i64,
    ) -> Result<(), AppError>;
    /// Drops an accepted buddy or withdraws a sent request.
    async fn remove_buddy(
        &self,
        session: &Session,
        username: &str,
        buddy_id: i64,
    ) -> Result<(), AppError>;

    async fn forecast(
        &self,
        session: &Session,
        latitude: f64,
        longitude: f64,
    ) -> Result<Forecast, AppError>;

    /// Returns the bearer token issued for the credentials.
    async fn login(&self, credentials: &Credentials) -> Result<String, AppError>;
    async fn register(&self, registration: &Registration) -> Result<(), AppError>;
}
