use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::TravelApi;
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

#[derive(Clone, Debug)]
pub struct RestClient {
    base_url: Url,
    http: reqwest::Client,
}

impl RestClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let base_url = Url::parse(base_url)
            .map_err(|err| AppError::Config(format!("invalid API base url {base_url}: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "API base url cannot carry paths: {base_url}"
            )));
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        url
    }

    fn request(&self, session: &Session, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "api request");
        session.authorize(self.http.request(method, url))
    }

    async fn send(&self, request: RequestBuilder, context: &str) -> Result<String, AppError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AppError::api(status, context, &body));
        }
        Ok(body)
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        context: &str,
    ) -> Result<T, AppError> {
        let body = self.send(request, context).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        session: &Session,
        url: Url,
        context: &str,
    ) -> Result<T, AppError> {
        self.fetch_json(self.request(session, Method::GET, url), context)
            .await
    }
}

#[async_trait]
impl TravelApi for RestClient {
    async fn trip(&self, session: &Session, id: i64) -> Result<Trip, AppError> {
        let url = self.endpoint(&["trips", &id.to_string()]);
        self.get_json(session, url, &format!("Trip not found (id={id})"))
            .await
    }

    async fn create_trip(&self, session: &Session, draft: &TripDraft) -> Result<Trip, AppError> {
        let request = self
            .request(session, Method::POST, self.endpoint(&["trips"]))
            .json(draft);
        self.fetch_json(request, "Failed to create trip").await
    }

    async fn update_trip(
        &self,
        session: &Session,
        id: i64,
        draft: &TripDraft,
    ) -> Result<Trip, AppError> {
        let url = self.endpoint(&["trips", &id.to_string()]);
        let request = self.request(session, Method::PUT, url).json(draft);
        self.fetch_json(request, "Failed to update trip").await
    }

    async fn delete_trip(&self, session: &Session, id: i64) -> Result<(), AppError> {
        let url = self.endpoint(&["trips", &id.to_string()]);
        self.send(
            self.request(session, Method::DELETE, url),
            &format!("Failed to delete trip (id={id})"),
        )
        .await
        .map(drop)
    }

    async fn trips_by_organizer(
        &self,
        session: &Session,
        user_id: i64,
    ) -> Result<Vec<Trip>, AppError> {
        let url = self.endpoint(&["trips", "organizer", &user_id.to_string()]);
        self.get_json(session, url, "Failed to fetch trips by organizer")
            .await
    }

    async fn trips_by_participant(
        &self,
        session: &Session,
        user_id: i64,
    ) -> Result<Vec<Trip>, AppError> {
        let url = self.endpoint(&["trips", "participant", &user_id.to_string()]);
        self.get_json(session, url, "Failed to fetch trips by participant")
            .await
    }

    async fn add_participant(
        &self,
        session: &Session,
        trip_id: i64,
        user_id: i64,
    ) -> Result<(), AppError> {
        let url = self.endpoint(&[
            "trips",
            &trip_id.to_string(),
            "participants",
            &user_id.to_string(),
        ]);
        self.send(
            self.request(session, Method::POST, url),
            &format!("Failed to add participant {user_id} to trip {trip_id}"),
        )
        .await
        .map(drop)
    }

    async fn remove_participant(
        &self,
        session: &Session,
        trip_id: i64,
        user_id: i64,
    ) -> Result<(), AppError> {
        let url = self.endpoint(&[
            "trips",
            &trip_id.to_string(),
            "participants",
            &user_id.to_string(),
        ]);
        self.send(
            self.request(session, Method::DELETE, url),
            &format!("Failed to remove participant {user_id} from trip {trip_id}"),
        )
        .await
        .map(drop)
    }

    async fn locations(&self, session: &Session, trip_id: i64) -> Result<Vec<Location>, AppError> {
        let url = self.endpoint(&["locations", "trips", &trip_id.to_string()]);
        self.get_json(
            session,
            url,
            &format!("Failed to fetch locations for trip {trip_id}"),
        )
        .await
    }

    async fn create_location(
        &self,
        session: &Session,
        trip_id: i64,
        draft: &LocationDraft,
    ) -> Result<Location, AppError> {
        let url = self.endpoint(&["locations", "trips", &trip_id.to_string()]);
        let request = self.request(session, Method::POST, url).json(draft);
        self.fetch_json(request, "Failed to create location").await
    }

    async fn update_location(
        &self,
        session: &Session,
        id: i64,
        draft: &LocationDraft,
    ) -> Result<Location, AppError> {
        let url = self.endpoint(&["locations", &id.to_string()]);
        let request = self.request(session, Method::PUT, url).json(draft);
        self.fetch_json(request, "Failed to update location").await
    }

    async fn delete_location(&self, session: &Session, id: i64) -> Result<(), AppError> {
        let url = self.endpoint(&["locations", &id.to_string()]);
        self.send(
            self.request(session, Method::DELETE, url),
            &format!("Failed to delete location (id={id})"),
        )
        .await
        .map(drop)
    }

    async fn search_places(&self, session: &Session, query: &str) -> Result<Vec<Place>, AppError> {
        let mut url = self.endpoint(&["locations", "search"]);
        url.query_pairs_mut().append_pair("query", query);
        self.get_json(
            session,
            url,
            &format!("Failed to search location for \"{query}\""),
        )
        .await
    }

    async fn points_of_interest(
        &self,
        session: &Session,
        latitude: f64,
        longitude: f64,
        radius: u32,
        types: &[String],
    ) -> Result<Vec<PointOfInterest>, AppError> {
        let mut url = self.endpoint(&["locations", "poi"]);
        url.query_pairs_mut()
            .append_pair("latitude", &latitude.to_string())
            .append_pair("longitude", &longitude.to_string())
            .append_pair("radius", &radius.to_string())
            .append_pair("types", &types.join(","));
        self.get_json(session, url, "Failed to fetch POIs").await
    }

    async fn user(&self, session: &Session, username: &str) -> Result<User, AppError> {
        let url = self.endpoint(&["users", username]);
        self.get_json(session, url, &format!("User not found ({username})"))
            .await
    }

    async fn buddies(&self, session: &Session, username: &str) -> Result<Vec<Buddy>, AppError> {
        let url = self.endpoint(&["users", username, "buddies"]);
        self.get_json(
            session,
            url,
            &format!("Failed to fetch buddies for user {username}"),
        )
        .await
    }

    async fn pending_buddy_requests(
        &self,
        session: &Session,
        username: &str,
    ) -> Result<Vec<Buddy>, AppError> {
        let url = self.endpoint(&["users", username, "buddy-requests", "pending"]);
        self.get_json(session, url, "Failed to fetch pending buddy requests")
            .await
    }

    async fn sent_buddy_requests(
        &self,
        session: &Session,
        username: &str,
    ) -> Result<Vec<Buddy>, AppError> {
        let url = self.endpoint(&["users", username, "buddy-requests", "sent"]);
        self.get_json(session, url, "Failed to fetch sent buddy requests")
            .await
    }

    async fn send_buddy_request(
        &self,
        session: &Session,
        username: &str,
        buddy_username: &str,
    ) -> Result<(), AppError> {
        let url = self.endpoint(&["users", username, "buddy-request", buddy_username]);
        self.send(
            self.request(session, Method::POST, url),
            "Failed to send buddy request",
        )
        .await
        .map(drop)
    }

    async fn accept_buddy_request(
        &self,
        session: &Session,
        username: &str,
        buddy_id: i64,
    ) -> Result<(), AppError> {
        let url = self.endpoint(&[
            "users",
            username,
            "buddy-request",
            &buddy_id.to_string(),
            "accept",
        ]);
        self.send(
            self.request(session, Method::POST, url),
            "Failed to accept buddy request",
        )
        .await
        .map(drop)
    }

    async fn reject_buddy_request(
        &self,
        session: &Session,
        username: &str,
        buddy_id: i64,
    ) -> Result<(), AppError> {
        let url = self.endpoint(&[
            "users",
            username,
            "buddy-request",
            &buddy_id.to_string(),
            "reject",
        ]);
        self.send(
            self.request(session, Method::POST, url),
            "Failed to reject buddy request",
        )
        .await
        .map(drop)
    }

    async fn remove_buddy(
        &self,
        session: &Session,
        username: &str,
        buddy_id: i64,
    ) -> Result<(), AppError> {
        let url = self.endpoint(&["users", username, "buddies", &buddy_id.to_string()]);
        self.send(
            self.request(session, Method::DELETE, url),
            "Failed to remove buddy",
        )
        .await
        .map(drop)
    }

    async fn forecast(
        &self,
        session: &Session,
        latitude: f64,
        longitude: f64,
    ) -> Result<Forecast, AppError> {
        let mut url = self.endpoint(&["weather", "forecast"]);
        url.query_pairs_mut()
            .append_pair("latitude", &latitude.to_string())
            .append_pair("longitude", &longitude.to_string());
        self.get_json(
            session,
            url,
            &format!("Failed to fetch weather for ({latitude}, {longitude})"),
        )
        .await
    }

    async fn login(&self, credentials: &Credentials) -> Result<String, AppError> {
        let url = self.endpoint(&["users", "login"]);
        let request = self
            .http
            .post(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(credentials);
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AppError::api(status, "Login failed", &body));
        }
        let token = body.trim();
        if token.is_empty() {
            return Err(AppError::api(status, "Login failed", "No token received"));
        }
        Ok(token.to_string())
    }

    async fn register(&self, registration: &Registration) -> Result<(), AppError> {
        let url = self.endpoint(&["users", "register"]);
        self.send(self.http.post(url).json(registration), "Registration failed")
            .await
            .map(drop)
    }
}
