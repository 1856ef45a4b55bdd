//! Form targets for everything that changes state. Each action calls the
//! REST boundary and redirects back into the shell; failures are carried
//! to the next view as a flash message.

use axum::{
    extract::{Multipart, Path, Query, State},
    response::Redirect,
    routing::post,
    Form, Router,
};
use axum_extra::extract::cookie::PrivateCookieJar;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use tracing::{info, warn};

use super::shell_url;
use crate::{
    auth::{self, CurrentSession},
    error::AppError,
    models::{
        location::LocationForm,
        trip::TripForm,
        user::{Credentials, Registration},
    },
    router::{HomeQuery, RouteKind},
    session::Session,
    state::AppState,
};

type ActionResponse = (PrivateCookieJar, Redirect);

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/logout", post(logout))
        .route("/trips", post(create_trip))
        .route("/trips/:id", post(update_trip))
        .route("/trips/:id/delete", post(delete_trip))
        .route("/trips/:id/participants", post(add_participant))
        .route("/trips/:id/participants/remove", post(remove_participant))
        .route("/trips/:id/locations", post(create_location))
        .route("/locations/:id", post(update_location))
        .route("/locations/:id/delete", post(delete_location))
        .route("/buddies/requests", post(send_buddy_request))
        .route("/buddies/:id/accept", post(accept_buddy_request))
        .route("/buddies/:id/reject", post(reject_buddy_request))
        .route("/buddies/:id/remove", post(remove_buddy))
        .route("/profile/description", post(save_description))
        .route("/profile/picture", post(upload_picture))
}

fn home() -> RouteKind {
    RouteKind::Home(HomeQuery::default())
}

fn finish(
    jar: PrivateCookieJar,
    outcome: Result<RouteKind, AppError>,
    fallback: RouteKind,
) -> ActionResponse {
    match outcome {
        Ok(kind) => (jar, Redirect::to(&shell_url(&kind))),
        Err(err) => {
            warn!("action failed: {err}");
            (
                auth::set_flash(jar, flash_message(&err)),
                Redirect::to(&shell_url(&fallback)),
            )
        }
    }
}

fn flash_message(err: &AppError) -> String {
    match err {
        AppError::Unauthorized => "Please log in first.".to_string(),
        other => other.to_string(),
    }
}

/// API errors already name the failed operation.
fn failure_message(operation: &str, err: &AppError) -> String {
    match err {
        AppError::Api { message, .. } => message.clone(),
        other => format!("{operation}: {}", flash_message(other)),
    }
}

async fn sign_in(state: &AppState, credentials: &Credentials) -> Result<Session, AppError> {
    if credentials.username.trim().is_empty() || credentials.password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required.".into(),
        ));
    }
    let token = state.api.login(credentials).await?;
    let mut session = Session::new();
    session.set_token(token);
    Ok(session)
}

async fn login(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(credentials): Form<Credentials>,
) -> ActionResponse {
    match sign_in(&state, &credentials).await {
        Ok(session) => {
            info!(username = %credentials.username, "logged in");
            (
                auth::store_session(jar, &session),
                Redirect::to(&shell_url(&home())),
            )
        }
        Err(err) => {
            warn!(username = %credentials.username, "login failed: {err}");
            (
                auth::set_flash(jar, failure_message("Login failed", &err)),
                Redirect::to(&shell_url(&home())),
            )
        }
    }
}

async fn register(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(registration): Form<Registration>,
) -> ActionResponse {
    let outcome = async {
        if registration.username.trim().is_empty()
            || registration.email.trim().is_empty()
            || registration.password.is_empty()
        {
            return Err(AppError::Validation("All fields are required.".into()));
        }
        state.api.register(&registration).await?;
        sign_in(
            &state,
            &Credentials {
                username: registration.username.clone(),
                password: registration.password.clone(),
            },
        )
        .await
    };
    match outcome.await {
        Ok(session) => {
            info!(username = %registration.username, "account created");
            (
                auth::store_session(jar, &session),
                Redirect::to(&shell_url(&home())),
            )
        }
        Err(err) => {
            warn!(username = %registration.username, "registration failed: {err}");
            (
                auth::set_flash(jar, failure_message("Registration failed", &err)),
                Redirect::to(&shell_url(&home())),
            )
        }
    }
}

async fn logout(CurrentSession(mut session): CurrentSession, jar: PrivateCookieJar) -> ActionResponse {
    session.remove_token();
    (
        auth::store_session(jar, &session),
        Redirect::to(&shell_url(&home())),
    )
}

async fn create_trip(
    State(state): State<AppState>,
    current: CurrentSession,
    jar: PrivateCookieJar,
    Form(form): Form<TripForm>,
) -> ActionResponse {
    let outcome = async move {
        let user = current.require_identity()?;
        let draft = form.into_draft(user.id)?;
        let trip = state.api.create_trip(&current.0, &draft).await?;
        info!(trip_id = trip.id, "trip created");
        Ok::<_, AppError>(RouteKind::TripDetail(Some(trip.id)))
    };
    finish(jar, outcome.await, RouteKind::Trips { page: 1 })
}

async fn update_trip(
    State(state): State<AppState>,
    current: CurrentSession,
    jar: PrivateCookieJar,
    Path(id): Path<i64>,
    Form(form): Form<TripForm>,
) -> ActionResponse {
    let outcome = async move {
        let user = current.require_identity()?;
        let draft = form.into_draft(user.id)?;
        state.api.update_trip(&current.0, id, &draft).await?;
        Ok::<_, AppError>(RouteKind::TripDetail(Some(id)))
    };
    finish(jar, outcome.await, RouteKind::TripDetail(Some(id)))
}

async fn delete_trip(
    State(state): State<AppState>,
    current: CurrentSession,
    jar: PrivateCookieJar,
    Path(id): Path<i64>,
) -> ActionResponse {
    let outcome = async move {
        current.require_identity()?;
        state.api.delete_trip(&current.0, id).await?;
        info!(trip_id = id, "trip deleted");
        Ok::<_, AppError>(RouteKind::Trips { page: 1 })
    };
    finish(jar, outcome.await, RouteKind::TripDetail(Some(id)))
}

#[derive(Debug, Deserialize)]
struct UsernameForm {
    #[serde(default)]
    username: String,
}

impl UsernameForm {
    fn username(&self, missing: &str) -> Result<&str, AppError> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(AppError::Validation(missing.to_string()));
        }
        Ok(username)
    }
}

/// Participants are managed by user id, the form only knows the username.
async fn resolve_user_id(
    state: &AppState,
    session: &Session,
    username: &str,
) -> Result<i64, AppError> {
    let unknown = || AppError::Validation(format!("User {username} not found."));
    match state.api.user(session, username).await {
        Ok(user) => user.id.ok_or_else(unknown),
        Err(AppError::NotFound) => Err(unknown()),
        Err(AppError::Api { status, .. }) if status == reqwest::StatusCode::NOT_FOUND => {
            Err(unknown())
        }
        Err(err) => Err(err),
    }
}

async fn add_participant(
    State(state): State<AppState>,
    current: CurrentSession,
    jar: PrivateCookieJar,
    Path(trip_id): Path<i64>,
    Form(form): Form<UsernameForm>,
) -> ActionResponse {
    let outcome = async move {
        current.require_identity()?;
        let username = form.username("Please choose a buddy.")?;
        let user_id = resolve_user_id(&state, &current.0, username).await?;
        state.api.add_participant(&current.0, trip_id, user_id).await?;
        Ok::<_, AppError>(RouteKind::TripDetail(Some(trip_id)))
    };
    finish(jar, outcome.await, RouteKind::TripDetail(Some(trip_id)))
}

async fn remove_participant(
    State(state): State<AppState>,
    current: CurrentSession,
    jar: PrivateCookieJar,
    Path(trip_id): Path<i64>,
    Form(form): Form<UsernameForm>,
) -> ActionResponse {
    let outcome = async move {
        current.require_identity()?;
        let username = form.username("Please choose a participant.")?;
        let user_id = resolve_user_id(&state, &current.0, username).await?;
        state
            .api
            .remove_participant(&current.0, trip_id, user_id)
            .await?;
        Ok::<_, AppError>(RouteKind::TripDetail(Some(trip_id)))
    };
    finish(jar, outcome.await, RouteKind::TripDetail(Some(trip_id)))
}

async fn create_location(
    State(state): State<AppState>,
    current: CurrentSession,
    jar: PrivateCookieJar,
    Path(trip_id): Path<i64>,
    Form(form): Form<LocationForm>,
) -> ActionResponse {
    let outcome = async move {
        current.require_identity()?;
        let draft = form.into_draft(trip_id)?;
        state
            .api
            .create_location(&current.0, trip_id, &draft)
            .await?;
        Ok::<_, AppError>(RouteKind::TripDetail(Some(trip_id)))
    };
    finish(jar, outcome.await, RouteKind::TripDetail(Some(trip_id)))
}

/// Location forms name their trip in the query string so the redirect can
/// return to it.
#[derive(Debug, Deserialize)]
struct TripRef {
    trip_id: i64,
}

async fn update_location(
    State(state): State<AppState>,
    current: CurrentSession,
    jar: PrivateCookieJar,
    Path(id): Path<i64>,
    Query(trip): Query<TripRef>,
    Form(form): Form<LocationForm>,
) -> ActionResponse {
    let trip_id = trip.trip_id;
    let outcome = async move {
        current.require_identity()?;
        let draft = form.into_draft(trip_id)?;
        state.api.update_location(&current.0, id, &draft).await?;
        Ok::<_, AppError>(RouteKind::TripDetail(Some(trip_id)))
    };
    finish(jar, outcome.await, RouteKind::TripDetail(Some(trip_id)))
}

async fn delete_location(
    State(state): State<AppState>,
    current: CurrentSession,
    jar: PrivateCookieJar,
    Path(id): Path<i64>,
    Query(trip): Query<TripRef>,
) -> ActionResponse {
    let trip_id = trip.trip_id;
    let outcome = async move {
        current.require_identity()?;
        state.api.delete_location(&current.0, id).await?;
        Ok::<_, AppError>(RouteKind::TripDetail(Some(trip_id)))
    };
    finish(jar, outcome.await, RouteKind::TripDetail(Some(trip_id)))
}

async fn send_buddy_request(
    State(state): State<AppState>,
    current: CurrentSession,
    jar: PrivateCookieJar,
    Form(form): Form<UsernameForm>,
) -> ActionResponse {
    let outcome = async move {
        let user = current.require_identity()?;
        let buddy = form.username("Please enter a username.")?;
        if buddy.eq_ignore_ascii_case(&user.subject) {
            return Err(AppError::Validation(
                "You cannot send a buddy request to yourself.".into(),
            ));
        }
        state
            .api
            .send_buddy_request(&current.0, &user.subject, buddy)
            .await?;
        Ok::<_, AppError>(RouteKind::Buddies)
    };
    finish(jar, outcome.await, RouteKind::Buddies)
}

async fn accept_buddy_request(
    State(state): State<AppState>,
    current: CurrentSession,
    jar: PrivateCookieJar,
    Path(id): Path<i64>,
) -> ActionResponse {
    let outcome = async move {
        let user = current.require_identity()?;
        state
            .api
            .accept_buddy_request(&current.0, &user.subject, id)
            .await?;
        Ok::<_, AppError>(RouteKind::Buddies)
    };
    finish(jar, outcome.await, RouteKind::Buddies)
}

async fn reject_buddy_request(
    State(state): State<AppState>,
    current: CurrentSession,
    jar: PrivateCookieJar,
    Path(id): Path<i64>,
) -> ActionResponse {
    let outcome = async move {
        let user = current.require_identity()?;
        state
            .api
            .reject_buddy_request(&current.0, &user.subject, id)
            .await?;
        Ok::<_, AppError>(RouteKind::Buddies)
    };
    finish(jar, outcome.await, RouteKind::Buddies)
}

async fn remove_buddy(
    State(state): State<AppState>,
    current: CurrentSession,
    jar: PrivateCookieJar,
    Path(id): Path<i64>,
) -> ActionResponse {
    let outcome = async move {
        let user = current.require_identity()?;
        state.api.remove_buddy(&current.0, &user.subject, id).await?;
        Ok::<_, AppError>(RouteKind::Buddies)
    };
    finish(jar, outcome.await, RouteKind::Buddies)
}

#[derive(Debug, Deserialize)]
struct DescriptionForm {
    #[serde(default)]
    description: String,
}

async fn save_description(
    State(state): State<AppState>,
    current: CurrentSession,
    jar: PrivateCookieJar,
    Form(form): Form<DescriptionForm>,
) -> ActionResponse {
    let outcome = async move {
        let user = current.require_identity()?;
        state
            .profiles
            .set_description(&user.subject, form.description)
            .await?;
        Ok::<_, AppError>(RouteKind::Profile)
    };
    finish(jar, outcome.await, RouteKind::Profile)
}

/// Stores the uploaded image inline as a `data:` URL.
async fn upload_picture(
    State(state): State<AppState>,
    current: CurrentSession,
    jar: PrivateCookieJar,
    mut multipart: Multipart,
) -> ActionResponse {
    let outcome = async move {
        let user = current.require_identity()?;
        let mut data_url = None;
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|err| AppError::Validation(format!("Invalid upload: {err}")))?
        {
            if field.name() != Some("picture") {
                continue;
            }
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            if !content_type.starts_with("image/") {
                return Err(AppError::Validation(
                    "Only image files can be used as a profile picture.".into(),
                ));
            }
            let bytes = field
                .bytes()
                .await
                .map_err(|err| AppError::Validation(format!("Invalid upload: {err}")))?;
            if !bytes.is_empty() {
                data_url = Some(format!(
                    "data:{content_type};base64,{}",
                    STANDARD.encode(&bytes)
                ));
            }
        }
        let data_url =
            data_url.ok_or_else(|| AppError::Validation("Please choose a picture.".into()))?;
        state.profiles.set_picture(&user.subject, data_url).await?;
        info!(user = %user.subject, "profile picture updated");
        Ok::<_, AppError>(RouteKind::Profile)
    };
    finish(jar, outcome.await, RouteKind::Profile)
}
