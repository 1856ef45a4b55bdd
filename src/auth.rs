//! Cookie persistence for the session token and one-shot flash messages.
//!
//! Both cookies are private (encrypted and authenticated with the state's
//! key), so the browser stores them but cannot read or forge them.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};

use crate::{
    error::AppError,
    session::{Identity, Session},
    state::AppState,
};

pub const TOKEN_COOKIE: &str = "travelbuddy_token";
pub const FLASH_COOKIE: &str = "travelbuddy_flash";

pub fn load_session(jar: &PrivateCookieJar) -> Session {
    match jar.get(TOKEN_COOKIE) {
        Some(cookie) if !cookie.value().is_empty() => Session::with_token(cookie.value()),
        _ => Session::new(),
    }
}

/// Writes the session back; last write wins.
pub fn store_session(jar: PrivateCookieJar, session: &Session) -> PrivateCookieJar {
    match session.token() {
        Some(token) => jar.add(base_cookie(TOKEN_COOKIE, token.to_string())),
        None => jar.remove(Cookie::build(TOKEN_COOKIE).path("/")),
    }
}

pub fn set_flash(jar: PrivateCookieJar, message: impl Into<String>) -> PrivateCookieJar {
    jar.add(base_cookie(FLASH_COOKIE, message.into()))
}

pub fn take_flash(jar: PrivateCookieJar) -> (PrivateCookieJar, Option<String>) {
    let message = jar.get(FLASH_COOKIE).map(|cookie| cookie.value().to_string());
    match message {
        Some(message) => (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), Some(message)),
        None => (jar, None),
    }
}

fn base_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// The caller's session, read from the token cookie.
#[derive(Debug, Clone, Default)]
pub struct CurrentSession(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::from_headers(&parts.headers, state.cookie_key.clone());
        Ok(Self(load_session(&jar)))
    }
}

impl CurrentSession {
    pub fn require_identity(&self) -> Result<Identity, AppError> {
        self.0.current_user().ok_or(AppError::Unauthorized)
    }
}
