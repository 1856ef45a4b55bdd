//! Bearer-token session and the identity derived from it.
//!
//! The token is opaque to the front: it is stored, handed back, and attached to
//! outgoing API calls. The identity is decoded from the token's payload segment
//! for display and access decisions only; the signature is never checked here,
//! the REST boundary stays the authority for every mutating call.

use base64::{
    engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD},
    Engine,
};
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub id: i64,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    id: i64,
    #[serde(default)]
    role: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let mut session = Self::new();
        session.set_token(token);
        session
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn remove_token(&mut self) {
        self.token = None;
    }

    /// True whenever a token is stored, well-formed or not.
    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn current_user(&self) -> Option<Identity> {
        let token = self.token.as_deref()?;
        match decode_identity(token) {
            Ok(identity) => Some(identity),
            Err(reason) => {
                warn!(%reason, "could not decode session token");
                None
            }
        }
    }

    /// Attaches the bearer token to an outgoing request, if there is one.
    pub fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

fn decode_identity(token: &str) -> Result<Identity, String> {
    let mut segments = token.split('.');
    let _header = segments.next();
    let payload = segments
        .next()
        .ok_or_else(|| "token has no payload segment".to_string())?;
    if segments.next().is_none() {
        return Err("token has no signature segment".into());
    }

    let trimmed = payload.trim_end_matches('=');
    let raw = URL_SAFE_NO_PAD
        .decode(trimmed)
        .or_else(|_| STANDARD_NO_PAD.decode(trimmed))
        .map_err(|err| format!("payload is not base64: {err}"))?;
    let claims: Claims =
        serde_json::from_slice(&raw).map_err(|err| format!("payload is not valid claims: {err}"))?;

    Ok(Identity {
        subject: claims.sub,
        id: claims.id,
        role: claims.role,
    })
}

#[cfg(test)]
pub(crate) fn encode_test_token(payload: &serde_json::Value) -> String {
    format!(
        "eyJhbGciOiJIUzI1NiJ9.{}.c2lnbmF0dXJl",
        URL_SAFE_NO_PAD.encode(payload.to_string())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn token_round_trip() {
        let mut session = Session::new();
        session.set_token("abc");
        assert_eq!(session.token(), Some("abc"));
        session.remove_token();
        assert_eq!(session.token(), None);
        session.remove_token();
        assert!(!session.is_logged_in());
    }

    #[test]
    fn decodes_subject_and_id_without_verifying_signature() {
        let token = encode_test_token(&json!({ "sub": "alice", "id": 7, "role": "USER" }));
        let identity = Session::with_token(token).current_user().unwrap();
        assert_eq!(identity.subject, "alice");
        assert_eq!(identity.id, 7);
        assert_eq!(identity.role.as_deref(), Some("USER"));
    }

    #[test]
    fn accepts_standard_alphabet_with_padding() {
        let payload = base64::engine::general_purpose::STANDARD
            .encode(json!({ "sub": "bo", "id": 1 }).to_string());
        let token = format!("h.{payload}.s");
        assert_eq!(Session::with_token(token).current_user().unwrap().subject, "bo");
    }

    #[test]
    fn malformed_tokens_yield_no_identity() {
        assert_eq!(Session::new().current_user(), None);
        for token in ["garbage", "a.b", "a.%%%.c", "a.bm90IGpzb24.c"] {
            let session = Session::with_token(token);
            assert!(session.is_logged_in());
            assert_eq!(session.current_user(), None, "token {token}");
        }
        let missing_id = encode_test_token(&json!({ "sub": "alice" }));
        assert_eq!(Session::with_token(missing_id).current_user(), None);
    }
}
