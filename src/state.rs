use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};

use crate::{api::TravelApi, config::AppConfig, services::profiles::ProfileStore};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub api: Arc<dyn TravelApi>,
    pub profiles: ProfileStore,
    pub cookie_key: Key,
}

impl AppState {
    pub fn new(config: AppConfig, api: Arc<dyn TravelApi>, profiles: ProfileStore) -> Self {
        let digest = Sha512::digest(config.cookie_secret.as_bytes());
        let cookie_key = Key::from(&digest[..]);
        Self {
            config,
            api,
            profiles,
            cookie_key,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}
