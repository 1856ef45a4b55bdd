use std::{env, net::SocketAddr, path::PathBuf, time::Duration};

use crate::error::AppError;

pub const DEFAULT_PAGE_SIZE: usize = 5;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub listen_addr: SocketAddr,
    pub storage_root: PathBuf,
    pub cookie_secret: String,
    pub trips_page_size: usize,
    pub api_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let api_base_url =
            env::var("API_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());
        url::Url::parse(&api_base_url)
            .map_err(|err| AppError::Config(format!("invalid API_BASE_URL: {err}")))?;

        let listen_addr: SocketAddr = env::var("APP_LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid APP_LISTEN_ADDR: {err}")))?;

        let storage_root = env::var("STORAGE_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        let cookie_secret = env::var("COOKIE_SECRET")
            .unwrap_or_else(|_| "change-me-travelbuddy-cookie-secret".to_string());

        let trips_page_size = match env::var("TRIPS_PAGE_SIZE") {
            Ok(raw) => match raw.trim().parse::<usize>() {
                Ok(size) if size > 0 => size,
                _ => {
                    return Err(AppError::Config(format!(
                        "invalid TRIPS_PAGE_SIZE: {raw:?} (expected a positive integer)"
                    )))
                }
            },
            Err(_) => DEFAULT_PAGE_SIZE,
        };

        let api_timeout = env::var("API_TIMEOUT_SECS")
            .ok()
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map_err(|err| AppError::Config(format!("invalid API_TIMEOUT_SECS: {err}")))
            })
            .transpose()?
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        Ok(Self {
            api_base_url,
            listen_addr,
            storage_root,
            cookie_secret,
            trips_page_size,
            api_timeout,
        })
    }
}
