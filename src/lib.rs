pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod guard;
pub mod map;
pub mod models;
pub mod pagination;
pub mod router;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
pub mod views;
