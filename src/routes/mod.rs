pub mod actions;
pub mod shell;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{router::RouteKind, state::AppState};

/// Response header carrying the navigation generation back to the shell.
pub const NAV_GENERATION_HEADER: &str = "x-nav-generation";

const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(shell::router())
        .nest("/actions", actions::router())
        .nest_service("/static", ServeDir::new("static"))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Shell URL that opens the given view.
pub(crate) fn shell_url(kind: &RouteKind) -> String {
    format!("/{}", kind.href())
}
