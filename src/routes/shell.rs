use askama::Template;
use askama_axum::IntoResponse as AskamaTemplateResponse;
use axum::{
    extract::{Query, RawQuery, State},
    http::HeaderValue,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use axum_extra::extract::cookie::PrivateCookieJar;
use chrono::Local;
use serde::Deserialize;
use tracing::{debug, warn};
use url::form_urlencoded;

use super::{shell_url, NAV_GENERATION_HEADER};
use crate::{
    auth,
    error::AppError,
    router::{nav_links, split_types, HomeQuery, NavLink, RouteKind},
    state::AppState,
    views::{self, ViewContext},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(shell))
        .route("/view", get(view))
        .route("/search", get(search))
}

#[derive(Template)]
#[template(path = "shell.html")]
struct ShellTemplate;

async fn shell() -> impl IntoResponse {
    AskamaTemplateResponse::into_response(ShellTemplate)
}

#[derive(Template)]
#[template(path = "layout.html")]
struct LayoutTemplate {
    nav: Vec<NavLink>,
    logged_in: bool,
    display_name: String,
    role: Option<String>,
    has_flash: bool,
    flash: String,
    view_class: &'static str,
    body: String,
}

#[derive(Template)]
#[template(path = "views/error.html")]
struct ErrorTemplate {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ViewParams {
    #[serde(default)]
    hash: String,
    #[serde(default)]
    gen: Option<u64>,
}

/// Renders the view for a location hash. Loader failures become an inline
/// message so one bad fetch never breaks navigation.
async fn view(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Query(params): Query<ViewParams>,
) -> Result<Response, AppError> {
    let session = auth::load_session(&jar);
    let (jar, flash) = auth::take_flash(jar);
    let kind = RouteKind::parse(&params.hash);
    debug!(hash = %params.hash, gen = ?params.gen, "rendering view");

    let ctx = ViewContext {
        api: state.api.as_ref(),
        session: &session,
        profiles: &state.profiles,
        page_size: state.config.trips_page_size,
        now: Local::now().naive_local(),
    };
    let body = match views::render(&kind, &ctx).await {
        Ok(body) => body,
        Err(err) => {
            warn!(hash = %params.hash, "view failed: {err}");
            ErrorTemplate {
                message: format!("Error: {err}"),
            }
            .render()?
        }
    };

    let (display_name, role) = match session.current_user() {
        Some(user) => (user.subject, user.role),
        None => (String::new(), None),
    };
    let layout = LayoutTemplate {
        nav: nav_links(&params.hash),
        logged_in: session.is_logged_in(),
        display_name,
        role,
        has_flash: flash.is_some(),
        flash: flash.unwrap_or_default(),
        view_class: views::view_class(&kind),
        body,
    };

    let mut response = (jar, AskamaTemplateResponse::into_response(layout)).into_response();
    if let Some(gen) = params.gen {
        response
            .headers_mut()
            .insert(NAV_GENERATION_HEADER, HeaderValue::from(gen));
    }
    Ok(response)
}

/// City search form target: checks the query and hands it to the home view.
async fn search(jar: PrivateCookieJar, RawQuery(raw): RawQuery) -> (PrivateCookieJar, Redirect) {
    let query = parse_search(raw.as_deref().unwrap_or_default());
    if query.query.is_none() {
        let target = shell_url(&RouteKind::Home(query));
        return (
            auth::set_flash(jar, "Please enter a city name."),
            Redirect::to(&target),
        );
    }
    (jar, Redirect::to(&shell_url(&RouteKind::Home(query))))
}

/// Checkbox groups arrive as repeated `types` pairs, hand-written links as
/// one comma list; both end up in the same de-duplicated list.
fn parse_search(raw: &str) -> HomeQuery {
    let mut query = HomeQuery::default();
    let mut types = Vec::new();
    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
        match key.as_ref() {
            "query" => {
                let value = value.trim();
                query.query = (!value.is_empty()).then(|| value.to_string());
            }
            "types" => types.push(value.into_owned()),
            "radius" => {
                if let Some(radius) = value.trim().parse::<u32>().ok().filter(|r| *r > 0) {
                    query.radius = radius;
                }
            }
            _ => {}
        }
    }
    query.types = split_types(&types.join(","));
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_collects_repeated_types() {
        let query = parse_search("query=+Vienna+&types=cafe&types=Museum,cafe&radius=2000");
        assert_eq!(query.query.as_deref(), Some("Vienna"));
        assert_eq!(query.types, vec!["cafe".to_string(), "museum".to_string()]);
        assert_eq!(query.radius, 2000);
    }

    #[test]
    fn blank_search_has_no_query() {
        let query = parse_search("query=%20%20&radius=abc");
        assert_eq!(query.query, None);
        assert_eq!(query.radius, crate::router::DEFAULT_POI_RADIUS);
    }
}
