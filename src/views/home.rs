use askama::Template;
use chrono::NaiveDateTime;
use tracing::warn;

use super::ViewContext;
use crate::{
    error::AppError,
    map::{MapView, POI_CATEGORIES, POI_RADII},
    models::{
        location::{Place, PointOfInterest},
        weather::{self, Forecast},
    },
    router::HomeQuery,
};

#[derive(Template)]
#[template(path = "views/home.html")]
struct HomeTemplate {
    query: String,
    categories: Vec<CategoryOption>,
    radii: Vec<RadiusOption>,
    map_json: String,
    show_notice: bool,
    notice: String,
    show_weather: bool,
    weather: WeatherPanel,
    show_weather_error: bool,
    weather_error: String,
}

struct CategoryOption {
    name: &'static str,
    types: Vec<TypeOption>,
}

struct TypeOption {
    key: &'static str,
    checked: bool,
}

struct RadiusOption {
    value: u32,
    selected: bool,
}

#[derive(Default)]
struct WeatherPanel {
    has_current: bool,
    current: CurrentView,
    has_hourly: bool,
    hourly: HourView,
    has_daily: bool,
    daily: DayView,
}

#[derive(Default)]
struct CurrentView {
    time: String,
    css: &'static str,
    temperature: String,
    apparent: String,
    humidity: String,
    precipitation: String,
}

#[derive(Default)]
struct HourView {
    time: String,
    css: &'static str,
    temperature: String,
    apparent: String,
    humidity: String,
    wind: String,
    rain_probability: String,
    nav: StepLinks,
}

#[derive(Default)]
struct DayView {
    date: String,
    css: &'static str,
    min: String,
    max: String,
    rain: String,
    snow: String,
    rain_probability: String,
    nav: StepLinks,
}

#[derive(Default)]
struct StepLinks {
    has_prev: bool,
    prev_href: String,
    has_next: bool,
    next_href: String,
}

pub async fn load(ctx: &ViewContext<'_>, query: &HomeQuery) -> Result<String, AppError> {
    let mut map = MapView::world();
    let mut notice = None;
    let mut weather = None;
    let mut weather_error = None;

    if let Some(search) = &query.query {
        match ctx.api.search_places(ctx.session, search).await {
            Ok(places) => match places.first() {
                Some(place) => {
                    map.focus_place(place);
                    let (pois, forecast) = tokio::join!(
                        load_pois(ctx, place, query),
                        ctx.api.forecast(ctx.session, place.latitude, place.longitude)
                    );
                    for poi in &pois {
                        map.add_poi(poi);
                    }
                    match forecast {
                        Ok(forecast) => weather = Some(weather_panel(&forecast, query, ctx.now)),
                        Err(err) => weather_error = Some(err.to_string()),
                    }
                }
                None => notice = Some(format!("No results for \"{search}\".")),
            },
            Err(err) => notice = Some(format!("Error: {err}")),
        }
    }

    let template = HomeTemplate {
        query: query.query.clone().unwrap_or_default(),
        categories: category_options(&query.types),
        radii: POI_RADII
            .iter()
            .map(|value| RadiusOption {
                value: *value,
                selected: *value == query.radius,
            })
            .collect(),
        map_json: map.to_json()?,
        show_notice: notice.is_some(),
        notice: notice.unwrap_or_default(),
        show_weather: weather.is_some(),
        weather: weather.unwrap_or_default(),
        show_weather_error: weather_error.is_some(),
        weather_error: weather_error.unwrap_or_default(),
    };
    Ok(template.render()?)
}

/// POIs of the selected types around a place. Failures only cost the
/// markers, so they are logged and dropped.
async fn load_pois(
    ctx: &ViewContext<'_>,
    place: &Place,
    query: &HomeQuery,
) -> Vec<PointOfInterest> {
    if query.types.is_empty() {
        return Vec::new();
    }
    match ctx
        .api
        .points_of_interest(
            ctx.session,
            place.latitude,
            place.longitude,
            query.radius,
            &query.types,
        )
        .await
    {
        Ok(pois) => pois
            .into_iter()
            .filter(|poi| query.types.contains(&poi.type_key()))
            .collect(),
        Err(err) => {
            warn!("failed to load POIs: {err}");
            Vec::new()
        }
    }
}

fn category_options(selected: &[String]) -> Vec<CategoryOption> {
    POI_CATEGORIES
        .iter()
        .map(|(name, types)| CategoryOption {
            name: *name,
            types: types
                .iter()
                .map(|key| TypeOption {
                    key: *key,
                    checked: selected.iter().any(|s| s == key),
                })
                .collect(),
        })
        .collect()
}

fn weather_panel(forecast: &Forecast, query: &HomeQuery, now: NaiveDateTime) -> WeatherPanel {
    let mut panel = WeatherPanel::default();

    if let Some(cur) = &forecast.current_weather {
        panel.has_current = true;
        panel.current = CurrentView {
            time: weather::format_date_time(&cur.time),
            css: weather::css_class_for_code(cur.weather_code),
            temperature: format!("{:.1}", cur.temperature),
            apparent: format!("{:.1}", cur.apparent_temperature),
            humidity: cur.humidity.to_string(),
            precipitation: cur.precipitation.to_string(),
        };
    }

    let hourly = &forecast.hourly_weather_data;
    if !hourly.is_empty() {
        let index = query
            .hour
            .unwrap_or_else(|| weather::initial_hourly_index(hourly, now))
            .min(hourly.len() - 1);
        let hour = &hourly[index];
        panel.has_hourly = true;
        panel.hourly = HourView {
            time: weather::format_date_time(&hour.time),
            css: weather::css_class_for_code(hour.weather_code),
            temperature: format!("{:.1}", hour.temperature),
            apparent: format!("{:.1}", hour.temp_apparent),
            humidity: hour.humidity.to_string(),
            wind: format!("{:.1}", hour.wind_speed),
            rain_probability: hour.precipitation_probability.to_string(),
            nav: step_links(index, hourly.len(), |i| HomeQuery {
                hour: Some(i),
                ..query.clone()
            }),
        };
    }

    let daily = &forecast.daily_weather_data;
    if !daily.is_empty() {
        let index = query.day.unwrap_or(0).min(daily.len() - 1);
        let day = &daily[index];
        panel.has_daily = true;
        panel.daily = DayView {
            date: weather::format_date(&day.time),
            css: weather::css_class_for_code(day.weather_code),
            min: format!("{:.1}", day.temp_min),
            max: format!("{:.1}", day.temp_max),
            rain: day.rain_sum.to_string(),
            snow: day.snowfall_sum.to_string(),
            rain_probability: day.precipitation_probability.to_string(),
            nav: step_links(index, daily.len(), |i| HomeQuery {
                day: Some(i),
                ..query.clone()
            }),
        };
    }

    panel
}

fn step_links(index: usize, len: usize, at: impl Fn(usize) -> HomeQuery) -> StepLinks {
    let has_prev = index > 0;
    let has_next = index + 1 < len;
    StepLinks {
        has_prev,
        prev_href: if has_prev { at(index - 1).href() } else { String::new() },
        has_next,
        next_href: if has_next { at(index + 1).href() } else { String::new() },
    }
}
