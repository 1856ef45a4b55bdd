use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub current_weather: Option<CurrentWeather>,
    #[serde(default)]
    pub hourly_weather_data: Vec<HourlyWeather>,
    #[serde(default)]
    pub daily_weather_data: Vec<DailyWeather>,
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeather {
    pub time: String,
    #[serde(rename = "weather_code")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub weather_code: u16,
    pub temperature: f64,
    pub apparent_temperature: f64,
    pub humidity: f64,
    pub precipitation: f64,
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyWeather {
    pub time: String,
    pub temperature: f64,
    pub temp_apparent: f64,
    pub humidity: f64,
    #[serde(rename = "cloud_cover", default)]
    pub cloud_cover: f64,
    #[serde(rename = "weather_code")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub weather_code: u16,
    pub wind_speed: f64,
    #[serde(rename = "precipitation_probability")]
    pub precipitation_probability: f64,
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyWeather {
    pub time: String,
    #[serde(rename = "weather_code")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub weather_code: u16,
    pub temp_min: f64,
    pub temp_max: f64,
    #[serde(rename = "rain_sum")]
    pub rain_sum: f64,
    #[serde(rename = "snowfall_sum")]
    pub snowfall_sum: f64,
    #[serde(rename = "precipitation_probability")]
    pub precipitation_probability: f64,
}

/// CSS icon class for a WMO weather code.
pub fn css_class_for_code(code: u16) -> &'static str {
    match code {
        0 => "clear",
        1 => "mostlycloudy",
        2 => "partlycloudy",
        3 => "cloudy",
        45 | 48 => "fog",
        51 | 80 => "chancerain",
        53 | 55 | 61 | 63 | 65 | 81 | 82 => "rain",
        95 | 96 | 99 => "tstorms",
        _ => "unknown",
    }
}

pub fn parse_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

pub fn format_date_time(raw: &str) -> String {
    parse_time(raw)
        .map(|ts| ts.format("%d.%m.%Y %H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}

pub fn format_date(raw: &str) -> String {
    parse_time(raw)
        .map(|ts| ts.format("%d.%m.%Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Index of the first hour that is not in the past, or the last hour when
/// the whole series lies behind `now`.
pub fn initial_hourly_index(hourly: &[HourlyWeather], now: NaiveDateTime) -> usize {
    if hourly.is_empty() {
        return 0;
    }
    hourly
        .iter()
        .position(|hour| parse_time(&hour.time).is_some_and(|ts| ts >= now))
        .unwrap_or(hourly.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hour(time: &str) -> HourlyWeather {
        HourlyWeather {
            time: time.into(),
            temperature: 20.0,
            temp_apparent: 19.0,
            humidity: 50.0,
            cloud_cover: 10.0,
            weather_code: 1,
            wind_speed: 3.0,
            precipitation_probability: 0.0,
        }
    }

    #[test]
    fn weather_code_accepts_numbers_and_strings() {
        let cur: CurrentWeather = serde_json::from_str(
            r#"{"time":"2025-06-01T12:00","weather_code":"61","temperature":1,
                "apparentTemperature":0.5,"humidity":80,"precipitation":2}"#,
        )
        .unwrap();
        assert_eq!(cur.weather_code, 61);
        assert_eq!(css_class_for_code(cur.weather_code), "rain");
        let daily: DailyWeather = serde_json::from_str(
            r#"{"time":"2025-06-01","weather_code":95,"tempMin":1,"tempMax":9,
                "rain_sum":0,"snowfall_sum":0,"precipitation_probability":40}"#,
        )
        .unwrap();
        assert_eq!(css_class_for_code(daily.weather_code), "tstorms");
        assert_eq!(css_class_for_code(7), "unknown");
    }

    #[test]
    fn picks_first_future_hour() {
        let now = parse_time("2025-06-01T13:30").unwrap();
        let hours = vec![
            hour("2025-06-01T12:00"),
            hour("2025-06-01T13:00"),
            hour("2025-06-01T14:00"),
        ];
        assert_eq!(initial_hourly_index(&hours, now), 2);
        let later = parse_time("2025-06-02T00:00").unwrap();
        assert_eq!(initial_hourly_index(&hours, later), 2);
        assert_eq!(initial_hourly_index(&hours[..2], later), 1);
        assert_eq!(initial_hourly_index(&[], now), 0);
    }

    #[test]
    fn formats_dates() {
        assert_eq!(format_date_time("2025-06-01T09:05"), "01.06.2025 09:05");
        assert_eq!(format_date("2025-06-01"), "01.06.2025");
        assert_eq!(format_date("soon"), "soon");
    }
}
