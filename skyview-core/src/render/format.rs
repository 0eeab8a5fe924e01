//! Pure conversions from upstream readings to display values.

use chrono::{DateTime, FixedOffset, Timelike, Utc};

use crate::{
    config::VideoPaths,
    model::{
        AirQualityReading, CurrentConditions, ForecastEntry, ForecastReport, WeatherSnapshot,
    },
};

/// Number of forecast slots shown (3-hour steps).
pub const FORECAST_SLOTS: usize = 8;

pub const COMPASS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

pub const AQI_LEVELS: [&str; 5] = ["Good", "Fair", "Moderate", "Poor", "Very Poor"];
pub const AQI_COLORS: [&str; 5] = ["#4CAF50", "#8BC34A", "#FFC107", "#FF9800", "#F44336"];
pub const AQI_UNKNOWN_LEVEL: &str = "Unknown";
pub const AQI_UNKNOWN_COLOR: &str = "#9E9E9E";

const ICON_BASE: &str = "https://openweathermap.org/img/wn";

/// Round to the nearest integer, halves toward positive infinity.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

pub fn format_temperature(celsius: f64) -> String {
    format!("{}°C", round_half_up(celsius))
}

pub fn wind_speed_kmh(meters_per_second: f64) -> f64 {
    meters_per_second * 3.6
}

pub fn format_wind_speed(kmh: f64) -> String {
    format!("{kmh:.1} km/h")
}

/// Eight-point compass label for a bearing in degrees.
pub fn wind_direction(degrees: Option<f64>) -> &'static str {
    let Some(degrees) = degrees else {
        return "N/A";
    };
    let index = round_half_up(degrees.rem_euclid(360.0) / 45.0).rem_euclid(8);
    COMPASS[index as usize]
}

pub fn air_quality_reading(aqi: i64) -> AirQualityReading {
    let slot = usize::try_from(aqi)
        .ok()
        .and_then(|a| a.checked_sub(1))
        .filter(|i| *i < AQI_LEVELS.len());
    AirQualityReading {
        aqi_index: aqi,
        qualitative_level: slot.map_or(AQI_UNKNOWN_LEVEL, |i| AQI_LEVELS[i]),
        color: slot.map_or(AQI_UNKNOWN_COLOR, |i| AQI_COLORS[i]),
    }
}

pub fn icon_url(code: &str) -> String {
    format!("{ICON_BASE}/{code}@4x.png")
}

pub fn hourly_icon_url(code: &str) -> String {
    format!("{ICON_BASE}/{code}.png")
}

fn local_datetime(timestamp: i64, utc_offset_secs: Option<i32>) -> Option<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(utc_offset_secs.unwrap_or(0))?;
    DateTime::<Utc>::from_timestamp(timestamp, 0).map(|dt| dt.with_timezone(&offset))
}

/// `HH:MM` (24h) at the location.
pub fn clock_label(timestamp: i64, utc_offset_secs: Option<i32>) -> Option<String> {
    local_datetime(timestamp, utc_offset_secs).map(|dt| dt.format("%H:%M").to_string())
}

/// `<hour>:00` at the location, hour not zero-padded.
pub fn hour_label(timestamp: i64, utc_offset_secs: Option<i32>) -> String {
    local_datetime(timestamp, utc_offset_secs)
        .map(|dt| format!("{}:00", dt.hour()))
        .unwrap_or_else(|| "--".to_string())
}

pub fn snapshot(data: &CurrentConditions) -> WeatherSnapshot {
    let (description, icon_code) = data
        .weather
        .first()
        .map(|w| (w.description.to_lowercase(), w.icon.clone()))
        .unwrap_or_default();

    WeatherSnapshot {
        city_name: data.name.clone(),
        country: data.sys.country.clone(),
        temperature_c: round_half_up(data.main.temp),
        feels_like_c: round_half_up(data.main.feels_like),
        description,
        icon_code,
        humidity_pct: data.main.humidity,
        wind_speed_kmh: wind_speed_kmh(data.wind.speed),
        wind_direction: wind_direction(data.wind.deg).to_string(),
        pressure_hpa: data.main.pressure,
        sunset_local_time: data
            .sys
            .sunset
            .and_then(|ts| clock_label(ts, data.timezone)),
    }
}

/// First [`FORECAST_SLOTS`] entries, no interval normalization.
pub fn forecast_entries(report: &ForecastReport) -> Vec<ForecastEntry> {
    report
        .list
        .iter()
        .take(FORECAST_SLOTS)
        .map(|item| ForecastEntry {
            hour_label: hour_label(item.dt, report.city.timezone),
            temperature_c: round_half_up(item.main.temp),
            icon_code: item
                .weather
                .first()
                .map(|w| w.icon.clone())
                .unwrap_or_default(),
        })
        .collect()
}

/// Ambient background category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackgroundVideo {
    Default,
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
}

impl BackgroundVideo {
    /// First keyword found in the description wins.
    pub fn from_description(description: &str) -> Self {
        let description = description.to_lowercase();
        if description.contains("clear") {
            Self::Sunny
        } else if description.contains("cloud") {
            Self::Cloudy
        } else if description.contains("rain") || description.contains("drizzle") {
            Self::Rainy
        } else if description.contains("snow") {
            Self::Snowy
        } else {
            Self::Default
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Sunny => "sunny",
            Self::Cloudy => "cloudy",
            Self::Rainy => "rainy",
            Self::Snowy => "snowy",
        }
    }

    pub fn source<'a>(&self, videos: &'a VideoPaths) -> &'a str {
        match self {
            Self::Default => &videos.default,
            Self::Sunny => &videos.sunny,
            Self::Cloudy => &videos.cloudy,
            Self::Rainy => &videos.rainy,
            Self::Snowy => &videos.snowy,
        }
    }
}

impl std::fmt::Display for BackgroundVideo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
