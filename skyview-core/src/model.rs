use serde::{Deserialize, Serialize};

/// A city typed by the user, split into the parts sent upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub city: String,
    pub country: Option<String>,
}

impl SearchQuery {
    /// Parse `"<city>"` or `"<city>, <country>"`. Returns `None` for blank input.
    ///
    /// Anything after a second comma is ignored.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let mut parts = input.split(',').map(str::trim);
        let city = parts.next().unwrap_or_default().to_string();
        let country = parts
            .next()
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        Some(Self { city, country })
    }

    /// Location string understood by the weather endpoints.
    pub fn location(&self) -> String {
        match &self.country {
            Some(country) => format!("{},{}", self.city, country),
            None => self.city.clone(),
        }
    }
}

/// One geocoding match offered in the autocomplete dropdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCandidate {
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

impl LocationCandidate {
    /// Text written back into the search input when the candidate is picked.
    pub fn input_value(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }

    /// Secondary line of a dropdown item.
    pub fn region_label(&self) -> String {
        match &self.state {
            Some(state) => format!("{}, {}", self.country, state),
            None => self.country.clone(),
        }
    }
}

/// Application status code carried in OpenWeather bodies.
///
/// The current-weather endpoint sends a number, the forecast endpoint a string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StatusCode {
    Number(i64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    #[serde(default)]
    pub feels_like: f64,
    #[serde(default)]
    pub pressure: i64,
    #[serde(default)]
    pub humidity: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Wind {
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub deg: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SunInfo {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub sunset: Option<i64>,
}

/// Body of the current-weather endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentConditions {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub coord: Option<Coordinates>,
    #[serde(default)]
    pub weather: Vec<Condition>,
    pub main: MainReadings,
    #[serde(default)]
    pub wind: Wind,
    #[serde(default)]
    pub sys: SunInfo,
    /// Shift from UTC in seconds.
    #[serde(default)]
    pub timezone: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastMain {
    pub temp: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastItem {
    pub dt: i64,
    pub main: ForecastMain,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ForecastCity {
    #[serde(default)]
    pub timezone: Option<i32>,
}

/// Body of the 3-hourly forecast endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastReport {
    #[serde(default)]
    pub list: Vec<ForecastItem>,
    #[serde(default)]
    pub city: ForecastCity,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AirQualityMain {
    pub aqi: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AirQualitySample {
    pub main: AirQualityMain,
}

/// Body of the air-pollution endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AirQualityReport {
    #[serde(default)]
    pub list: Vec<AirQualitySample>,
}

impl AirQualityReport {
    pub fn current_index(&self) -> Option<i64> {
        self.list.first().map(|s| s.main.aqi)
    }
}

/// Current conditions prepared for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    pub city_name: String,
    pub country: Option<String>,
    pub temperature_c: i64,
    pub feels_like_c: i64,
    pub description: String,
    pub icon_code: String,
    pub humidity_pct: u8,
    pub wind_speed_kmh: f64,
    pub wind_direction: String,
    pub pressure_hpa: i64,
    pub sunset_local_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastEntry {
    pub hour_label: String,
    pub temperature_c: i64,
    pub icon_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirQualityReading {
    pub aqi_index: i64,
    pub qualitative_level: &'static str,
    pub color: &'static str,
}

/// Lifecycle of the main search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchState {
    #[default]
    Idle,
    Loading,
    Displayed,
    Failed,
}
