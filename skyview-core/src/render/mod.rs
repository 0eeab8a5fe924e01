//! Presentation layer.
//!
//! [`Renderer`] turns fetched data into [`ViewUpdate`]s and pushes them into an
//! injected [`RenderTarget`], which is the only place anything is drawn.

use tracing::{debug, warn};

use crate::{
    config::{Config, VideoPaths},
    error::Result,
    model::{
        AirQualityReport, CurrentConditions, ForecastEntry, ForecastReport, LocationCandidate,
        WeatherSnapshot,
    },
};

pub mod format;

pub use format::BackgroundVideo;

/// Placeholder shown in detail fields when there is nothing to display.
pub const PLACEHOLDER: &str = "--";

/// Text slots of the weather panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Temperature,
    Location,
    Description,
    Humidity,
    RealFeel,
    Wind,
    WindDirection,
    Pressure,
    Sunset,
}

impl Field {
    /// Text fields of the details grid, reset to [`PLACEHOLDER`] on clear.
    pub const DETAILS: [Field; 6] = [
        Field::Humidity,
        Field::RealFeel,
        Field::Wind,
        Field::WindDirection,
        Field::Pressure,
        Field::Sunset,
    ];
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewUpdate {
    Text { field: Field, value: String },
    /// Air-quality text with its color; `None` keeps the default color.
    AirQuality { text: String, color: Option<&'static str> },
    Icon { src: String, alt: String },
    HideIcon,
    Forecast(Vec<ForecastEntry>),
    Suggestions(Vec<LocationCandidate>),
    HideSuggestions,
    InputValue(String),
    /// Loader visible and search trigger disabled.
    Loading(bool),
    Alert(String),
    BackgroundImage(String),
}

/// Surface the renderer draws on.
pub trait RenderTarget: Send {
    fn apply(&mut self, update: ViewUpdate);

    /// Load and start a background video. Returns
    /// [`WeatherError::PlaybackBlocked`](crate::WeatherError::PlaybackBlocked)
    /// when the surface refuses to play it.
    fn play_video(&mut self, source: &str) -> Result<()>;
}

#[derive(Debug)]
pub struct Renderer<T> {
    target: T,
    videos: VideoPaths,
    fallback_image: String,
    loaded_video: Option<String>,
}

impl<T: RenderTarget> Renderer<T> {
    pub fn new(target: T, config: &Config) -> Self {
        Self {
            target,
            videos: config.videos.clone(),
            fallback_image: config.fallback_image.clone(),
            loaded_video: None,
        }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    /// Source of the background video currently loaded, if any.
    pub fn loaded_video(&self) -> Option<&str> {
        self.loaded_video.as_deref()
    }

    fn text(&mut self, field: Field, value: impl Into<String>) {
        self.target.apply(ViewUpdate::Text {
            field,
            value: value.into(),
        });
    }

    pub fn display_weather(&mut self, data: &CurrentConditions) -> WeatherSnapshot {
        let snap = format::snapshot(data);

        let header = match &snap.country {
            Some(country) => format!("{}, {}", snap.city_name, country),
            None => snap.city_name.clone(),
        };

        self.text(Field::Temperature, format::format_temperature(data.main.temp));
        self.text(Field::Location, header);
        self.text(Field::Description, snap.description.clone());
        self.target.apply(ViewUpdate::Icon {
            src: format::icon_url(&snap.icon_code),
            alt: snap.description.clone(),
        });

        self.text(Field::Humidity, format!("{}%", snap.humidity_pct));
        self.text(Field::RealFeel, format::format_temperature(data.main.feels_like));
        self.text(Field::Wind, format::format_wind_speed(snap.wind_speed_kmh));
        self.text(Field::WindDirection, snap.wind_direction.clone());
        self.text(Field::Pressure, format!("{} hPa", snap.pressure_hpa));
        self.text(
            Field::Sunset,
            snap.sunset_local_time.as_deref().unwrap_or(PLACEHOLDER),
        );
        self.target.apply(ViewUpdate::AirQuality {
            text: "Loading...".to_string(),
            color: None,
        });

        self.update_background(&snap.description);
        snap
    }

    pub fn display_forecast(&mut self, report: &ForecastReport) -> Vec<ForecastEntry> {
        let entries = format::forecast_entries(report);
        self.target.apply(ViewUpdate::Forecast(entries.clone()));
        entries
    }

    pub fn display_air_quality(&mut self, report: Option<&AirQualityReport>) {
        let update = match report.and_then(AirQualityReport::current_index) {
            Some(aqi) => {
                let reading = format::air_quality_reading(aqi);
                ViewUpdate::AirQuality {
                    text: format!("{} ({})", reading.qualitative_level, reading.aqi_index),
                    color: Some(reading.color),
                }
            }
            None => ViewUpdate::AirQuality {
                text: "Unavailable".to_string(),
                color: None,
            },
        };
        self.target.apply(update);
    }

    /// Swap the background for the description's category, unless that
    /// source is already loaded.
    pub fn update_background(&mut self, description: &str) -> BackgroundVideo {
        let video = BackgroundVideo::from_description(description);
        let source = video.source(&self.videos).to_string();

        if self.loaded_video.as_deref() == Some(source.as_str()) {
            debug!(%video, "background unchanged");
            return video;
        }

        self.play(source);
        video
    }

    /// Load the default background unconditionally.
    pub fn set_default_background(&mut self) {
        let source = self.videos.default.clone();
        self.play(source);
    }

    fn play(&mut self, source: String) {
        if let Err(err) = self.target.play_video(&source) {
            warn!(error = %err, "showing fallback image");
            self.target
                .apply(ViewUpdate::BackgroundImage(self.fallback_image.clone()));
        }
        self.loaded_video = Some(source);
    }

    /// Reset every weather field so stale data never sits next to an error.
    pub fn clear_weather_data(&mut self) {
        self.text(Field::Temperature, "");
        self.text(Field::Location, "");
        self.text(Field::Description, "");
        self.target.apply(ViewUpdate::HideIcon);
        self.target.apply(ViewUpdate::Forecast(Vec::new()));

        for field in Field::DETAILS {
            self.text(field, PLACEHOLDER);
        }
        self.target.apply(ViewUpdate::AirQuality {
            text: PLACEHOLDER.to_string(),
            color: None,
        });
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.target.apply(ViewUpdate::Loading(loading));
    }

    pub fn show_alert(&mut self, message: impl Into<String>) {
        self.target.apply(ViewUpdate::Alert(message.into()));
    }

    /// An empty candidate list hides the dropdown.
    pub fn show_suggestions(&mut self, candidates: Vec<LocationCandidate>) {
        if candidates.is_empty() {
            self.hide_suggestions();
        } else {
            self.target.apply(ViewUpdate::Suggestions(candidates));
        }
    }

    pub fn hide_suggestions(&mut self) {
        self.target.apply(ViewUpdate::HideSuggestions);
    }

    pub fn set_input_value(&mut self, value: impl Into<String>) {
        self.target.apply(ViewUpdate::InputValue(value.into()));
    }
}
