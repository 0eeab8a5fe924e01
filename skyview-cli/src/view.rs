use std::collections::HashMap;

use skyview_core::{
    Field, ForecastEntry, LocationCandidate, RenderTarget, ViewUpdate, error::Result,
};

/// Render target that keeps the latest state of every slot and prints it on demand.
#[derive(Debug, Default)]
pub struct TerminalView {
    fields: HashMap<Field, String>,
    air_quality: Option<String>,
    icon: Option<String>,
    forecast: Vec<ForecastEntry>,
    suggestions: Vec<LocationCandidate>,
    background: Option<String>,
    alerts: Vec<String>,
}

impl TerminalView {
    pub fn suggestions(&self) -> &[LocationCandidate] {
        &self.suggestions
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    fn field(&self, field: Field) -> &str {
        self.fields.get(&field).map_or("--", String::as_str)
    }

    pub fn print_weather(&self) {
        println!("{}", self.field(Field::Location));
        println!(
            "  {}  {}",
            self.field(Field::Temperature),
            self.field(Field::Description)
        );
        if let Some(icon) = &self.icon {
            println!("  Icon:           {icon}");
        }
        println!("  Humidity:       {}", self.field(Field::Humidity));
        println!("  Real feel:      {}", self.field(Field::RealFeel));
        println!("  Wind:           {}", self.field(Field::Wind));
        println!("  Wind direction: {}", self.field(Field::WindDirection));
        println!("  Pressure:       {}", self.field(Field::Pressure));
        println!("  Sunset:         {}", self.field(Field::Sunset));
        println!(
            "  Air quality:    {}",
            self.air_quality.as_deref().unwrap_or("--")
        );
        if let Some(background) = &self.background {
            println!("  Background:     {background}");
        }

        if !self.forecast.is_empty() {
            println!();
            println!("Hourly forecast:");
            for entry in &self.forecast {
                println!(
                    "  {:>5}  {:>4}°C  {}",
                    entry.hour_label, entry.temperature_c, entry.icon_code
                );
            }
        }
    }

    pub fn print_suggestions(&self) {
        if self.suggestions.is_empty() {
            println!("No matching locations.");
            return;
        }
        for candidate in &self.suggestions {
            println!("{:<24} {}", candidate.name, candidate.region_label());
        }
    }
}

impl RenderTarget for TerminalView {
    fn apply(&mut self, update: ViewUpdate) {
        match update {
            ViewUpdate::Text { field, value } => {
                self.fields.insert(field, value);
            }
            ViewUpdate::AirQuality { text, .. } => self.air_quality = Some(text),
            ViewUpdate::Icon { src, .. } => self.icon = Some(src),
            ViewUpdate::HideIcon => self.icon = None,
            ViewUpdate::Forecast(entries) => self.forecast = entries,
            ViewUpdate::Suggestions(candidates) => self.suggestions = candidates,
            ViewUpdate::HideSuggestions => self.suggestions.clear(),
            ViewUpdate::Alert(message) => self.alerts.push(message),
            ViewUpdate::BackgroundImage(image) => self.background = Some(image),
            ViewUpdate::InputValue(_) | ViewUpdate::Loading(_) => {}
        }
    }

    fn play_video(&mut self, source: &str) -> Result<()> {
        self.background = Some(source.to_string());
        Ok(())
    }
}
