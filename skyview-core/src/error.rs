use thiserror::Error;

/// Failures surfaced by the weather pipeline.
///
/// The `Display` output of every variant is the message shown to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WeatherError {
    /// Transport failure or a non-success HTTP status on a best-effort call.
    #[error("{0}")]
    Network(String),

    /// Upstream reported that the location does not exist.
    #[error("Location not found. Please check the spelling or try a different location.")]
    NotFound,

    /// Upstream returned a non-success status or application code.
    #[error("{0}")]
    Upstream(String),

    /// A success response that could not be used.
    #[error("{0}")]
    InvalidData(String),

    #[error("We couldn't find \"{searched}\". Did you mean \"{returned}\"?")]
    CityMismatch { searched: String, returned: String },

    #[error("Found {city} in {returned} instead of {searched}.")]
    CountryMismatch {
        city: String,
        returned: String,
        searched: String,
    },

    /// The render target refused to start background playback.
    #[error("Video autoplay blocked: {0}")]
    PlaybackBlocked(String),
}

impl From<reqwest::Error> for WeatherError {
    /// The request URL carries the API key, so it is stripped from the message.
    fn from(err: reqwest::Error) -> Self {
        WeatherError::Network(err.without_url().to_string())
    }
}

pub type Result<T> = std::result::Result<T, WeatherError>;
