use crate::{
    error::{Result, WeatherError},
    model::CurrentConditions,
};

/// Check that the upstream resolved the location the user asked for.
///
/// City matching is a case-insensitive substring test: the searched text must
/// appear inside the returned name, so "York" accepts "New York". The country
/// is compared exactly (ignoring case) and only when both sides have one.
pub fn validate_location(
    data: &CurrentConditions,
    searched_city: &str,
    searched_country: Option<&str>,
) -> Result<()> {
    if data.weather.is_empty() {
        return Err(WeatherError::InvalidData(
            "Received invalid weather data".to_string(),
        ));
    }

    let returned_city = data.name.to_lowercase();
    if !returned_city.contains(&searched_city.to_lowercase()) {
        return Err(WeatherError::CityMismatch {
            searched: searched_city.to_string(),
            returned: data.name.clone(),
        });
    }

    if let (Some(searched), Some(returned)) = (searched_country, data.sys.country.as_deref()) {
        if !returned.eq_ignore_ascii_case(searched) {
            return Err(WeatherError::CountryMismatch {
                city: data.name.clone(),
                returned: returned.to_string(),
                searched: searched.to_uppercase(),
            });
        }
    }

    Ok(())
}
