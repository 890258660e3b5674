use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_with::{serde_as, TimestampSeconds};

#[derive(Deserialize)]
pub struct WeatherCondition {
    pub main: String,
}

#[derive(Deserialize)]
pub struct MainValues {
    pub temp: f64,
    pub feels_like: f64,
}

/// The part of an OpenWeatherMap current weather document that makes up a reading
///
#[serde_as]
#[derive(Deserialize)]
pub struct CurrentWeather {
    pub name: String,
    pub weather: Vec<WeatherCondition>,
    pub main: MainValues,
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub dt: DateTime<Utc>,
}
