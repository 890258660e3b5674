pub mod errors;
mod models;

use std::time::Duration;
use reqwest::Client;
use tokio::task::JoinSet;
use crate::initialization::OpenWeatherConfig;
use crate::manager_openweather::errors::OpenWeatherError;
use crate::manager_openweather::models::CurrentWeather;
use crate::models::{round_one_decimal, Reading};

/// Struct for fetching current weather readings from OpenWeatherMap
#[derive(Clone)]
pub struct OpenWeather {
    client: Client,
    base_url: String,
    api_key: String,
    country_code: String,
}

impl OpenWeather {
    /// Returns an OpenWeather struct ready for fetching current weather
    ///
    /// # Arguments
    ///
    /// * 'config' - endpoint, api key, country code and request timeout
    pub fn new(config: &OpenWeatherConfig) -> Result<OpenWeather, OpenWeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            country_code: config.country_code.clone(),
        })
    }

    /// Retrieves the current weather for one city and normalizes it into a reading.
    /// Temperatures are rounded to one decimal and the first weather entry gives the condition.
    ///
    /// # Arguments
    ///
    /// * 'city' - name of the city to look up
    pub async fn current_weather(&self, city: &str) -> Result<Reading, OpenWeatherError> {
        let query = if self.country_code.is_empty() {
            city.to_string()
        } else {
            format!("{},{}", city, self.country_code)
        };

        let req = self.client
            .get(&self.base_url)
            .query(&[("q", query.as_str()), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send().await?;

        let status = req.status();
        if !status.is_success() {
            return Err(OpenWeatherError::Api(format!("error while fetching weather for {}: {}", city, status)));
        }

        let json = req.text().await?;
        let current: CurrentWeather = serde_json::from_str(&json)?;

        let condition = current.weather
            .into_iter()
            .next()
            .ok_or_else(|| OpenWeatherError::Document(format!("no weather condition for {}", city)))?;

        Ok(Reading {
            city: current.name,
            condition: condition.main,
            temperature: round_one_decimal(current.main.temp),
            feels_like: round_one_decimal(current.main.feels_like),
            observed_at: current.dt,
        })
    }

    /// Fetches all cities in parallel. Any failing city fails the whole batch,
    /// otherwise readings come back in the order of the given cities.
    ///
    /// # Arguments
    ///
    /// * 'cities' - the cities to fetch
    pub async fn fetch_batch(&self, cities: &[String]) -> Result<Vec<Reading>, OpenWeatherError> {
        let mut set: JoinSet<(usize, Result<Reading, OpenWeatherError>)> = JoinSet::new();

        for (i, city) in cities.iter().enumerate() {
            let open_weather = self.clone();
            let city = city.clone();
            set.spawn(async move { (i, open_weather.current_weather(&city).await) });
        }

        let mut batch: Vec<Option<Reading>> = vec![None; cities.len()];
        while let Some(joined) = set.join_next().await {
            let (i, result) = joined?;
            match result {
                Ok(reading) => batch[i] = Some(reading),
                Err(e) => {
                    set.abort_all();
                    return Err(e);
                }
            }
        }

        Ok(batch.into_iter().flatten().collect())
    }
}
