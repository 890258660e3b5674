use std::collections::HashSet;
use std::{env, fs};
use chrono::TimeDelta;
use log::info;
use serde::Deserialize;
use crate::errors::ConfigError;
use crate::logging::setup_logger;
use crate::manager_alert::DEFAULT_THRESHOLD_CELSIUS;

const CONFIG_ENV: &str = "WEATHERMONITOR_CONFIG";
const API_KEY_ENV: &str = "OPENWEATHERMAP_API_KEY";
const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub web_server: WebServerConfig,
    #[serde(default)]
    pub open_weather: OpenWeatherConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
}

#[derive(Deserialize)]
pub struct GeneralConfig {
    pub log_path: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_true")]
    pub log_to_stdout: bool,
}

#[derive(Deserialize)]
pub struct WebServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct OpenWeatherConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_country_code")]
    pub country_code: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Deserialize, Clone)]
pub struct MonitorConfig {
    #[serde(default = "default_cities")]
    pub cities: Vec<String>,
    #[serde(default = "default_threshold")]
    pub threshold_celsius: f64,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_stale_after")]
    pub stale_after_secs: u64,
    #[serde(default)]
    pub accumulate_daily: bool,
    #[serde(default = "default_history_days")]
    pub history_days: u64,
}

impl MonitorConfig {
    /// Age after which the latest batch is reported as stale
    ///
    pub fn stale_after(&self) -> Result<TimeDelta, ConfigError> {
        i64::try_from(self.stale_after_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .ok_or_else(|| ConfigError(format!("monitor.stale_after_secs is out of range: {}", self.stale_after_secs)))
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_true() -> bool { true }
fn default_bind_address() -> String { "127.0.0.1".to_string() }
fn default_bind_port() -> u16 { 8080 }
fn default_base_url() -> String { "https://api.openweathermap.org/data/2.5/weather".to_string() }
fn default_country_code() -> String { "IN".to_string() }
fn default_timeout_secs() -> u64 { 10 }
fn default_cities() -> Vec<String> {
    ["Delhi", "Mumbai", "Chennai", "Bangalore", "Kolkata", "Hyderabad"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}
fn default_threshold() -> f64 { DEFAULT_THRESHOLD_CELSIUS }
fn default_refresh_interval() -> u64 { 300 }
fn default_stale_after() -> u64 { 60 }
fn default_history_days() -> u64 { 7 }

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { log_path: None, log_level: default_log_level(), log_to_stdout: default_true() }
    }
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self { bind_address: default_bind_address(), bind_port: default_bind_port() }
    }
}

impl Default for OpenWeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            country_code: default_country_code(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            cities: default_cities(),
            threshold_celsius: default_threshold(),
            refresh_interval_secs: default_refresh_interval(),
            stale_after_secs: default_stale_after(),
            accumulate_daily: false,
            history_days: default_history_days(),
        }
    }
}

/// Loads the configuration, applies environment overrides and sets up logging
///
/// The config file is the first command line argument, else the file named by
/// WEATHERMONITOR_CONFIG, else config.toml in the working directory.
pub fn config() -> Result<Config, ConfigError> {
    let path = env::args()
        .nth(1)
        .or_else(|| env::var(CONFIG_ENV).ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let toml = fs::read_to_string(&path)?;
    let mut config = load_config(&toml)?;

    if let Ok(api_key) = env::var(API_KEY_ENV) {
        if !api_key.is_empty() {
            config.open_weather.api_key = api_key;
        }
    }

    validate(&config)?;
    setup_logger(&config.general)?;

    info!("configuration loaded from {}, monitoring {} cities", path, config.monitor.cities.len());

    Ok(config)
}

/// Parses a toml configuration document
///
/// # Arguments
///
/// * 'toml' - the configuration document
pub fn load_config(toml: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str(toml)?)
}

/// Checks settings that would otherwise only fail once the service is running
///
/// # Arguments
///
/// * 'config' - configuration to check
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.open_weather.api_key.is_empty() {
        return Err(ConfigError::from("open_weather.api_key is missing"));
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for city in config.monitor.cities.iter() {
        if city.trim().is_empty() {
            return Err(ConfigError::from("monitor.cities contains an empty name"));
        }
        if !seen.insert(city.as_str()) {
            return Err(ConfigError(format!("monitor.cities lists {} twice", city)));
        }
    }

    if config.open_weather.timeout_secs == 0 {
        return Err(ConfigError::from("open_weather.timeout_secs must be positive"));
    }
    if config.monitor.refresh_interval_secs == 0 {
        return Err(ConfigError::from("monitor.refresh_interval_secs must be positive"));
    }
    if !config.monitor.threshold_celsius.is_finite() {
        return Err(ConfigError::from("monitor.threshold_celsius must be a finite number"));
    }
    if config.monitor.history_days == 0 {
        return Err(ConfigError::from("monitor.history_days must be positive"));
    }
    config.monitor.stale_after()?;

    Ok(())
}
