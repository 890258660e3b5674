use std::fmt;

#[derive(Debug)]
pub enum OpenWeatherError {
    Client(String),
    Api(String),
    Document(String),
}

impl fmt::Display for OpenWeatherError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OpenWeatherError::Client(e) => write!(f, "OpenWeatherError::Client: {}", e),
            OpenWeatherError::Api(e) => write!(f, "OpenWeatherError::Api: {}", e),
            OpenWeatherError::Document(e) => write!(f, "OpenWeatherError::Document: {}", e),
        }
    }
}
impl From<reqwest::Error> for OpenWeatherError {
    fn from(e: reqwest::Error) -> Self {
        OpenWeatherError::Client(e.to_string())
    }
}
impl From<serde_json::Error> for OpenWeatherError {
    fn from(e: serde_json::Error) -> Self {
        OpenWeatherError::Document(e.to_string())
    }
}
impl From<tokio::task::JoinError> for OpenWeatherError {
    fn from(e: tokio::task::JoinError) -> Self {
        OpenWeatherError::Client(e.to_string())
    }
}
