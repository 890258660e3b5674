use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_with::{serde_as, TimestampSeconds};
use crate::errors::ReadingError;

/// One city's weather snapshot at fetch time
///
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub city: String,
    pub condition: String,
    pub temperature: f64,
    pub feels_like: f64,
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub observed_at: DateTime<Utc>,
}

impl Reading {
    /// Checks that the reading can take part in aggregation and alerting
    ///
    pub fn validate(&self) -> Result<(), ReadingError> {
        if self.city.trim().is_empty() {
            return Err(ReadingError::EmptyCity);
        }
        if !self.temperature.is_finite() || !self.feels_like.is_finite() {
            return Err(ReadingError::NonFiniteTemperature(self.city.clone()));
        }

        Ok(())
    }

    /// Name of the dashboard icon for the reading's condition
    ///
    pub fn icon(&self) -> &'static str {
        match self.condition.to_lowercase().as_str() {
            "clear" => "sun",
            "rain" => "cloud-rain",
            "snow" => "snowflake",
            _ => "wind",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub city: String,
    pub temperature: f64,
    pub message: String,
}

/// Rounds to one decimal, half away from zero
///
/// # Arguments
///
/// * 'value' - the value to round
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
pub(crate) fn reading(city: &str, condition: &str, temperature: f64) -> Reading {
    Reading {
        city: city.to_string(),
        condition: condition.to_string(),
        temperature,
        feels_like: temperature,
        observed_at: DateTime::from_timestamp(1_717_200_000, 0).unwrap(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_malformed_readings() {
        assert_eq!(reading("", "Clear", 20.0).validate(), Err(ReadingError::EmptyCity));
        assert_eq!(reading("  ", "Clear", 20.0).validate(), Err(ReadingError::EmptyCity));
        assert_eq!(
            reading("Delhi", "Clear", f64::NAN).validate(),
            Err(ReadingError::NonFiniteTemperature("Delhi".to_string()))
        );
        assert_eq!(
            reading("Delhi", "Clear", f64::INFINITY).validate(),
            Err(ReadingError::NonFiniteTemperature("Delhi".to_string()))
        );

        let mut r = reading("Delhi", "Clear", 20.0);
        r.feels_like = f64::NEG_INFINITY;
        assert!(r.validate().is_err());

        assert_eq!(reading("Delhi", "Clear", 20.0).validate(), Ok(()));
    }

    #[test]
    fn icon_follows_condition() {
        assert_eq!(reading("a", "Clear", 1.0).icon(), "sun");
        assert_eq!(reading("a", "RAIN", 1.0).icon(), "cloud-rain");
        assert_eq!(reading("a", "snow", 1.0).icon(), "snowflake");
        assert_eq!(reading("a", "Haze", 1.0).icon(), "wind");
    }

    #[test]
    fn observed_at_serializes_as_epoch_seconds() {
        let json = serde_json::to_value(reading("Delhi", "Clear", 36.2)).unwrap();
        assert_eq!(json["observed_at"], 1_717_200_000);
        assert_eq!(json["feels_like"], 36.2);
    }

    #[test]
    fn rounding() {
        assert_eq!(round_one_decimal(36.24), 36.2);
        assert_eq!(round_one_decimal(36.25), 36.3);
        assert_eq!(round_one_decimal(-2.25), -2.3);
    }
}
