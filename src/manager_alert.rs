use log::warn;
use crate::models::{Alert, Reading};

pub const DEFAULT_THRESHOLD_CELSIUS: f64 = 35.0;

/// Produces one alert per reading strictly above the threshold, in batch order
///
/// Readings that fail validation never alert.
///
/// # Arguments
///
/// * 'readings' - the latest batch
/// * 'threshold_celsius' - temperature above which an alert fires
pub fn evaluate(readings: &[Reading], threshold_celsius: f64) -> Vec<Alert> {
    readings
        .iter()
        .filter(|r| match r.validate() {
            Ok(_) => true,
            Err(e) => {
                warn!("skipping reading in alerts: {}", e);
                false
            }
        })
        .filter(|r| r.temperature > threshold_celsius)
        .map(|r| Alert {
            city: r.city.clone(),
            temperature: r.temperature,
            message: format!("High temperature alert for {}: {:.1}°C", r.city, r.temperature),
        })
        .collect()
}
