use chrono::NaiveDate;
use serde::Serialize;
use crate::models::round_one_decimal;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionCount {
    pub label: String,
    pub count: u32,
}

/// Statistics for one city on one calendar day
///
/// Condition counts are kept in the order their labels were first seen, which is
/// what decides ties for the dominant condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub day: NaiveDate,
    pub city: String,
    pub temperatures: Vec<f64>,
    pub condition_counts: Vec<ConditionCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dominant_condition: Option<String>,
}

impl DailySummary {
    pub fn new(day: NaiveDate, city: &str) -> Self {
        Self {
            day,
            city: city.to_string(),
            temperatures: Vec::new(),
            condition_counts: Vec::new(),
            average_temperature: None,
            max_temperature: None,
            min_temperature: None,
            dominant_condition: None,
        }
    }

    /// Adds one observation, derived values are stale until `finalize` is called
    ///
    /// # Arguments
    ///
    /// * 'temperature' - observed temperature
    /// * 'condition' - observed condition label
    pub fn push(&mut self, temperature: f64, condition: &str) {
        self.temperatures.push(temperature);
        self.add_condition(condition, 1);
    }

    /// Folds another summary for the same day and city into this one
    ///
    /// # Arguments
    ///
    /// * 'other' - summary to absorb
    pub fn absorb(&mut self, other: &DailySummary) {
        self.temperatures.extend_from_slice(&other.temperatures);
        for c in other.condition_counts.iter() {
            self.add_condition(&c.label, c.count);
        }
        self.finalize();
    }

    /// Recomputes average, extrema and dominant condition
    ///
    pub fn finalize(&mut self) {
        if self.temperatures.is_empty() {
            self.average_temperature = None;
            self.max_temperature = None;
            self.min_temperature = None;
        } else {
            let min = self.temperatures.iter().copied().fold(f64::INFINITY, f64::min);
            let max = self.temperatures.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mean = self.temperatures.iter().sum::<f64>() / self.temperatures.len() as f64;

            // Rounding must not push the average outside the observed range
            self.average_temperature = Some(round_one_decimal(mean).max(min).min(max));
            self.max_temperature = Some(max);
            self.min_temperature = Some(min);
        }

        let mut dominant: Option<&ConditionCount> = None;
        for c in self.condition_counts.iter() {
            match dominant {
                Some(d) if d.count >= c.count => {},
                _ => dominant = Some(c),
            }
        }
        self.dominant_condition = dominant.map(|d| d.label.clone());
    }

    fn add_condition(&mut self, label: &str, count: u32) {
        match self.condition_counts.iter_mut().find(|c| c.label == label) {
            Some(c) => c.count += count,
            None => self.condition_counts.push(ConditionCount { label: label.to_string(), count }),
        }
    }
}
