pub mod models;

use std::collections::BTreeMap;
use chrono::{Days, NaiveDate};
use log::warn;
use crate::manager_summary::models::DailySummary;
use crate::models::Reading;

type CitySummaries = BTreeMap<String, DailySummary>;

/// Summarizes a batch of readings for the given day
///
/// Readings that fail validation are skipped and logged, an empty batch gives an empty map.
///
/// # Arguments
///
/// * 'readings' - the batch to summarize
/// * 'today' - day key the readings are bucketed under
pub fn summarize(readings: &[Reading], today: NaiveDate) -> CitySummaries {
    let mut history = DailyHistory::default().record(readings, today);

    history.days.remove(&today).unwrap_or_default()
}

/// Day keyed summaries owned by the caller across refresh cycles
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyHistory {
    days: BTreeMap<NaiveDate, CitySummaries>,
}

impl DailyHistory {

    /// Folds a batch into the history under the given day and hands the history back
    ///
    /// # Arguments
    ///
    /// * 'readings' - the batch to fold in
    /// * 'today' - day key the readings are bucketed under
    pub fn record(mut self, readings: &[Reading], today: NaiveDate) -> Self {
        let mut touched = false;

        for r in readings.iter() {
            if let Err(e) = r.validate() {
                warn!("skipping reading in summary: {}", e);
                continue;
            }

            self.days
                .entry(today)
                .or_default()
                .entry(r.city.clone())
                .or_insert_with(|| DailySummary::new(today, &r.city))
                .push(r.temperature, &r.condition);
            touched = true;
        }

        if touched {
            if let Some(cities) = self.days.get_mut(&today) {
                cities.values_mut().for_each(DailySummary::finalize);
            }
        }

        self
    }

    /// Merges another history into this one, bucket by bucket
    ///
    /// # Arguments
    ///
    /// * 'other' - history to merge in
    pub fn merge(&mut self, other: DailyHistory) {
        for (day, cities) in other.days {
            let target = self.days.entry(day).or_default();
            for (city, summary) in cities {
                match target.get_mut(&city) {
                    Some(existing) => existing.absorb(&summary),
                    None => { target.insert(city, summary); },
                }
            }
        }
    }

    /// Returns summaries per city for the given day
    ///
    /// # Arguments
    ///
    /// * 'day' - the day key
    pub fn day(&self, day: NaiveDate) -> Option<&CitySummaries> {
        self.days.get(&day)
    }

    /// Keeps only the most recent `days` calendar days counting `today`
    ///
    /// # Arguments
    ///
    /// * 'today' - the current day key
    /// * 'days' - number of days to keep
    pub fn retain_recent(&mut self, today: NaiveDate, days: u64) {
        if let Some(cutoff) = today.checked_sub_days(Days::new(days)) {
            self.days.retain(|day, _| *day > cutoff);
        }
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reading;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn summarizes_one_city() {
        let readings = vec![
            reading("Chennai", "Clear", 30.0),
            reading("Chennai", "Clear", 34.0),
            reading("Chennai", "Rain", 32.0),
        ];

        let summaries = summarize(&readings, day(1));
        let chennai = &summaries["Chennai"];

        assert_eq!(summaries.len(), 1);
        assert_eq!(chennai.day, day(1));
        assert_eq!(chennai.temperatures, vec![30.0, 34.0, 32.0]);
        assert_eq!(chennai.average_temperature, Some(32.0));
        assert_eq!(chennai.max_temperature, Some(34.0));
        assert_eq!(chennai.min_temperature, Some(30.0));
        assert_eq!(chennai.dominant_condition.as_deref(), Some("Clear"));
    }

    #[test]
    fn tie_goes_to_first_seen_condition() {
        let readings = vec![
            reading("Kolkata", "Rain", 28.0),
            reading("Kolkata", "Clear", 29.0),
            reading("Kolkata", "Clear", 30.0),
            reading("Kolkata", "Rain", 27.0),
        ];

        let summaries = summarize(&readings, day(1));
        let kolkata = &summaries["Kolkata"];

        assert_eq!(kolkata.dominant_condition.as_deref(), Some("Rain"));
        assert_eq!(kolkata.condition_counts[0].label, "Rain");
        assert_eq!(kolkata.condition_counts[0].count, 2);
        assert_eq!(kolkata.condition_counts[1].label, "Clear");
        assert_eq!(kolkata.condition_counts[1].count, 2);
    }

    #[test]
    fn empty_batch_gives_empty_map() {
        assert!(summarize(&[], day(1)).is_empty());
    }

    #[test]
    fn one_summary_per_city() {
        let readings = vec![
            reading("Delhi", "Clear", 36.2),
            reading("Mumbai", "Rain", 28.0),
        ];

        let summaries = summarize(&readings, day(1));

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries["Delhi"].average_temperature, Some(36.2));
        assert_eq!(summaries["Mumbai"].dominant_condition.as_deref(), Some("Rain"));
    }

    #[test]
    fn average_stays_between_extrema() {
        let batches = vec![
            vec![30.04, 30.04],
            vec![-0.05, -0.05, -0.05],
            vec![12.3, 45.6, 7.8, 0.1],
            vec![1.0],
        ];

        for temps in batches {
            let readings: Vec<Reading> = temps.iter().map(|t| reading("Pune", "Clear", *t)).collect();
            let s = &summarize(&readings, day(1))["Pune"];
            let (min, avg, max) = (s.min_temperature.unwrap(), s.average_temperature.unwrap(), s.max_temperature.unwrap());

            assert!(min <= avg && avg <= max, "{} <= {} <= {}", min, avg, max);
            let dominant = s.dominant_condition.clone().unwrap();
            assert!(s.condition_counts.iter().any(|c| c.label == dominant));
        }
    }

    #[test]
    fn average_stays_between_extrema_after_merge() {
        let cycles = vec![
            vec![30.04, 30.04],
            vec![30.04],
            vec![-0.05, -0.05],
            vec![45.65, 45.65, 45.65],
            vec![12.3, 7.8],
        ];

        let mut merged = DailyHistory::default();
        let mut recorded = DailyHistory::default();
        for temps in cycles {
            let readings: Vec<Reading> = temps.iter().map(|t| reading("Pune", "Haze", *t)).collect();
            merged.merge(DailyHistory::default().record(&readings, day(1)));
            recorded = recorded.record(&readings, day(1));

            for history in [&merged, &recorded] {
                let s = &history.day(day(1)).unwrap()["Pune"];
                let (min, avg, max) = (s.min_temperature.unwrap(), s.average_temperature.unwrap(), s.max_temperature.unwrap());

                assert!(min <= avg && avg <= max, "{} <= {} <= {}", min, avg, max);
            }
        }

        assert_eq!(merged, recorded);
    }

    #[test]
    fn merged_equal_readings_keep_exact_average() {
        let mut history = DailyHistory::default().record(&[reading("Pune", "Clear", 30.04)], day(1));
        history.merge(DailyHistory::default().record(&[reading("Pune", "Clear", 30.04)], day(1)));

        let s = &history.day(day(1)).unwrap()["Pune"];
        assert_eq!(s.average_temperature, Some(30.04));
        assert_eq!(s.min_temperature, Some(30.04));
    }

    #[test]
    fn malformed_readings_are_skipped() {
        let readings = vec![
            reading("Delhi", "Clear", f64::NAN),
            reading("", "Clear", 40.0),
            reading("Delhi", "Rain", 31.0),
        ];

        let summaries = summarize(&readings, day(1));

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries["Delhi"].temperatures, vec![31.0]);
        assert_eq!(summaries["Delhi"].dominant_condition.as_deref(), Some("Rain"));
    }

    #[test]
    fn only_malformed_readings_give_empty_map() {
        let readings = vec![reading("Delhi", "Clear", f64::INFINITY)];

        assert!(summarize(&readings, day(1)).is_empty());
    }

    #[test]
    fn summarize_is_idempotent() {
        let readings = vec![
            reading("Delhi", "Clear", 36.2),
            reading("Delhi", "Haze", 35.1),
        ];

        assert_eq!(summarize(&readings, day(1)), summarize(&readings, day(1)));
    }

    #[test]
    fn history_accumulates_across_cycles() {
        let history = DailyHistory::default()
            .record(&[reading("Delhi", "Clear", 30.0)], day(1))
            .record(&[reading("Delhi", "Rain", 40.0)], day(1))
            .record(&[reading("Delhi", "Rain", 35.0)], day(1));

        let delhi = &history.day(day(1)).unwrap()["Delhi"];

        assert_eq!(delhi.temperatures, vec![30.0, 40.0, 35.0]);
        assert_eq!(delhi.min_temperature, Some(30.0));
        assert_eq!(delhi.max_temperature, Some(40.0));
        assert_eq!(delhi.average_temperature, Some(35.0));
        assert_eq!(delhi.dominant_condition.as_deref(), Some("Rain"));
    }

    #[test]
    fn history_keeps_days_apart() {
        let history = DailyHistory::default()
            .record(&[reading("Delhi", "Clear", 30.0)], day(1))
            .record(&[reading("Delhi", "Rain", 40.0)], day(2));

        assert_eq!(history.len(), 2);
        assert_eq!(history.day(day(1)).unwrap()["Delhi"].temperatures, vec![30.0]);
        assert_eq!(history.day(day(2)).unwrap()["Delhi"].temperatures, vec![40.0]);
    }

    #[test]
    fn merge_combines_buckets() {
        let mut a = DailyHistory::default()
            .record(&[reading("Delhi", "Rain", 30.0), reading("Delhi", "Rain", 31.0)], day(1));
        let b = DailyHistory::default()
            .record(&[reading("Delhi", "Clear", 33.0), reading("Delhi", "Clear", 34.0)], day(1))
            .record(&[reading("Mumbai", "Rain", 28.0)], day(2));

        a.merge(b);

        let delhi = &a.day(day(1)).unwrap()["Delhi"];
        assert_eq!(delhi.temperatures, vec![30.0, 31.0, 33.0, 34.0]);
        assert_eq!(delhi.average_temperature, Some(32.0));
        assert_eq!(delhi.dominant_condition.as_deref(), Some("Rain"));
        assert_eq!(a.day(day(2)).unwrap()["Mumbai"].temperatures, vec![28.0]);
    }

    #[test]
    fn retain_recent_drops_old_days() {
        let mut history = DailyHistory::default();
        for d in 1..=5 {
            history = history.record(&[reading("Delhi", "Clear", 30.0)], day(d));
        }

        history.retain_recent(day(5), 2);

        assert_eq!(history.len(), 2);
        assert!(history.day(day(3)).is_none());
        assert!(history.day(day(4)).is_some());
        assert!(history.day(day(5)).is_some());
    }

    #[test]
    fn empty_summary_does_not_panic() {
        let mut s = DailySummary::new(day(1), "Delhi");
        s.finalize();

        assert_eq!(s.average_temperature, None);
        assert_eq!(s.max_temperature, None);
        assert_eq!(s.min_temperature, None);
        assert_eq!(s.dominant_condition, None);
    }
}
