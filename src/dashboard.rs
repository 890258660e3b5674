use std::collections::BTreeMap;
use chrono::{DateTime, Local, NaiveDate, TimeDelta, Utc};
use log::debug;
use crate::errors::ConfigError;
use crate::initialization::MonitorConfig;
use crate::manager_alert::evaluate;
use crate::manager_summary::models::DailySummary;
use crate::manager_summary::{summarize, DailyHistory};
use crate::models::{Alert, Reading};

/// What the dashboard shows: the latest batch and everything derived from it
///
/// A failed refresh keeps the previous batch on display and only records the error.
pub struct Dashboard {
    readings: Vec<Reading>,
    alerts: Vec<Alert>,
    summaries: BTreeMap<String, DailySummary>,
    summary_day: Option<NaiveDate>,
    history: DailyHistory,
    updated_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
    threshold_celsius: f64,
    stale_after: TimeDelta,
    accumulate_daily: bool,
    history_days: u64,
}

impl Dashboard {
    pub fn new(monitor: &MonitorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            readings: Vec::new(),
            alerts: Vec::new(),
            summaries: BTreeMap::new(),
            summary_day: None,
            history: DailyHistory::default(),
            updated_at: None,
            last_error: None,
            threshold_celsius: monitor.threshold_celsius,
            stale_after: monitor.stale_after()?,
            accumulate_daily: monitor.accumulate_daily,
            history_days: monitor.history_days,
        })
    }

    /// Replaces the displayed batch and recomputes alerts and today's summaries
    ///
    /// # Arguments
    ///
    /// * 'batch' - readings from a successful refresh
    /// * 'now' - local time of the refresh, its date is the day key
    pub fn apply_batch(&mut self, batch: Vec<Reading>, now: DateTime<Local>) {
        let today = now.date_naive();

        self.alerts = evaluate(&batch, self.threshold_celsius);

        if self.accumulate_daily {
            self.history.merge(DailyHistory::default().record(&batch, today));
            self.history.retain_recent(today, self.history_days);
            debug!("daily history holds {} days", self.history.len());
            self.summaries = self.history.day(today).cloned().unwrap_or_default();
        } else {
            self.summaries = summarize(&batch, today);
        }

        self.summary_day = Some(today);
        self.readings = batch;
        self.updated_at = Some(now.with_timezone(&Utc));
        self.last_error = None;
    }

    /// Records a failed refresh without touching the displayed batch
    ///
    /// # Arguments
    ///
    /// * 'error' - description of the failure
    pub fn record_failure(&mut self, error: String) {
        self.last_error = Some(error);
    }

    /// True when there is no batch yet or the latest one is older than the stale limit
    ///
    /// # Arguments
    ///
    /// * 'now' - the time to compare against
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        match self.updated_at {
            Some(updated_at) => now - updated_at > self.stale_after,
            None => true,
        }
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn summaries(&self) -> &BTreeMap<String, DailySummary> {
        &self.summaries
    }

    /// Summaries per city for any day still held
    ///
    /// Past days are only kept when accumulating, otherwise only the latest batch's day is known.
    ///
    /// # Arguments
    ///
    /// * 'day' - the day key
    pub fn summaries_for(&self, day: NaiveDate) -> Option<&BTreeMap<String, DailySummary>> {
        if self.accumulate_daily {
            self.history.day(day)
        } else if self.summary_day == Some(day) {
            Some(&self.summaries)
        } else {
            None
        }
    }

    pub fn summary_day(&self) -> Option<NaiveDate> {
        self.summary_day
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
