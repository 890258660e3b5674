use std::sync::Arc;
use chrono::Local;
use log::{error, info, warn};
use tokio::sync::Mutex;
use crate::dashboard::Dashboard;
use crate::manager_openweather::OpenWeather;

/// Refresh loop, one batch per interval
///
/// # Arguments
///
/// * 'dashboard' - dashboard to publish batches to
/// * 'open_weather' - the weather fetcher
/// * 'cities' - the cities to fetch each cycle
/// * 'interval_secs' - seconds to wait between cycles
pub async fn run_refresh(dashboard: Arc<Mutex<Dashboard>>, open_weather: OpenWeather, cities: Vec<String>, interval_secs: u64) {
    loop {
        refresh_once(&dashboard, &open_weather, &cities).await;

        tokio::time::sleep(tokio::time::Duration::from_secs(interval_secs)).await;
    }
}

/// Runs one refresh cycle, returns whether a new batch was published
///
/// # Arguments
///
/// * 'dashboard' - dashboard to publish the batch to
/// * 'open_weather' - the weather fetcher
/// * 'cities' - the cities to fetch
pub async fn refresh_once(dashboard: &Mutex<Dashboard>, open_weather: &OpenWeather, cities: &[String]) -> bool {
    match open_weather.fetch_batch(cities).await {
        Ok(batch) => {
            info!("fetched {} readings", batch.len());

            let mut dashboard = dashboard.lock().await;
            dashboard.apply_batch(batch, Local::now());

            for alert in dashboard.alerts() {
                warn!("{}", alert.message);
            }
            info!("{} alerts, {} city summaries", dashboard.alerts().len(), dashboard.summaries().len());

            true
        },
        Err(e) => {
            error!("failed to fetch weather batch: {}", e);
            dashboard.lock().await.record_failure(e.to_string());

            false
        }
    }
}
