mod errors;
mod logging;
mod initialization;
mod models;
mod dashboard;
mod handlers;
mod manager_alert;
mod manager_openweather;
mod manager_refresh;
mod manager_summary;

use std::sync::Arc;
use actix_web::{web, App, HttpServer};
use tokio::sync::Mutex;
use log::info;
use crate::dashboard::Dashboard;
use crate::errors::UnrecoverableError;
use crate::initialization::config;
use crate::manager_openweather::OpenWeather;
use crate::manager_refresh::run_refresh;

struct AppState {
    dashboard: Arc<Mutex<Dashboard>>,
}

#[actix_web::main]
async fn main() -> Result<(), UnrecoverableError> {
    let config = config()?;
    let open_weather = OpenWeather::new(&config.open_weather)?;
    let dashboard: Arc<Mutex<Dashboard>> = Arc::new(Mutex::new(Dashboard::new(&config.monitor)?));

    let refresh_dashboard = dashboard.clone();
    let cities = config.monitor.cities.clone();
    let interval_secs = config.monitor.refresh_interval_secs;
    tokio::spawn(async move {
        run_refresh(refresh_dashboard, open_weather, cities, interval_secs).await;
    });

    info!("serving dashboard on {}:{}", config.web_server.bind_address, config.web_server.bind_port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(AppState {dashboard: dashboard.clone()}))
            .configure(handlers::configure)
    })
        .bind((config.web_server.bind_address, config.web_server.bind_port))?
        .run()
        .await?;

    Ok(())
}
