use std::collections::BTreeMap;
use actix_web::{get, web, HttpResponse, Responder};
use chrono::{DateTime, Local, NaiveDate, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, TimestampSeconds};
use crate::manager_summary::models::DailySummary;
use crate::models::Reading;
use crate::AppState;

#[serde_as]
#[derive(Serialize)]
struct CityCard<'a> {
    city: &'a str,
    condition: &'a str,
    icon: &'static str,
    temperature: f64,
    feels_like: f64,
    #[serde_as(as = "TimestampSeconds<i64>")]
    observed_at: DateTime<Utc>,
    observed_time: String,
}

#[derive(Serialize)]
struct WeatherView<'a> {
    updated_at: Option<DateTime<Utc>>,
    stale: bool,
    last_error: Option<&'a str>,
    cards: Vec<CityCard<'a>>,
}

#[derive(Serialize)]
struct TrendPoint<'a> {
    name: &'a str,
    temperature: f64,
    time: String,
}

#[derive(Serialize)]
struct SummaryView<'a> {
    day: Option<NaiveDate>,
    cities: &'a BTreeMap<String, DailySummary>,
}

#[derive(Deserialize, Debug)]
struct SummaryParams {
    day: Option<NaiveDate>,
}

fn local_time(r: &Reading) -> String {
    r.observed_at.with_timezone(&Local).format("%H:%M:%S").to_string()
}

#[get("/weather")]
async fn weather(data: web::Data<AppState>) -> impl Responder {
    info!("GET /weather");

    let dashboard = data.dashboard.lock().await;

    if dashboard.updated_at().is_none() {
        return HttpResponse::ServiceUnavailable().json(WeatherView {
            updated_at: None,
            stale: true,
            last_error: dashboard.last_error(),
            cards: Vec::new(),
        });
    }

    let cards = dashboard.readings()
        .iter()
        .map(|r| CityCard {
            city: &r.city,
            condition: &r.condition,
            icon: r.icon(),
            temperature: r.temperature,
            feels_like: r.feels_like,
            observed_at: r.observed_at,
            observed_time: local_time(r),
        })
        .collect();

    HttpResponse::Ok().json(WeatherView {
        updated_at: dashboard.updated_at(),
        stale: dashboard.is_stale(Utc::now()),
        last_error: dashboard.last_error(),
        cards,
    })
}

#[get("/trend")]
async fn trend(data: web::Data<AppState>) -> impl Responder {
    info!("GET /trend");

    let dashboard = data.dashboard.lock().await;
    let points: Vec<TrendPoint> = dashboard.readings()
        .iter()
        .map(|r| TrendPoint { name: &r.city, temperature: r.temperature, time: local_time(r) })
        .collect();

    HttpResponse::Ok().json(points)
}

#[get("/alerts")]
async fn alerts(data: web::Data<AppState>) -> impl Responder {
    info!("GET /alerts");

    let dashboard = data.dashboard.lock().await;

    HttpResponse::Ok().json(dashboard.alerts())
}

#[get("/summary")]
async fn summary(params: web::Query<SummaryParams>, data: web::Data<AppState>) -> impl Responder {
    info!("GET /summary {:?}", params);

    let dashboard = data.dashboard.lock().await;

    match params.day {
        None => HttpResponse::Ok().json(SummaryView {
            day: dashboard.summary_day(),
            cities: dashboard.summaries(),
        }),
        Some(day) => match dashboard.summaries_for(day) {
            Some(cities) => HttpResponse::Ok().json(SummaryView { day: Some(day), cities }),
            None => HttpResponse::NotFound().finish(),
        },
    }
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Registers all dashboard endpoints
///
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(weather)
        .service(trend)
        .service(alerts)
        .service(summary)
        .service(health);
}
