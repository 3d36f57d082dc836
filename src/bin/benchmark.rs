use chrono::{Duration as ChronoDuration, Utc};
use colored::*;
use governor::{Quota, RateLimiter};
use hdrhistogram::Histogram;
use reqwest::Client;
use serde_json::{json, Value};
use std::num::NonZeroU32;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use uuid::Uuid;

const RPS_STAGES: [u32; 4] = [10, 50, 200, 1000];

struct Probe {
    label: &'static str,
    url: String,
}

#[derive(Default)]
struct StageReport {
    ok: u64,
    failed: u64,
    latency_us: Option<Histogram<u64>>,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let base_url = std::env::var("BENCH_URL").unwrap_or_else(|_| "http://localhost:10000".to_string());
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
    let stage_secs: u64 = std::env::var("BENCH_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(20);

    let client = Client::builder()
        .pool_max_idle_per_host(1000)
        .timeout(Duration::from_secs(10))
        .cookie_store(true)
        .build()
        .expect("Failed to build HTTP client");

    if client.get(format!("{}/api/health", base_url)).send().await.is_err() {
        eprintln!("{}", format!("Salon API unreachable at {}", base_url).red().bold());
        return;
    }

    let service_id = prepare_service(&client, &base_url, &password).await;
    let tomorrow = (Utc::now() + ChronoDuration::days(1)).format("%Y-%m-%d");

    let probes = [
        Probe { label: "health", url: format!("{}/api/health", base_url) },
        Probe { label: "catalogue", url: format!("{}/api/services", base_url) },
        Probe { label: "slots", url: format!("{}/api/slots?date={}&serviceId={}", base_url, tomorrow, service_id) },
    ];

    println!("{} {} ({}s per stage)", "Salon load test against".bold().green(), base_url, stage_secs);

    for probe in &probes {
        println!("\n{} {}", probe.label.cyan().bold(), probe.url);
        println!("{:>6} | {:>9} | {:>9} | {:>9} | {:>7}", "rps", "p50 ms", "p95 ms", "p99 ms", "ok %");

        for rps in RPS_STAGES {
            let report = run_stage(&client, &probe.url, rps, Duration::from_secs(stage_secs)).await;
            print_row(rps, &report);
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
    }
}

/// Logs in and creates a throwaway service so the slots probe has a target.
async fn prepare_service(client: &Client, base_url: &str, password: &str) -> String {
    let login: Value = client.post(format!("{}/api/login", base_url))
        .json(&json!({ "password": password }))
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .expect("Admin login failed")
        .json()
        .await
        .expect("Login response is not JSON");
    let csrf = login["csrfToken"].as_str().expect("No csrfToken").to_string();

    let created: Value = client.post(format!("{}/api/services", base_url))
        .header("X-CSRF-Token", csrf)
        .json(&json!({
            "name": format!("Load test {}", Uuid::new_v4()),
            "price": 10.0,
            "duration": 30
        }))
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .expect("Creating the load test service failed")
        .json()
        .await
        .expect("Service response is not JSON");

    created["id"].as_str().expect("No service id").to_string()
}

async fn run_stage(client: &Client, url: &str, rps: u32, length: Duration) -> StageReport {
    let limiter = RateLimiter::direct(Quota::per_second(NonZeroU32::new(rps).unwrap_or(NonZeroU32::MIN)));
    let deadline = Instant::now() + length;
    let mut in_flight = JoinSet::new();

    while Instant::now() < deadline {
        limiter.until_ready().await;
        let client = client.clone();
        let url = url.to_string();
        in_flight.spawn(async move {
            let started = Instant::now();
            let ok = client.get(&url).send().await.is_ok_and(|r| r.status().is_success());
            (started.elapsed(), ok)
        });
    }

    let mut report = StageReport {
        latency_us: Histogram::new(3).ok(),
        ..Default::default()
    };
    while let Some(joined) = in_flight.join_next().await {
        let Ok((latency, ok)) = joined else { continue };
        if ok { report.ok += 1 } else { report.failed += 1 }
        if let Some(h) = report.latency_us.as_mut() {
            let _ = h.record(latency.as_micros() as u64);
        }
    }
    report
}

fn print_row(rps: u32, report: &StageReport) {
    let total = report.ok + report.failed;
    let ok_pct = if total == 0 { 0.0 } else { report.ok as f64 * 100.0 / total as f64 };
    let ms = |q: f64| report.latency_us.as_ref().map_or(0.0, |h| h.value_at_quantile(q) as f64 / 1000.0);

    let row = format!("{:>6} | {:>9.2} | {:>9.2} | {:>9.2} | {:>6.1}%", rps, ms(0.5), ms(0.95), ms(0.99), ok_pct);
    if report.failed > 0 {
        println!("{}", row.yellow());
    } else {
        println!("{}", row);
    }
}
