#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;

use jobboard::clock::FixedClock;
use jobboard::error::AppError;
use jobboard::models::job::Job;
use jobboard::routes::router;
use jobboard::sources::JobSource;
use jobboard::state::AppState;

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// In-memory job source; `fail` makes the next fetches error out.
pub struct StubSource {
    pub jobs: Vec<Job>,
    pub fail: AtomicBool,
}

impl StubSource {
    pub fn new(jobs: Vec<Job>) -> Arc<Self> {
        Arc::new(Self {
            jobs,
            fail: AtomicBool::new(false),
        })
    }
}

#[async_trait]
impl JobSource for StubSource {
    fn name(&self) -> &str {
        "stub"
    }

    async fn fetch_jobs(&self) -> Result<Vec<Job>, AppError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Upstream("backend returned 500: boom".to_string()));
        }
        Ok(self.jobs.clone())
    }
}

/// Fifteen onsite jobs; #7 is a remote mid-level backend engineer.
pub fn fifteen_jobs() -> Vec<Job> {
    (1..=15)
        .map(|id| {
            if id == 7 {
                Job {
                    id,
                    title: Some("Backend Engineer".to_string()),
                    company_name: Some("Acme".to_string()),
                    location: Some("Remote".to_string()),
                    job_type: Some("full-time".to_string()),
                    experience_required: Some(3.0),
                    posted_at: Some(now() - Duration::days(id)),
                    ..Default::default()
                }
            } else {
                Job {
                    id,
                    title: Some(format!("Analyst {id}")),
                    company_name: Some("Globex".to_string()),
                    location: Some("Denver, CO".to_string()),
                    job_type: Some("part-time".to_string()),
                    posted_at: Some(now() - Duration::days(id)),
                    ..Default::default()
                }
            }
        })
        .collect()
}

pub const VIEW_TTL: std::time::Duration = std::time::Duration::from_secs(600);

pub fn app(source: Arc<StubSource>) -> Router {
    router(AppState::new(source, Arc::new(FixedClock(now())), VIEW_TTL))
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

pub fn page_ids(view: &Value) -> Vec<i64> {
    view["page"]["jobs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|job| job["id"].as_i64().unwrap())
        .collect()
}
