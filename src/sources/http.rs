use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AppError;
use crate::models::job::Job;
use crate::sources::{JobSource, parse_jobs};

/// Fetches the job list from the REST backend's `GET {base}/jobs/`.
pub struct HttpJobSource {
    client: reqwest::Client,
    jobs_url: String,
}

impl HttpJobSource {
    /// `per_page` is forwarded to the backend, which otherwise applies its
    /// own default page size.
    pub fn new(
        base_url: &str,
        per_page: Option<u32>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {e}")))?;

        let mut jobs_url = format!("{}/jobs/", base_url.trim_end_matches('/'));
        if let Some(per_page) = per_page {
            jobs_url.push_str(&format!("?per_page={per_page}"));
        }

        Ok(Self { client, jobs_url })
    }

    pub fn jobs_url(&self) -> &str {
        &self.jobs_url
    }
}

#[async_trait]
impl JobSource for HttpJobSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_jobs(&self) -> Result<Vec<Job>, AppError> {
        let resp = self
            .client
            .get(&self.jobs_url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            // The backend reports failures as {"error": "..."}
            let message = resp
                .json::<Value>()
                .await
                .ok()
                .and_then(|body| body.get("error").and_then(Value::as_str).map(String::from))
                .unwrap_or_else(|| "Request failed".to_string());
            return Err(AppError::Upstream(format!(
                "backend returned {status}: {message}"
            )));
        }

        let payload: Value = resp.json().await?;
        let jobs = parse_jobs(&payload);
        tracing::info!("Fetched {} jobs from {}", jobs.len(), self.jobs_url);
        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jobs_url() {
        let source = HttpJobSource::new("http://localhost:5000/api/", None, Duration::from_secs(5))
            .unwrap();
        assert_eq!(source.jobs_url(), "http://localhost:5000/api/jobs/");

        let source =
            HttpJobSource::new("http://backend/api", Some(500), Duration::from_secs(5)).unwrap();
        assert_eq!(source.jobs_url(), "http://backend/api/jobs/?per_page=500");
    }
}
