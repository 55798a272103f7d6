// Job sources: where a view's job list comes from.

pub mod http;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AppError;
use crate::models::job::Job;

/// Backend collaborator that supplies the full, unpaginated job list.
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Fetch every job currently on offer. A single attempt; no retries.
    async fn fetch_jobs(&self) -> Result<Vec<Job>, AppError>;
}

/// Decode a backend jobs payload.
///
/// Accepts `{"jobs": [...]}`, a bare array, or anything else as an empty
/// list. Records that fail to decode are skipped.
pub fn parse_jobs(payload: &Value) -> Vec<Job> {
    let items: &[Value] = match payload {
        Value::Array(items) => items.as_slice(),
        Value::Object(obj) => match obj.get("jobs") {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        },
        _ => &[],
    };

    items
        .iter()
        .filter_map(|raw| match serde_json::from_value::<Job>(raw.clone()) {
            Ok(job) => Some(job),
            Err(e) => {
                tracing::warn!("Skipping undecodable job record: {e}");
                None
            }
        })
        .collect()
}
