use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A job posting as served by the backend.
///
/// Every field but `id` is optional on the wire. Malformed optional values
/// (unparseable timestamps, non-numeric salaries) decode as absent instead of
/// rejecting the whole record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default, alias = "experience_min", deserialize_with = "lenient_number")]
    pub experience_required: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub salary_min: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub salary_max: Option<f64>,
    #[serde(default, alias = "posted_date", deserialize_with = "lenient_timestamp")]
    pub posted_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub match_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_skills")]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default)]
    pub benefits: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub external_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub deadline: Option<DateTime<Utc>>,
}

impl Job {
    /// Years of experience used for filtering; absent reads as 0.
    pub fn experience_years(&self) -> f64 {
        self.experience_required.unwrap_or(0.0)
    }

    /// Highest advertised salary, using whichever bound is present.
    pub fn salary_ceiling(&self) -> f64 {
        self.salary_max
            .unwrap_or(0.0)
            .max(self.salary_min.unwrap_or(0.0))
            .max(0.0)
    }

    /// Lowest advertised salary, using whichever bound is present.
    /// Infinite when the job lists no salary at all.
    pub fn salary_floor(&self) -> f64 {
        self.salary_min
            .unwrap_or(f64::INFINITY)
            .min(self.salary_max.unwrap_or(f64::INFINITY))
    }
}

/// Parse a backend timestamp. Accepts RFC 3339, naive ISO datetimes
/// (read as UTC) and bare dates.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(Value::as_str).and_then(parse_timestamp))
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let number = match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|n| n.is_finite()))
}

fn lenient_skills<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let skills = match raw {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(skills)
}
