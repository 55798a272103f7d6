use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::job::Job;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationCategory {
    Remote,
    Hybrid,
    Onsite,
}

impl LocationCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            LocationCategory::Remote => "remote",
            LocationCategory::Hybrid => "hybrid",
            LocationCategory::Onsite => "onsite",
        }
    }
}

/// Workplace arrangement inferred from a free-text location.
///
/// The backend has no structured field for this; "remote" and "hybrid" are
/// substrings of the location text and anything else is onsite. A location
/// may mention both, in which case it matches both categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Workplace {
    remote: bool,
    hybrid: bool,
}

impl Workplace {
    pub fn classify(location: Option<&str>) -> Self {
        let location = location.unwrap_or("").to_lowercase();
        Self {
            remote: location.contains("remote"),
            hybrid: location.contains("hybrid"),
        }
    }

    pub fn is(self, category: LocationCategory) -> bool {
        match category {
            LocationCategory::Remote => self.remote,
            LocationCategory::Hybrid => self.hybrid,
            LocationCategory::Onsite => !self.remote && !self.hybrid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
}

impl ExperienceLevel {
    /// entry = [0, 2], mid = (2, 5], senior = (5, inf)
    pub fn contains(self, years: f64) -> bool {
        match self {
            ExperienceLevel::Entry => years <= 2.0,
            ExperienceLevel::Mid => years > 2.0 && years <= 5.0,
            ExperienceLevel::Senior => years > 5.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostedWithin {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "24h")]
    Day,
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
}

impl PostedWithin {
    pub fn window(self) -> Option<Duration> {
        match self {
            PostedWithin::All => None,
            PostedWithin::Day => Some(Duration::days(1)),
            PostedWithin::Week => Some(Duration::days(7)),
            PostedWithin::Month => Some(Duration::days(30)),
        }
    }

    pub fn label(self) -> Option<&'static str> {
        match self {
            PostedWithin::All => None,
            PostedWithin::Day => Some("Last 24 hours"),
            PostedWithin::Week => Some("Last 7 days"),
            PostedWithin::Month => Some("Last 30 days"),
        }
    }
}

/// Current filter selections. The default value filters nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub search: String,
    pub location_categories: BTreeSet<LocationCategory>,
    pub location_city: String,
    pub job_types: BTreeSet<String>,
    pub experience_levels: BTreeSet<ExperienceLevel>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub posted_within: PostedWithin,
}

/// Partial update to a [`FilterState`]. Absent fields are left untouched;
/// an explicit `null` salary bound clears it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FilterPatch {
    pub search: Option<String>,
    pub location_categories: Option<BTreeSet<LocationCategory>>,
    pub location_city: Option<String>,
    pub job_types: Option<BTreeSet<String>>,
    pub experience_levels: Option<BTreeSet<ExperienceLevel>>,
    #[serde(deserialize_with = "explicit_null")]
    pub salary_min: Option<Option<f64>>,
    #[serde(deserialize_with = "explicit_null")]
    pub salary_max: Option<Option<f64>>,
    pub posted_within: Option<PostedWithin>,
}

fn explicit_null<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Zero, negative and non-finite bounds mean "no bound".
fn salary_bound(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

impl FilterState {
    pub fn merge(&mut self, patch: FilterPatch) {
        if let Some(search) = patch.search {
            self.search = search;
        }
        if let Some(categories) = patch.location_categories {
            self.location_categories = categories;
        }
        if let Some(city) = patch.location_city {
            self.location_city = city;
        }
        if let Some(job_types) = patch.job_types {
            self.job_types = job_types.iter().map(|t| t.to_lowercase()).collect();
        }
        if let Some(levels) = patch.experience_levels {
            self.experience_levels = levels;
        }
        if let Some(min) = patch.salary_min {
            self.salary_min = salary_bound(min);
        }
        if let Some(max) = patch.salary_max {
            self.salary_max = salary_bound(max);
        }
        if let Some(posted) = patch.posted_within {
            self.posted_within = posted;
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == FilterState::default()
    }

    /// Prepare the predicate set for one pass over the job list.
    pub fn compile(&self, now: DateTime<Utc>) -> JobFilter<'_> {
        JobFilter {
            state: self,
            search: self.search.to_lowercase(),
            city: self.location_city.to_lowercase(),
            cutoff: self.posted_within.window().map(|w| now - w),
        }
    }
}

/// Filter state with its case-folded needles and date cutoff resolved.
pub struct JobFilter<'a> {
    state: &'a FilterState,
    search: String,
    city: String,
    cutoff: Option<DateTime<Utc>>,
}

impl JobFilter<'_> {
    pub fn matches(&self, job: &Job) -> bool {
        self.matches_search(job)
            && self.matches_location(job)
            && self.matches_city(job)
            && self.matches_job_type(job)
            && self.matches_experience(job)
            && self.matches_salary(job)
            && self.matches_posted(job)
    }

    fn matches_search(&self, job: &Job) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.as_str();
        let hit = |field: &Option<String>| {
            field
                .as_deref()
                .is_some_and(|text| text.to_lowercase().contains(needle))
        };
        hit(&job.title)
            || hit(&job.company_name)
            || hit(&job.description)
            || job
                .required_skills
                .iter()
                .any(|skill| skill.to_lowercase().contains(needle))
    }

    fn matches_location(&self, job: &Job) -> bool {
        let categories = &self.state.location_categories;
        if categories.is_empty() {
            return true;
        }
        let workplace = Workplace::classify(job.location.as_deref());
        categories.iter().any(|&category| workplace.is(category))
    }

    fn matches_city(&self, job: &Job) -> bool {
        if self.city.is_empty() {
            return true;
        }
        job.location
            .as_deref()
            .is_some_and(|location| location.to_lowercase().contains(&self.city))
    }

    fn matches_job_type(&self, job: &Job) -> bool {
        let job_types = &self.state.job_types;
        if job_types.is_empty() {
            return true;
        }
        job.job_type
            .as_deref()
            .is_some_and(|t| job_types.contains(&t.to_lowercase()))
    }

    fn matches_experience(&self, job: &Job) -> bool {
        let levels = &self.state.experience_levels;
        if levels.is_empty() {
            return true;
        }
        let years = job.experience_years();
        levels.iter().any(|level| level.contains(years))
    }

    fn matches_salary(&self, job: &Job) -> bool {
        if let Some(min) = self.state.salary_min
            && job.salary_ceiling() < min
        {
            return false;
        }
        if let Some(max) = self.state.salary_max
            && job.salary_floor() > max
        {
            return false;
        }
        true
    }

    fn matches_posted(&self, job: &Job) -> bool {
        match self.cutoff {
            None => true,
            Some(cutoff) => job.posted_at.is_some_and(|posted| posted >= cutoff),
        }
    }
}
