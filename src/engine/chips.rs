use serde::{Deserialize, Serialize};

use super::filter::{ExperienceLevel, FilterState, LocationCategory, PostedWithin};

/// Identifies one removable active-filter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FilterChip {
    Search,
    Location(LocationCategory),
    City,
    JobType(String),
    Experience(ExperienceLevel),
    Salary,
    PostedWithin,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveFilter {
    pub chip: FilterChip,
    pub label: String,
}

impl FilterState {
    /// One chip per active filter value, in display order.
    pub fn active_filters(&self) -> Vec<ActiveFilter> {
        let mut chips = Vec::new();
        let mut push = |chip, label| chips.push(ActiveFilter { chip, label });

        if !self.search.is_empty() {
            push(FilterChip::Search, format!("Search: \"{}\"", self.search));
        }
        for &category in &self.location_categories {
            push(
                FilterChip::Location(category),
                format!("Location: {}", category.as_str()),
            );
        }
        if !self.location_city.is_empty() {
            push(FilterChip::City, format!("City: {}", self.location_city));
        }
        for job_type in &self.job_types {
            push(FilterChip::JobType(job_type.clone()), format!("Type: {job_type}"));
        }
        for &level in &self.experience_levels {
            push(
                FilterChip::Experience(level),
                format!("Experience: {}", level.as_str()),
            );
        }
        if self.salary_min.is_some() || self.salary_max.is_some() {
            let min = self.salary_min.unwrap_or(0.0);
            let max = self
                .salary_max
                .map_or_else(|| "∞".to_string(), |max| max.to_string());
            push(FilterChip::Salary, format!("Salary: ${min} - ${max}"));
        }
        if let Some(label) = self.posted_within.label() {
            push(FilterChip::PostedWithin, label.to_string());
        }

        chips
    }

    /// Clear the value a chip refers to. Returns false if it was not set.
    pub fn remove(&mut self, chip: &FilterChip) -> bool {
        match chip {
            FilterChip::Search => !std::mem::take(&mut self.search).is_empty(),
            FilterChip::Location(category) => self.location_categories.remove(category),
            FilterChip::City => !std::mem::take(&mut self.location_city).is_empty(),
            FilterChip::JobType(job_type) => self.job_types.remove(&job_type.to_lowercase()),
            FilterChip::Experience(level) => self.experience_levels.remove(level),
            FilterChip::Salary => {
                let was_set = self.salary_min.is_some() || self.salary_max.is_some();
                self.salary_min = None;
                self.salary_max = None;
                was_set
            }
            FilterChip::PostedWithin => {
                std::mem::take(&mut self.posted_within) != PostedWithin::All
            }
        }
    }
}
