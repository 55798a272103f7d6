use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::job::Job;

/// Ordering applied to the filtered jobs.
///
/// The legacy option values of the job search page (`date`, `salary_high`,
/// `salary_low`, `match_score`) are accepted as aliases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Backend order, untouched.
    #[default]
    Relevance,
    #[serde(alias = "date")]
    DateDesc,
    #[serde(alias = "salary_high")]
    SalaryDesc,
    #[serde(alias = "salary_low")]
    SalaryAsc,
    #[serde(alias = "match_score")]
    MatchScoreDesc,
}

impl SortKey {
    /// Reorder `filtered` (indices into `jobs`, in backend order).
    ///
    /// `sort_by` is stable, so ties keep backend order for every key.
    pub fn order(self, jobs: &[Job], filtered: &[usize]) -> Vec<usize> {
        let mut ordered = filtered.to_vec();
        let cmp: fn(&Job, &Job) -> Ordering = match self {
            SortKey::Relevance => return ordered,
            // undated jobs sort last
            SortKey::DateDesc => |a: &Job, b: &Job| b.posted_at.cmp(&a.posted_at),
            SortKey::SalaryDesc => {
                |a: &Job, b: &Job| number(b.salary_max).total_cmp(&number(a.salary_max))
            }
            SortKey::SalaryAsc => {
                |a: &Job, b: &Job| number(a.salary_min).total_cmp(&number(b.salary_min))
            }
            SortKey::MatchScoreDesc => {
                |a: &Job, b: &Job| number(b.match_score).total_cmp(&number(a.match_score))
            }
        };
        ordered.sort_by(|&a, &b| cmp(&jobs[a], &jobs[b]));
        ordered
    }
}

fn number(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}
