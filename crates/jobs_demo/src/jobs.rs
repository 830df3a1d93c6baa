//! Job listings, pagination and table rendering.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Number of listings per feed page.
pub const PAGE_SIZE: usize = 50;

/// One job posting as it appears in the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub company: String,
    pub title: String,
    pub location: String,
    #[serde(default)]
    pub company_logo: Option<String>,
    #[serde(default)]
    pub description: String,
}

/// Paged access to a list of postings.
#[derive(Debug, Clone, Default)]
pub struct JobFeed {
    jobs: Vec<Job>,
}

impl JobFeed {
    pub fn new(jobs: Vec<Job>) -> Self {
        Self { jobs }
    }

    /// Parse a JSON array of postings.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// A feed of `count` generated postings.
    pub fn sample(count: usize) -> Self {
        const COMPANIES: [&str; 4] = ["Acme", "Globex", "Initech", "Umbrella"];
        const LOCATIONS: [&str; 4] = ["Berlin, Germany", "Austin, TX", "Remote", "Toronto, ON"];

        let jobs = (0..count)
            .map(|i| Job {
                id: format!("job-{i:04}"),
                company: COMPANIES[i % COMPANIES.len()].to_string(),
                title: format!("Software Engineer {}", i + 1),
                location: LOCATIONS[i % LOCATIONS.len()].to_string(),
                company_logo: None,
                description: format!("Build and ship feature {}.", i + 1),
            })
            .collect();
        Self::new(jobs)
    }

    /// Postings on page `page` (zero-based); empty past the end.
    pub fn page(&self, page: usize) -> &[Job] {
        let start = page.saturating_mul(PAGE_SIZE).min(self.jobs.len());
        let end = start.saturating_add(PAGE_SIZE).min(self.jobs.len());
        &self.jobs[start..end]
    }

    pub fn page_count(&self) -> usize {
        self.jobs.len().div_ceil(PAGE_SIZE)
    }
}

/// Index postings by id for detail lookups.
pub fn map_jobs_by_id(jobs: &[Job]) -> HashMap<String, Job> {
    jobs.iter()
        .map(|job| (job.id.clone(), job.clone()))
        .collect()
}

/// Header plus one row per posting.
pub fn build_rows(jobs: &[Job]) -> Vec<[String; 4]> {
    let header = [
        "Company".to_string(),
        "Title".to_string(),
        "Location".to_string(),
        "Logo".to_string(),
    ];
    std::iter::once(header)
        .chain(jobs.iter().map(|job| {
            [
                job.company.clone(),
                job.title.clone(),
                job.location.clone(),
                job.company_logo.clone().unwrap_or_else(|| "-".to_string()),
            ]
        }))
        .collect()
}

/// Lay out rows as an aligned text table.
pub fn render_table(rows: &[[String; 4]]) -> String {
    let mut widths = [0usize; 4];
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        out.push_str(cells.join(" | ").trim_end());
        out.push('\n');
    }
    out
}

/// Detail view for a single posting.
pub fn render_details(job: &Job) -> String {
    format!(
        "{}\n{}\n{}\n\n{}\n",
        job.title, job.location, job.company, job.description
    )
}
