//! Jobs Demo - job listing page instrumented with performance timers
//!
//! Renders pages of job postings into a text table and opens one posting's
//! details, timing each step. Switches come from `PERF_MONITORING_ENABLED` and
//! `PERF_LOGGING_ENABLED`; reports go to the log on the `perf.report` target.
//!
//! Usage: `jobs_demo [feed.json]`

mod jobs;

use anyhow::Context;
use jobs::{build_rows, map_jobs_by_id, render_details, render_table, Job, JobFeed};
use perf_timer::{Marker, Parameters, PerfConfig, PerformanceTimers, QuickTimer};
use std::collections::HashMap;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Pages to render before stopping.
const PAGES_TO_SHOW: usize = 3;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = PerfConfig::from_env();
    tracing::info!(
        monitoring = config.monitoring_enabled,
        logging = config.logging_enabled,
        "Starting jobs demo"
    );
    let timers = PerformanceTimers::new(config);

    let feed = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read job feed {}", path))?;
            JobFeed::from_json(&json).with_context(|| format!("Invalid job feed {}", path))?
        }
        None => JobFeed::sample(120),
    };

    let mut jobs_by_id = HashMap::new();
    for page in 0..PAGES_TO_SHOW.min(feed.page_count()) {
        jobs_by_id = show_page(&timers, &feed, page)?;
    }

    if let Some(job) = jobs_by_id.values().min_by(|a, b| a.id.cmp(&b.id)) {
        let params = Parameters::new().with("job", job.id.as_str());
        let scope = timers.scoped("Job Details", params)?.with_log_total(true);
        let details = render_details(job);
        scope.set_marker("Details Rendered")?;
        println!("{}", details);
    }

    Ok(())
}

/// Render one page of the feed and return its postings by id.
fn show_page(
    timers: &PerformanceTimers,
    feed: &JobFeed,
    page: usize,
) -> anyhow::Result<HashMap<String, Job>> {
    let quick = QuickTimer::start("adding jobs data to page");

    let timer = timers.create("Render Jobs", Parameters::new().with("page", page))?;
    timer.start();

    let jobs = feed.page(page);
    let rows = build_rows(jobs);
    timer.set_marker(Marker::new("Rows Built").logged())?;

    let table = render_table(&rows);
    timer.set_marker(Marker::new("Table Rendered").logged().and_from("Start"))?;

    println!("Page {} of {}", page + 1, feed.page_count());
    print!("{}", table);

    let jobs_by_id = map_jobs_by_id(jobs);
    timers.get("Render Jobs").end(true);
    quick.end();

    Ok(jobs_by_id)
}
