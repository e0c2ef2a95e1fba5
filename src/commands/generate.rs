use std::path::Path;

use anyhow::{Context, Result};
use jobcal_core::ics::{self, GenerateOptions};
use jobcal_core::{JobRecord, JobcalConfig};

pub fn run(config: &JobcalConfig, jobs_file: &Path, name: Option<String>) -> Result<()> {
    let contents = std::fs::read_to_string(jobs_file)
        .with_context(|| format!("Failed to read {}", jobs_file.display()))?;
    let jobs: Vec<JobRecord> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse jobs from {}", jobs_file.display()))?;

    let options = GenerateOptions::new(name.unwrap_or_else(|| config.calendar_name.clone()))
        .with_timezone(config.timezone()?);

    print!("{}", ics::generate(&jobs, &options));
    Ok(())
}
