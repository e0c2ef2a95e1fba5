use std::path::Path;

use anyhow::{Context, Result};
use jobcal_core::ics;
use owo_colors::OwoColorize;

use crate::render::{Render, pluralize};

pub fn run(file: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let events = ics::parse(&contents);
    if events.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    for event in &events {
        println!("{}", event.render());
    }
    println!("\n{} {}", events.len(), pluralize("event", events.len()));

    Ok(())
}
