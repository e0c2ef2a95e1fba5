use anyhow::Result;
use jobcal_core::SyncCoordinator;
use owo_colors::OwoColorize;

use super::create_spinner;
use crate::render::{Render, pluralize};

pub async fn run(coordinator: &SyncCoordinator, account: &str, url: &str) -> Result<()> {
    let spinner = create_spinner(format!("Pulling {}", url.dimmed()));
    let result = coordinator.pull_sync(account, url).await;
    spinner.finish_and_clear();

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            println!("{}", e.render());
            anyhow::bail!("Pull failed for {account}");
        }
    };

    println!("{}", outcome.integration.render());
    for event in &outcome.events {
        println!("   {}", event.render());
    }

    println!(
        "\nPulled {} {}",
        outcome.event_count,
        pluralize("event", outcome.event_count)
    );

    Ok(())
}
