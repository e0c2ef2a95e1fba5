use anyhow::Result;
use jobcal_core::SyncCoordinator;
use owo_colors::OwoColorize;

use super::create_spinner;
use crate::render::{Render, pluralize};

pub async fn run(coordinator: &SyncCoordinator, account: &str) -> Result<()> {
    let spinner = create_spinner(format!("Publishing jobs for {account}"));
    let result = coordinator.push_sync(account).await;
    spinner.finish_and_clear();

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            println!("{}", e.render());
            anyhow::bail!("Push failed for {account}");
        }
    };

    println!(
        "Published {} {}",
        outcome.event_count,
        pluralize("job", outcome.event_count)
    );
    println!("Subscribe at {}", outcome.feed_url.cyan());

    Ok(())
}
