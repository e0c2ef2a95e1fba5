use anyhow::Result;
use jobcal_core::SyncCoordinator;
use owo_colors::OwoColorize;

use crate::render::Render;

pub async fn run(coordinator: &SyncCoordinator, account: &str) -> Result<()> {
    let Some(integration) = coordinator.integration(account).await? else {
        println!("{}", format!("No integration for {account}").dimmed());
        return Ok(());
    };

    println!("{}", integration.render());

    if integration.published_document.is_some() {
        println!(
            "   Feed:      {}",
            coordinator.locator().feed_url(account).cyan()
        );
    }

    Ok(())
}
