use anyhow::Result;
use jobcal_core::SyncCoordinator;

use crate::render::Render;

pub async fn run(coordinator: &SyncCoordinator, account: &str) -> Result<()> {
    match coordinator.deactivate(account).await? {
        Some(integration) => println!("{}", integration.render()),
        None => anyhow::bail!("No integration for {account}"),
    }
    Ok(())
}
