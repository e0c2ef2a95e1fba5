use anyhow::Result;
use jobcal_core::JobcalConfig;
use owo_colors::OwoColorize;

pub fn run(config: &JobcalConfig) -> Result<()> {
    let config_path = JobcalConfig::config_path()?;
    let data_dir = config.data_dir()?;

    if !config_path.exists() {
        JobcalConfig::create_default_config(&config_path)?;
        println!("Created {}", config_path.display().green());
    }

    println!("{}", "Paths".bold());
    println!("  Config:        {}", config_path.display());
    println!("  Integrations:  {}", data_dir.join("integrations").display());
    println!("  Jobs:          {}", data_dir.join("jobs").display());

    println!("{}", "Publishing".bold());
    println!("  Base URL:      {}", config.public_base_url);
    println!("  Calendar:      {}", config.calendar_name);
    println!("  Timezone:      {}", config.timezone()?);

    Ok(())
}
