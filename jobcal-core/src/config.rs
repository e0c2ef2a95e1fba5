//! Global jobcal configuration.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CALENDAR_NAME, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_SERVER_PORT};
use crate::error::{JobcalError, JobcalResult};
use crate::ics::local_timezone;

/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "JOBCAL_CONFIG";

static DEFAULT_PUBLIC_BASE_URL: &str = "http://127.0.0.1:4096";

fn default_public_base_url() -> String {
    DEFAULT_PUBLIC_BASE_URL.to_string()
}

fn default_calendar_name() -> String {
    DEFAULT_CALENDAR_NAME.to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

fn default_server_port() -> u16 {
    DEFAULT_SERVER_PORT
}

/// Configuration at ~/.config/jobcal/config.toml
///
/// Every field has a default, so a missing file is the same as an empty one.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JobcalConfig {
    /// Where integration records and job files live.
    /// Defaults to the platform data dir (e.g. ~/.local/share/jobcal).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Base of the published feed links handed to subscribers
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    #[serde(default = "default_calendar_name")]
    pub calendar_name: String,

    /// IANA zone used to read job times. Defaults to the system zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    #[serde(default = "default_server_port")]
    pub server_port: u16,
}

impl Default for JobcalConfig {
    fn default() -> Self {
        JobcalConfig {
            data_dir: None,
            public_base_url: default_public_base_url(),
            calendar_name: default_calendar_name(),
            timezone: None,
            fetch_timeout_secs: default_fetch_timeout_secs(),
            server_port: default_server_port(),
        }
    }
}

impl JobcalConfig {
    pub fn config_path() -> JobcalResult<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_dir = dirs::config_dir()
            .ok_or_else(|| JobcalError::Config("Could not determine config directory".into()))?
            .join("jobcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, falling back to defaults if the file is absent.
    pub fn load() -> JobcalResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> JobcalResult<Self> {
        if !path.exists() {
            return Ok(JobcalConfig::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            JobcalError::Config(format!("Could not read {}: {e}", path.display()))
        })?;

        toml::from_str(&contents)
            .map_err(|e| JobcalError::Config(format!("Could not parse {}: {e}", path.display())))
    }

    pub fn data_dir(&self) -> JobcalResult<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(expand_home(dir)),
            None => Ok(dirs::data_dir()
                .ok_or_else(|| JobcalError::Config("Could not determine data directory".into()))?
                .join("jobcal")),
        }
    }

    pub fn timezone(&self) -> JobcalResult<Tz> {
        match &self.timezone {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|_| JobcalError::Config(format!("Unknown timezone '{name}'"))),
            None => Ok(local_timezone()),
        }
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> JobcalResult<()> {
        let contents = format!(
            "\
# jobcal configuration

# Where integration records and job files are stored:
# data_dir = \"~/.local/share/jobcal\"

# Base URL that published feed links are built from:
# public_base_url = \"{DEFAULT_PUBLIC_BASE_URL}\"

# Calendar name shown by subscribers:
# calendar_name = \"{DEFAULT_CALENDAR_NAME}\"

# Zone used to read job dates and times (defaults to the system zone):
# timezone = \"America/New_York\"

# Seconds to wait for a remote feed:
# fetch_timeout_secs = {DEFAULT_FETCH_TIMEOUT_SECS}

# Port for jobcal-server:
# server_port = {DEFAULT_SERVER_PORT}
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                JobcalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| JobcalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

/// Expand a leading `~/` to the home directory.
fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}
