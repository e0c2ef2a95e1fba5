//! Feed URL validation.
//!
//! A cheap allow-list check that runs before any network round trip. It does
//! not negotiate anything with the remote host: a URL is accepted when it
//! parses as an absolute URL and its path carries the calendar export marker.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::constants::FEED_PATH_MARKER;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedUrlError {
    #[error("'{input}' is not a valid absolute URL ({reason})")]
    Malformed { input: String, reason: String },

    #[error("'{input}' does not look like a calendar feed (path must contain '{marker}')", marker = FEED_PATH_MARKER)]
    NotAFeed { input: String },
}

/// Classification of the remote calendar provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedKind {
    GenericIcal,
}

impl FeedKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedKind::GenericIcal => "generic-ical",
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A URL that passed validation. Kept exactly as the user supplied it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedUrl(Url);

impl FeedUrl {
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn kind(&self) -> FeedKind {
        FeedKind::GenericIcal
    }
}

impl fmt::Display for FeedUrl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub fn validate(raw: &str) -> Result<FeedUrl, FeedUrlError> {
    let url = Url::parse(raw).map_err(|e| FeedUrlError::Malformed {
        input: raw.to_string(),
        reason: e.to_string(),
    })?;

    if !url.path().contains(FEED_PATH_MARKER) {
        return Err(FeedUrlError::NotAFeed {
            input: raw.to_string(),
        });
    }

    Ok(FeedUrl(url))
}
