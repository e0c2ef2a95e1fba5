//! TUI rendering traits for jobcal types.
//!
//! This module provides extension traits that add colored terminal rendering
//! to jobcal-core types using owo_colors.

use jobcal_core::{CalendarEvent, CalendarIntegration, SyncError};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for CalendarEvent {
    fn render(&self) -> String {
        let time = match (&self.start, &self.end) {
            (Some(start), Some(end)) => format!("{start} → {end}"),
            (Some(start), None) => start.to_string(),
            _ => "no time".to_string(),
        };

        let mut line = format!("{} {}", self.summary, time.dimmed());
        if let Some(location) = &self.location {
            line.push_str(&format!(" @ {location}"));
        }
        line
    }
}

impl Render for CalendarIntegration {
    fn render(&self) -> String {
        let state = if self.is_active {
            "active".green().to_string()
        } else {
            "inactive".red().to_string()
        };

        let mut lines = vec![format!("📅 {} ({state})", self.account_id.bold())];

        if let Some(url) = &self.feed_url {
            let kind = self.feed_kind.as_deref().unwrap_or("unknown");
            lines.push(format!("   Source:    {url} {}", format!("[{kind}]").dimmed()));
        }

        let last_sync = self
            .last_sync_at
            .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "never".to_string());
        lines.push(format!("   Last sync: {last_sync}"));

        lines.join("\n")
    }
}

impl Render for SyncError {
    fn render(&self) -> String {
        let hint = if self.is_retryable() {
            "(retry later)".dimmed().to_string()
        } else {
            "(check the link)".dimmed().to_string()
        };
        format!("{} {hint}", self.to_string().red())
    }
}

pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
